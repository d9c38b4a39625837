use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::frame::PoseFrame;

/// バインドされたカメラの向き。バインド成功ごとに一度コンシューマへ通知する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    Back,
}

impl CameraFacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// フロントカメラはミラー表示前提なので出力x座標を反転する
    pub fn is_mirrored(&self) -> bool {
        matches!(self, Self::Front)
    }
}

/// 権限リクエストの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// キャプチャ要求設定（実解像度はデバイス依存で異なってよい）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// カメラスレッドから新フレームごとに呼ばれるコールバック
pub type FrameCallback = Box<dyn FnMut(PoseFrame) + Send>;

/// ライブプレビューの描画先（プラットフォームビュー側から渡される）
pub trait PreviewSurface: Send {}

/// バインド済みカメラセッション。1つの物理カメラを排他的に所有する。
pub trait CameraSession: Send {
    fn facing(&self) -> CameraFacing;

    /// フレーム配信を開始する。コールバックはカメラ側スレッドで呼ばれる。
    fn start(&mut self, callback: FrameCallback) -> Result<()>;

    /// フレーム配信を停止する。冪等。
    fn stop(&mut self);

    /// プレビューサーフェスを接続する（未対応プラットフォームでは無視してよい）
    fn attach_preview(&mut self, _surface: Box<dyn PreviewSurface>) {}
}

/// カメラHALの抽象。権限確認とセレクタ単位のバインドを提供する。
/// バインドは失敗してよく、Session Controller側が優先順フォールバックを行う。
pub trait CameraProvider: Send {
    /// カメラ権限を要求する。Errはユーザー拒否ではなくネイティブ権限エラー
    /// （マニフェスト宣言漏れ等）を表す。
    fn request_permission(&mut self) -> Result<PermissionStatus>;

    /// プロバイダ本体の初期化（CameraXのProcessCameraProvider取得に相当）。
    /// バインド前に一度呼ばれる。
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// 指定の向きのカメラを開く。該当カメラが無い・使用中ならErr。
    fn open(&mut self, facing: CameraFacing, config: &CaptureConfig) -> Result<Box<dyn CameraSession>>;
}
