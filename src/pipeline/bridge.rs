use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::camera::source::CameraFacing;
use crate::error::PoseError;
use crate::pose::event::PoseEvent;

/// 同一エラーの再配信を抑制するデフォルト窓
pub const ERROR_WINDOW_MS: u64 = 1000;

/// コンシューマへ配信するイベント。JSON表現が3プラットフォーム共通の
/// ワイヤ契約（onPose / onCameraFacing / onPoseError に対応）。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum BridgeEvent {
    /// 空マップは無効フレーム（未検出）を表す
    #[serde(rename = "onPose")]
    Pose(PoseEvent),
    #[serde(rename = "onCameraFacing")]
    Facing(CameraFacing),
    #[serde(rename = "onPoseError")]
    Error(PoseError),
}

/// 直近シグネチャによるエラー抑制。
/// 同一の (message, code, platform_name) は窓内で1回だけ配信する。
#[derive(Debug)]
pub struct ErrorThrottle {
    window: Duration,
    last: Option<(String, Instant)>,
}

impl ErrorThrottle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// このシグネチャを今配信してよいか。許可した場合は記録を更新する。
    pub fn admit(&mut self, signature: &str, now: Instant) -> bool {
        if let Some((last_sig, last_at)) = &self.last {
            if last_sig == signature && now.duration_since(*last_at) < self.window {
                return false;
            }
        }
        self.last = Some((signature.to_string(), now));
        true
    }
}

/// 正規化イベント・エラー・カメラ向きをコンシューマへ渡すブリッジ。
///
/// チャネルの受信側がUI/メインコンテキストの役割を持ち、ワーカーからの
/// 書き込みは全てこのチャネル経由でマーシャルされる。セッション世代が
/// 進んだ後（stop/再start後）のイベントはゲートで破棄され、破棄済み
/// パイプラインの遅延コールバックが新セッションを汚さない。
pub struct EventBridge {
    tx: mpsc::Sender<BridgeEvent>,
    current_generation: Arc<AtomicU64>,
    session_generation: u64,
    throttle: ErrorThrottle,
}

impl EventBridge {
    pub fn new(
        tx: mpsc::Sender<BridgeEvent>,
        current_generation: Arc<AtomicU64>,
        session_generation: u64,
        error_window: Duration,
    ) -> Self {
        Self {
            tx,
            current_generation,
            session_generation,
            throttle: ErrorThrottle::new(error_window),
        }
    }

    fn is_stale(&self) -> bool {
        self.current_generation.load(Ordering::SeqCst) != self.session_generation
    }

    fn send(&self, event: BridgeEvent) {
        if self.is_stale() {
            return;
        }
        // 受信側が先に破棄されていても無視してよい
        let _ = self.tx.send(event);
    }

    pub fn pose(&self, event: PoseEvent) {
        self.send(BridgeEvent::Pose(event));
    }

    /// 無効フレームマーカー（空マップのonPose）
    pub fn invalid_frame(&self) {
        self.send(BridgeEvent::Pose(PoseEvent::invalid()));
    }

    pub fn facing(&self, facing: CameraFacing) {
        self.send(BridgeEvent::Facing(facing));
    }

    /// 抑制窓を通ったエラーだけ配信する
    pub fn error(&mut self, error: PoseError) {
        if self.throttle.admit(&error.signature(), Instant::now()) {
            self.send(BridgeEvent::Error(error));
        }
    }
}
