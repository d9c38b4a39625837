use serde::{Deserialize, Serialize};
use std::fmt;

/// コンシューマへ通知するエラー種別（閉じた集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// カメラ権限をユーザーが拒否した
    PermissionDenied,
    /// 優先リスト内のどのカメラセレクタもバインドできなかった
    BindFailed,
    /// カメラプロバイダの初期化が失敗した
    ProviderError,
    /// キャプチャ開始が失敗した
    StartError,
    /// 単一フレームの推論が失敗した（パイプラインは継続）
    DetectFailed,
    /// ネイティブ権限エラー（ユーザー拒否とは別。マニフェスト宣言漏れ等）
    PermissionMissing,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::BindFailed => "bind_failed",
            Self::ProviderError => "provider_error",
            Self::StartError => "start_error",
            Self::DetectFailed => "detect_failed",
            Self::PermissionMissing => "permission_missing",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// onPoseError で配信するエラー通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseError {
    pub message: String,
    pub code: ErrorCode,
    /// プラットフォーム固有のエラー名（例: NotAllowedError）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
}

impl PoseError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            platform_name: None,
        }
    }

    pub fn with_platform_name(mut self, name: impl Into<String>) -> Self {
        self.platform_name = Some(name.into());
        self
    }

    /// 抑制判定用シグネチャ: message|code|platform_name
    pub fn signature(&self) -> String {
        format!(
            "{}|{}|{}",
            self.message,
            self.code,
            self.platform_name.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
