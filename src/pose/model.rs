use anyhow::Result;

use crate::camera::frame::PoseFrame;

/// モデルが返す関節の識別子。
/// MLKit/MediaPipeはインデックス、Visionは名前で関節を引くため両対応。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawJointId {
    Index(usize),
    Name(String),
}

impl RawJointId {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

/// モデル出力の1関節。座標系（ピクセル/正規化済み、原点位置）は
/// プラットフォームプロファイルが規定する。
#[derive(Debug, Clone, PartialEq)]
pub struct RawJoint {
    pub id: RawJointId,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// モデル出力一式。関節が1つも無い（人物未検出）場合は空。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPose {
    pub joints: Vec<RawJoint>,
}

/// 外部の姿勢推定モデル（MLKit / Vision / MediaPipe等）の抽象。
/// 呼び出しは非リエントラント前提: Frame Feederのハンドオフにより
/// 前回のdetectが完了するまで次は呼ばれない。
pub trait PoseModel: Send {
    fn detect(&mut self, frame: &PoseFrame) -> Result<RawPose>;
}
