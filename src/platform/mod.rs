//! プラットフォームアダプタ。
//!
//! 各プラットフォームの関節列挙（MLKitインデックス / Vision名 /
//! MediaPipeインデックス）と座標規約をプロファイルとして切り出し、
//! コアパイプラインには埋め込まない。

pub mod android;
pub mod ios;
pub mod web;

use crate::pose::joint::Joint;
use crate::pose::model::RawJointId;

/// モデル出力座標の空間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSpace {
    /// ソース画像のピクセル座標（フレーム寸法で割って正規化する）
    Pixels,
    /// すでに0..1へ正規化済み
    Normalized,
}

/// モデル出力座標の原点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    /// Vision系。出力前に上下反転して左上原点へ揃える
    BottomLeft,
}

/// プラットフォームごとの関節写像と座標規約
#[derive(Clone)]
pub struct PlatformProfile {
    pub name: &'static str,
    pub coord_space: CoordSpace,
    pub origin: Origin,
    /// この信頼度未満の関節は出力から省く（欠損扱い）
    pub confidence_threshold: f32,
    joint_map: fn(&RawJointId) -> Option<Joint>,
}

impl PlatformProfile {
    pub fn new(
        name: &'static str,
        coord_space: CoordSpace,
        origin: Origin,
        confidence_threshold: f32,
        joint_map: fn(&RawJointId) -> Option<Joint>,
    ) -> Self {
        Self {
            name,
            coord_space,
            origin,
            confidence_threshold,
            joint_map,
        }
    }

    /// プラットフォーム関節識別子 → 正準名。対象外の関節（鼻・目など）はNone。
    pub fn canonical(&self, id: &RawJointId) -> Option<Joint> {
        (self.joint_map)(id)
    }
}

impl std::fmt::Debug for PlatformProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformProfile")
            .field("name", &self.name)
            .field("coord_space", &self.coord_space)
            .field("origin", &self.origin)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}
