//! Android (CameraX + ML Kit Pose Detection) プロファイル。
//! ML Kitはランドマークをソース画像のピクセル座標で返す。

use super::{CoordSpace, Origin, PlatformProfile};
use crate::pose::joint::Joint;
use crate::pose::model::RawJointId;

// ML Kit PoseLandmark定数
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// inFrameLikelihoodのしきい値
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

fn canonical(id: &RawJointId) -> Option<Joint> {
    let RawJointId::Index(index) = id else {
        return None;
    };
    match *index {
        LEFT_SHOULDER => Some(Joint::LeftShoulder),
        RIGHT_SHOULDER => Some(Joint::RightShoulder),
        LEFT_ELBOW => Some(Joint::LeftElbow),
        RIGHT_ELBOW => Some(Joint::RightElbow),
        LEFT_WRIST => Some(Joint::LeftWrist),
        RIGHT_WRIST => Some(Joint::RightWrist),
        LEFT_HIP => Some(Joint::LeftHip),
        RIGHT_HIP => Some(Joint::RightHip),
        LEFT_KNEE => Some(Joint::LeftKnee),
        RIGHT_KNEE => Some(Joint::RightKnee),
        LEFT_ANKLE => Some(Joint::LeftAnkle),
        RIGHT_ANKLE => Some(Joint::RightAnkle),
        _ => None,
    }
}

pub fn profile() -> PlatformProfile {
    PlatformProfile::new(
        "android",
        CoordSpace::Pixels,
        Origin::TopLeft,
        CONFIDENCE_THRESHOLD,
        canonical,
    )
}
