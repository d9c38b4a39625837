//! iOS (AVFoundation + Vision VNDetectHumanBodyPoseRequest) プロファイル。
//! Visionは0..1空間・左下原点で返すため、出力前に上下反転が必要。

use super::{CoordSpace, Origin, PlatformProfile};
use crate::pose::joint::Joint;
use crate::pose::model::RawJointId;

/// VNRecognizedPointのconfidenceしきい値
pub const CONFIDENCE_THRESHOLD: f32 = 0.2;

fn canonical(id: &RawJointId) -> Option<Joint> {
    let RawJointId::Name(name) = id else {
        return None;
    };
    // VNHumanBodyPoseObservation.JointNameの識別子
    match name.as_str() {
        "left_shoulder" => Some(Joint::LeftShoulder),
        "right_shoulder" => Some(Joint::RightShoulder),
        "left_elbow" => Some(Joint::LeftElbow),
        "right_elbow" => Some(Joint::RightElbow),
        "left_wrist" => Some(Joint::LeftWrist),
        "right_wrist" => Some(Joint::RightWrist),
        "left_hip" => Some(Joint::LeftHip),
        "right_hip" => Some(Joint::RightHip),
        "left_knee" => Some(Joint::LeftKnee),
        "right_knee" => Some(Joint::RightKnee),
        "left_ankle" => Some(Joint::LeftAnkle),
        "right_ankle" => Some(Joint::RightAnkle),
        _ => None,
    }
}

pub fn profile() -> PlatformProfile {
    PlatformProfile::new(
        "ios",
        CoordSpace::Normalized,
        Origin::BottomLeft,
        CONFIDENCE_THRESHOLD,
        canonical,
    )
}
