//! Web (getUserMedia + MediaPipe PoseLandmarker) プロファイル。
//! ランドマークは0..1正規化済み・左上原点。visibilityをconfidenceとして扱う。

use super::{CoordSpace, Origin, PlatformProfile};
use crate::pose::joint::Joint;
use crate::pose::model::RawJointId;

/// visibilityのしきい値
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

fn canonical(id: &RawJointId) -> Option<Joint> {
    let RawJointId::Index(index) = id else {
        return None;
    };
    // MediaPipe Poseの33ランドマークのうち12点だけを渡す
    match *index {
        11 => Some(Joint::LeftShoulder),
        12 => Some(Joint::RightShoulder),
        13 => Some(Joint::LeftElbow),
        14 => Some(Joint::RightElbow),
        15 => Some(Joint::LeftWrist),
        16 => Some(Joint::RightWrist),
        23 => Some(Joint::LeftHip),
        24 => Some(Joint::RightHip),
        25 => Some(Joint::LeftKnee),
        26 => Some(Joint::RightKnee),
        27 => Some(Joint::LeftAnkle),
        28 => Some(Joint::RightAnkle),
        _ => None,
    }
}

pub fn profile() -> PlatformProfile {
    PlatformProfile::new(
        "web",
        CoordSpace::Normalized,
        Origin::TopLeft,
        CONFIDENCE_THRESHOLD,
        canonical,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mediapipe_indices_mapped() {
        let profile = profile();
        assert_eq!(profile.canonical(&RawJointId::Index(11)), Some(Joint::LeftShoulder));
        assert_eq!(profile.canonical(&RawJointId::Index(28)), Some(Joint::RightAnkle));
        // 17〜22（手指）は対象外
        assert_eq!(profile.canonical(&RawJointId::Index(17)), None);
        assert_eq!(profile.canonical(&RawJointId::Index(22)), None);
    }

    #[test]
    fn test_profile_conventions() {
        let profile = profile();
        assert_eq!(profile.coord_space, CoordSpace::Normalized);
        assert_eq!(profile.origin, Origin::TopLeft);
        assert_eq!(profile.confidence_threshold, 0.5);
    }
}
