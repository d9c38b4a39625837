use crate::platform::{CoordSpace, Origin, PlatformProfile};

use super::event::{JointSample, PoseEvent};
use super::model::RawPose;

/// 有効な姿勢とみなすために必要な信頼関節数（12点中）
pub const MIN_VALID_JOINTS: usize = 10;

/// 正規化の結果。信頼できる関節が規定数に満たない場合は部分イベントではなく
/// 無効フレームとして通知する（「誰もいない」と「一部しか見えない」を
/// コンシューマ側で区別させるため）。
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Valid(PoseEvent),
    Invalid,
}

/// プラットフォーム固有のモデル出力を正準スキーマへ写像する。
///
/// 出力は常に左上原点・単位正方形（x,y ∈ 0..1）。ミラー表示される
/// フロントカメラのフィードでは出力前にx反転を適用し、見た目と
/// 出力座標が一致するようにする。
#[derive(Debug, Clone)]
pub struct Normalizer {
    profile: PlatformProfile,
    min_valid_joints: usize,
}

impl Normalizer {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            min_valid_joints: MIN_VALID_JOINTS,
        }
    }

    pub fn with_min_valid_joints(mut self, count: usize) -> Self {
        self.min_valid_joints = count;
        self
    }

    /// モデル出力をフレーム寸法で正規化する。
    /// mirroredはバインドされたカメラの向きから決まる（front = true）。
    pub fn normalize(
        &self,
        raw: &RawPose,
        frame_width: u32,
        frame_height: u32,
        mirrored: bool,
    ) -> NormalizeOutcome {
        if frame_width == 0 || frame_height == 0 {
            return NormalizeOutcome::Invalid;
        }

        let mut event = PoseEvent::default();
        for joint in &raw.joints {
            let Some(canonical) = self.profile.canonical(&joint.id) else {
                continue;
            };
            if joint.confidence < self.profile.confidence_threshold {
                continue;
            }

            let (mut x, mut y) = match self.profile.coord_space {
                CoordSpace::Pixels => (
                    joint.x / frame_width as f32,
                    joint.y / frame_height as f32,
                ),
                CoordSpace::Normalized => (joint.x, joint.y),
            };
            if self.profile.origin == Origin::BottomLeft {
                y = 1.0 - y;
            }
            if mirrored {
                x = 1.0 - x;
            }
            event.insert(
                canonical,
                JointSample::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
            );
        }

        if event.len() < self.min_valid_joints {
            NormalizeOutcome::Invalid
        } else {
            NormalizeOutcome::Valid(event)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{android, ios, web};
    use crate::pose::joint::Joint;
    use crate::pose::model::{RawJoint, RawJointId};

    /// MLKitの12関節全てを同一ピクセル座標で返すダミー出力
    fn android_raw_at(x: f32, y: f32, confidence: f32) -> RawPose {
        let indices = [11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28];
        RawPose {
            joints: indices
                .iter()
                .map(|i| RawJoint {
                    id: RawJointId::Index(*i),
                    x,
                    y,
                    confidence,
                })
                .collect(),
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        // 1280x720のピクセル(640,360) → (0.5, 0.5)
        let normalizer = Normalizer::new(android::profile());
        let outcome = normalizer.normalize(&android_raw_at(640.0, 360.0, 1.0), 1280, 720, false);
        let NormalizeOutcome::Valid(event) = outcome else {
            panic!("expected valid pose");
        };
        let sample = event.get(Joint::LeftShoulder).unwrap();
        assert_eq!(sample.x, 0.5);
        assert_eq!(sample.y, 0.5);
    }

    #[test]
    fn test_front_facing_mirrors_x() {
        // 正規化済みx=0.2のランドマークはミラーで0.8として出力される
        let normalizer = Normalizer::new(web::profile());
        let raw = RawPose {
            joints: (0..12)
                .map(|i| RawJoint {
                    id: RawJointId::Index([11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28][i]),
                    x: 0.2,
                    y: 0.4,
                    confidence: 1.0,
                })
                .collect(),
        };
        let NormalizeOutcome::Valid(event) = normalizer.normalize(&raw, 1280, 720, true) else {
            panic!("expected valid pose");
        };
        let sample = event.get(Joint::LeftShoulder).unwrap();
        assert!((sample.x - 0.8).abs() < 1e-6);
        assert!((sample.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_bottom_left_origin_flips_y() {
        // Vision系は左下原点: y=0.25は上下反転して0.75になる
        let names = [
            "left_shoulder",
            "right_shoulder",
            "left_elbow",
            "right_elbow",
            "left_wrist",
            "right_wrist",
            "left_hip",
            "right_hip",
            "left_knee",
            "right_knee",
            "left_ankle",
            "right_ankle",
        ];
        let raw = RawPose {
            joints: names
                .iter()
                .map(|n| RawJoint {
                    id: RawJointId::name(*n),
                    x: 0.5,
                    y: 0.25,
                    confidence: 0.9,
                })
                .collect(),
        };
        let normalizer = Normalizer::new(ios::profile());
        let NormalizeOutcome::Valid(event) = normalizer.normalize(&raw, 640, 480, false) else {
            panic!("expected valid pose");
        };
        assert_eq!(event.get(Joint::LeftHip).unwrap().y, 0.75);
    }

    #[test]
    fn test_nine_confident_joints_is_invalid() {
        let mut raw = android_raw_at(100.0, 100.0, 1.0);
        // 3関節を低信頼度に落とす → 信頼関節9点
        for joint in raw.joints.iter_mut().take(3) {
            joint.confidence = 0.1;
        }
        let normalizer = Normalizer::new(android::profile());
        assert_eq!(
            normalizer.normalize(&raw, 1280, 720, false),
            NormalizeOutcome::Invalid
        );
    }

    #[test]
    fn test_ten_confident_joints_is_valid() {
        let mut raw = android_raw_at(100.0, 100.0, 1.0);
        for joint in raw.joints.iter_mut().take(2) {
            joint.confidence = 0.1;
        }
        let normalizer = Normalizer::new(android::profile());
        let NormalizeOutcome::Valid(event) = normalizer.normalize(&raw, 1280, 720, false) else {
            panic!("expected valid pose");
        };
        // 低信頼度の関節は欠損（センチネルではなく省略）
        assert_eq!(event.len(), 10);
        assert_eq!(event.get(Joint::LeftShoulder), None);
    }

    #[test]
    fn test_empty_raw_pose_is_invalid() {
        let normalizer = Normalizer::new(web::profile());
        assert_eq!(
            normalizer.normalize(&RawPose::default(), 1280, 720, false),
            NormalizeOutcome::Invalid
        );
    }

    #[test]
    fn test_out_of_range_coordinates_clamped() {
        let normalizer = Normalizer::new(web::profile());
        let raw = RawPose {
            joints: [11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28]
                .iter()
                .map(|i| RawJoint {
                    id: RawJointId::Index(*i),
                    x: 1.3,
                    y: -0.1,
                    confidence: 1.0,
                })
                .collect(),
        };
        let NormalizeOutcome::Valid(event) = normalizer.normalize(&raw, 1280, 720, false) else {
            panic!("expected valid pose");
        };
        let sample = event.get(Joint::RightHip).unwrap();
        assert_eq!(sample.x, 1.0);
        assert_eq!(sample.y, 0.0);
    }

    #[test]
    fn test_zero_sized_frame_is_invalid() {
        let normalizer = Normalizer::new(android::profile());
        assert_eq!(
            normalizer.normalize(&android_raw_at(0.0, 0.0, 1.0), 0, 0, false),
            NormalizeOutcome::Invalid
        );
    }
}
