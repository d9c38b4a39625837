use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::joint::Joint;

/// 正規化済み関節座標。左上原点、x/y とも 0.0〜1.0。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub x: f32,
    pub y: f32,
}

impl JointSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 1フレーム分の姿勢イベント。関節名 → 座標のマップ。
/// 空マップは「無効フレーム」（人物が十分検出できなかった）を表す。
/// 3プラットフォーム共通のワイヤ契約はこの構造体のJSON表現。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseEvent {
    joints: BTreeMap<Joint, JointSample>,
}

impl PoseEvent {
    /// 無効フレームマーカー（空マップ）
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_invalid(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn insert(&mut self, joint: Joint, sample: JointSample) {
        self.joints.insert(joint, sample);
    }

    pub fn get(&self, joint: Joint) -> Option<&JointSample> {
        self.joints.get(&joint)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Joint, &JointSample)> {
        self.joints.iter()
    }
}

impl FromIterator<(Joint, JointSample)> for PoseEvent {
    fn from_iter<T: IntoIterator<Item = (Joint, JointSample)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_marker_is_empty() {
        let event = PoseEvent::invalid();
        assert!(event.is_invalid());
        assert_eq!(event.len(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut event = PoseEvent::default();
        event.insert(Joint::LeftWrist, JointSample::new(0.25, 0.75));
        assert!(!event.is_invalid());
        assert_eq!(event.get(Joint::LeftWrist), Some(&JointSample::new(0.25, 0.75)));
        assert_eq!(event.get(Joint::RightWrist), None);
    }

    #[test]
    fn test_wire_format() {
        // ワイヤ契約: {"leftShoulder":{"x":0.5,"y":0.5}} 形式
        let mut event = PoseEvent::default();
        event.insert(Joint::LeftShoulder, JointSample::new(0.5, 0.5));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, "{\"leftShoulder\":{\"x\":0.5,\"y\":0.5}}");
    }

    #[test]
    fn test_wire_format_invalid_frame() {
        let json = serde_json::to_string(&PoseEvent::invalid()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_wire_round_trip() {
        let event: PoseEvent = [
            (Joint::LeftHip, JointSample::new(0.4, 0.6)),
            (Joint::RightHip, JointSample::new(0.6, 0.6)),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&event).unwrap();
        let back: PoseEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
