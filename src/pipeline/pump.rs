use std::sync::{Arc, Mutex};

use crate::camera::frame::PoseFrame;
use crate::error::{ErrorCode, PoseError};
use crate::pose::event::PoseEvent;
use crate::pose::model::PoseModel;
use crate::pose::normalize::{NormalizeOutcome, Normalizer};

/// 受理したフレーム1枚に対する結果。ちょうど1つだけ生成される。
#[derive(Debug, Clone, PartialEq)]
pub enum PumpOutcome {
    Pose(PoseEvent),
    /// 信頼できる関節が足りないフレーム
    Invalid,
    /// 推論呼び出し自体の失敗。パイプラインは次フレームで継続する。
    Error(PoseError),
}

/// 一度に1フレームずつ外部モデルへ流すポンプ。
/// 非リエントラント: 単一ワーカーから&mut selfで駆動されるため、
/// 前回のprocessが返るまで次は呼ばれない。
pub struct InferencePump {
    model: Arc<Mutex<Box<dyn PoseModel>>>,
    normalizer: Normalizer,
    mirrored: bool,
}

impl InferencePump {
    pub fn new(model: Arc<Mutex<Box<dyn PoseModel>>>, normalizer: Normalizer, mirrored: bool) -> Self {
        Self {
            model,
            normalizer,
            mirrored,
        }
    }

    /// フレームを処理して結果をちょうど1つ返す。
    /// フレームはここでmoveされ、成功・失敗どちらの経路でも
    /// return時のDropでバッファが解放される。
    pub fn process(&mut self, frame: PoseFrame) -> PumpOutcome {
        let detected = {
            let mut model = self.model.lock().unwrap();
            model.detect(&frame)
        };
        match detected {
            Ok(raw) => {
                match self
                    .normalizer
                    .normalize(&raw, frame.width(), frame.height(), self.mirrored)
                {
                    NormalizeOutcome::Valid(event) => PumpOutcome::Pose(event),
                    NormalizeOutcome::Invalid => PumpOutcome::Invalid,
                }
            }
            Err(e) => PumpOutcome::Error(PoseError::new(ErrorCode::DetectFailed, e.to_string())),
        }
    }
}
