use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::camera::source::CameraFacing;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub events: EventConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// 要求キャプチャ幅
    #[serde(default = "default_width")]
    pub width: u32,
    /// 要求キャプチャ高さ
    #[serde(default = "default_height")]
    pub height: u32,
    /// 要求フレームレート
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// バインド優先順（最初に成功したセレクタを使う）
    #[serde(default = "default_preference")]
    pub preference: Vec<CameraFacing>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// 有効フレームに必要な信頼関節数（12点中）
    #[serde(default = "default_min_valid_joints")]
    pub min_valid_joints: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventConfig {
    /// 同一エラーの再配信抑制窓（ミリ秒）
    #[serde(default = "default_error_window_ms")]
    pub error_window_ms: u64,
}

fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_fps() -> u32 { 30 }
fn default_preference() -> Vec<CameraFacing> { vec![CameraFacing::Back, CameraFacing::Front] }
fn default_min_valid_joints() -> usize { 10 }
fn default_error_window_ms() -> u64 { 1000 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            preference: default_preference(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_valid_joints: default_min_valid_joints(),
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            error_window_ms: default_error_window_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
