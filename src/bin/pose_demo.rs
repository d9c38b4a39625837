//! Pose demo: runs the full pipeline against a synthetic camera and a
//! synthetic pose model, printing the wire-contract events it would deliver
//! to a host application.
//!
//! 実機のカメラHAL・推論モデルの代わりに合成実装を差し込み、
//! バックプレッシャと配信契約の動作確認をするための診断用バイナリ。

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use pose_bridge::camera::{
    CameraFacing, CameraProvider, CameraSession, CaptureConfig, FrameCallback, PermissionStatus,
    PoseFrame, VecFrameBuffer,
};
use pose_bridge::config::PipelineConfig;
use pose_bridge::pipeline::{BridgeEvent, SessionController};
use pose_bridge::platform::android;
use pose_bridge::pose::{PoseModel, RawJoint, RawJointId, RawPose};

const CONFIG_PATH: &str = "pose_bridge.toml";
const RUN_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/pose_{}.log", ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "{}", msg);
            let _ = f.flush();
        }
    }};
}

// ---------------------------------------------------------------------------
// Synthetic camera: 30fpsでダミーフレームを配信する
// ---------------------------------------------------------------------------

struct SyntheticSession {
    facing: CameraFacing,
    config: CaptureConfig,
    stop_tx: Option<std::sync::mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CameraSession for SyntheticSession {
    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn start(&mut self, mut callback: FrameCallback) -> Result<()> {
        let (stop_tx, stop_rx) = std::sync::mpsc::channel();
        let interval = Duration::from_secs(1) / self.config.fps.max(1);
        let (width, height) = (self.config.width, self.config.height);
        self.stop_tx = Some(stop_tx);
        self.handle = Some(thread::spawn(move || {
            let started = Instant::now();
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                }
                let timestamp_us = started.elapsed().as_micros() as u64;
                callback(PoseFrame::new(
                    Box::new(VecFrameBuffer::new(Vec::new())),
                    width,
                    height,
                    0,
                    timestamp_us,
                ));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct SyntheticProvider;

impl CameraProvider for SyntheticProvider {
    fn request_permission(&mut self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    fn open(
        &mut self,
        facing: CameraFacing,
        config: &CaptureConfig,
    ) -> Result<Box<dyn CameraSession>> {
        Ok(Box::new(SyntheticSession {
            facing,
            config: *config,
            stop_tx: None,
            handle: None,
        }))
    }
}

// ---------------------------------------------------------------------------
// Synthetic model: 腕を振る人物をピクセル座標で合成する
// ---------------------------------------------------------------------------

struct SyntheticModel {
    phase: f32,
}

impl PoseModel for SyntheticModel {
    fn detect(&mut self, frame: &PoseFrame) -> Result<RawPose> {
        self.phase += 0.1;
        let w = frame.width() as f32;
        let h = frame.height() as f32;
        let sway = self.phase.sin() * 0.05;

        // (正規化座標, MLKitインデックス) → ピクセルへ展開
        let layout: [(usize, f32, f32); 12] = [
            (11, 0.40, 0.30),
            (12, 0.60, 0.30),
            (13, 0.33 - sway, 0.42),
            (14, 0.67 + sway, 0.42),
            (15, 0.30 - sway, 0.55),
            (16, 0.70 + sway, 0.55),
            (23, 0.43, 0.55),
            (24, 0.57, 0.55),
            (25, 0.42, 0.72),
            (26, 0.58, 0.72),
            (27, 0.41, 0.90),
            (28, 0.59, 0.90),
        ];
        Ok(RawPose {
            joints: layout
                .iter()
                .map(|(index, x, y)| RawJoint {
                    id: RawJointId::Index(*index),
                    x: x * w,
                    y: y * h,
                    confidence: 0.95,
                })
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let logfile = open_log_file()?;
    log!(logfile, "Pose Demo ({})", env!("GIT_VERSION"));

    let config = PipelineConfig::load_or_default(CONFIG_PATH);
    log!(
        logfile,
        "Capture: {}x{}@{}fps  min_valid_joints: {}",
        config.camera.width,
        config.camera.height,
        config.camera.fps,
        config.detection.min_valid_joints
    );

    let (mut controller, events) = SessionController::new(
        Box::new(SyntheticProvider),
        Box::new(SyntheticModel { phase: 0.0 }),
        android::profile(),
        config,
    );
    controller.start();

    // 受信側がUI/メインコンテキストの役割
    let deadline = Instant::now() + Duration::from_secs(RUN_SECS);
    let mut pose_count = 0u32;
    let mut invalid_count = 0u32;
    let mut stats_timer = Instant::now();

    while Instant::now() < deadline {
        let event = match events.recv_timeout(Duration::from_millis(100)) {
            Ok(e) => e,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };
        match event {
            BridgeEvent::Facing(facing) => {
                log!(logfile, "onCameraFacing: {}", facing.as_str());
            }
            BridgeEvent::Pose(pose) if pose.is_invalid() => {
                invalid_count += 1;
            }
            BridgeEvent::Pose(pose) => {
                pose_count += 1;
                // 1秒に1回だけワイヤ表現のサンプルを出す
                if stats_timer.elapsed() >= Duration::from_secs(1) {
                    log!(
                        logfile,
                        "onPose: {} joints | {}",
                        pose.len(),
                        serde_json::to_string(&pose)?
                    );
                    stats_timer = Instant::now();
                }
            }
            BridgeEvent::Error(err) => {
                log!(logfile, "onPoseError: {}", err);
            }
        }
    }

    controller.stop();
    log!(
        logfile,
        "Done. poses: {}  invalid frames: {}",
        pose_count,
        invalid_count
    );
    Ok(())
}
