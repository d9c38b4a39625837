use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::camera::feeder::FrameSlot;
use crate::camera::source::{
    CameraProvider, CaptureConfig, PermissionStatus, PreviewSurface,
};
use crate::config::PipelineConfig;
use crate::error::{ErrorCode, PoseError};
use crate::pipeline::bridge::{BridgeEvent, EventBridge};
use crate::pipeline::pump::{InferencePump, PumpOutcome};
use crate::platform::PlatformProfile;
use crate::pose::model::PoseModel;
use crate::pose::normalize::Normalizer;

/// セッションのライフサイクル状態。Session Controllerだけが遷移させる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Running,
    Stopping,
}

/// パイプライン全体のライフサイクルを監督するコントローラ。
///
/// start/stopはUI側スレッドから呼ばれ、キャプチャコールバックと推論は
/// セッションごとに1本の専用ワーカーへ直列化される。非同期完了
/// （権限・バインド・推論）はセッション世代番号でガードし、stop後に
/// 届いた遅延完了は新しいセッションの状態を壊さず破棄される。
pub struct SessionController {
    provider: Arc<Mutex<Box<dyn CameraProvider>>>,
    model: Arc<Mutex<Box<dyn PoseModel>>>,
    profile: PlatformProfile,
    config: PipelineConfig,
    events: mpsc::Sender<BridgeEvent>,
    state: Arc<Mutex<SessionState>>,
    generation: Arc<AtomicU64>,
    preview: Arc<Mutex<Option<Box<dyn PreviewSurface>>>>,
    worker: Option<Worker>,
}

struct Worker {
    slot: Arc<FrameSlot>,
    handle: JoinHandle<()>,
}

impl SessionController {
    /// コントローラとイベント受信側を作る。受信側をUI/メイン
    /// コンテキストで回すのがコンシューマの責務。
    pub fn new(
        provider: Box<dyn CameraProvider>,
        model: Box<dyn PoseModel>,
        profile: PlatformProfile,
        config: PipelineConfig,
    ) -> (Self, mpsc::Receiver<BridgeEvent>) {
        let (tx, rx) = mpsc::channel();
        let controller = Self {
            provider: Arc::new(Mutex::new(provider)),
            model: Arc::new(Mutex::new(model)),
            profile,
            config,
            events: tx,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            preview: Arc::new(Mutex::new(None)),
            worker: None,
        };
        (controller, rx)
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// プレビューサーフェスを登録する。キャプチャ開始前に呼べば
    /// バインド時に接続される。
    pub fn attach_preview(&self, surface: Box<dyn PreviewSurface>) {
        *self.preview.lock().unwrap() = Some(surface);
    }

    /// セッションを開始する。Starting/Running中はno-op。
    /// 権限要求・バインド・キャプチャ開始はワーカー側で非同期に進み、
    /// 結果はイベントチャネルへ届く。
    pub fn start(&mut self) {
        {
            let mut state = self.state.lock().unwrap();
            if *state != SessionState::Idle {
                return;
            }
            *state = SessionState::Starting;
        }

        // 前セッションの終了済みワーカーを回収してから作り直す
        // （シャットダウン済みワーカーの再利用は不可）
        if let Some(worker) = self.worker.take() {
            worker.slot.close();
            let _ = worker.handle.join();
        }

        let session_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let slot = Arc::new(FrameSlot::new());
        let ctx = WorkerContext {
            provider: Arc::clone(&self.provider),
            model: Arc::clone(&self.model),
            profile: self.profile.clone(),
            config: self.config.clone(),
            events: self.events.clone(),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
            session_generation,
            slot: Arc::clone(&slot),
            preview: Arc::clone(&self.preview),
        };
        let handle = thread::spawn(move || run_worker(ctx));
        self.worker = Some(Worker { slot, handle });
    }

    /// セッションを停止する。冪等で、非同期のバインドや推論が
    /// 進行中でも安全に呼べる。
    pub fn stop(&mut self) {
        {
            let mut state = self.state.lock().unwrap();
            if *state == SessionState::Idle && self.worker.is_none() {
                return;
            }
            *state = SessionState::Stopping;
        }

        // 世代を進め、以後に届く完了コールバックを無効化する
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            // クローズで保留フレームを破棄しワーカーを起こす
            worker.slot.close();
            let _ = worker.handle.join();
        }

        *self.state.lock().unwrap() = SessionState::Idle;
    }

    /// コンシューマ起点の明示的リトライ（権限拒否後など）。
    /// 自動リトライはしない方針のため、これが唯一の再入口。
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop();
    }
}

struct WorkerContext {
    provider: Arc<Mutex<Box<dyn CameraProvider>>>,
    model: Arc<Mutex<Box<dyn PoseModel>>>,
    profile: PlatformProfile,
    config: PipelineConfig,
    events: mpsc::Sender<BridgeEvent>,
    state: Arc<Mutex<SessionState>>,
    generation: Arc<AtomicU64>,
    session_generation: u64,
    slot: Arc<FrameSlot>,
    preview: Arc<Mutex<Option<Box<dyn PreviewSurface>>>>,
}

impl WorkerContext {
    /// stop/再startで世代が進んだか
    fn stale(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.session_generation
    }

    fn set_state_if_current(&self, next: SessionState) {
        let mut state = self.state.lock().unwrap();
        if !self.stale() {
            *state = next;
        }
    }
}

/// セッション1回分のワーカー本体。権限→バインド→キャプチャ→推論ループ。
fn run_worker(ctx: WorkerContext) {
    let mut bridge = EventBridge::new(
        ctx.events.clone(),
        Arc::clone(&ctx.generation),
        ctx.session_generation,
        Duration::from_millis(ctx.config.events.error_window_ms),
    );

    // ---- 権限 ----
    let permission = ctx.provider.lock().unwrap().request_permission();
    if ctx.stale() {
        return;
    }
    match permission {
        Ok(PermissionStatus::Granted) => {}
        Ok(PermissionStatus::Denied) => {
            // 自動リトライはしない。明示的なstart()で最初からやり直す。
            ctx.set_state_if_current(SessionState::Idle);
            bridge.error(PoseError::new(
                ErrorCode::PermissionDenied,
                "camera permission denied",
            ));
            return;
        }
        Err(e) => {
            ctx.set_state_if_current(SessionState::Idle);
            bridge.error(PoseError::new(
                ErrorCode::PermissionMissing,
                format!("camera permission missing: {e}"),
            ));
            return;
        }
    }

    // ---- プロバイダ初期化 ----
    let initialized = ctx.provider.lock().unwrap().initialize();
    if ctx.stale() {
        return;
    }
    if let Err(e) = initialized {
        ctx.set_state_if_current(SessionState::Idle);
        bridge.error(PoseError::new(
            ErrorCode::ProviderError,
            format!("provider error: {e}"),
        ));
        return;
    }

    // ---- バインド: 優先リスト順にフォールバック ----
    let capture = CaptureConfig {
        width: ctx.config.camera.width,
        height: ctx.config.camera.height,
        fps: ctx.config.camera.fps,
    };
    let mut session = None;
    for facing in &ctx.config.camera.preference {
        if ctx.stale() {
            return;
        }
        match ctx.provider.lock().unwrap().open(*facing, &capture) {
            Ok(s) => {
                session = Some(s);
                break;
            }
            Err(_) => continue,
        }
    }
    let Some(mut session) = session else {
        ctx.set_state_if_current(SessionState::Idle);
        bridge.error(PoseError::new(
            ErrorCode::BindFailed,
            "no camera selector could be bound",
        ));
        return;
    };
    if ctx.stale() {
        session.stop();
        return;
    }

    if let Some(surface) = ctx.preview.lock().unwrap().take() {
        session.attach_preview(surface);
    }

    // カメラ向きは最初のPoseEventより前に必ず配信する
    let facing = session.facing();
    bridge.facing(facing);

    // ---- キャプチャ開始 ----
    let slot = Arc::clone(&ctx.slot);
    let started = session.start(Box::new(move |frame| {
        slot.push(frame);
    }));
    if let Err(e) = started {
        session.stop();
        ctx.set_state_if_current(SessionState::Idle);
        bridge.error(PoseError::new(
            ErrorCode::StartError,
            format!("start error: {e}"),
        ));
        return;
    }

    ctx.set_state_if_current(SessionState::Running);

    // ---- 推論ループ（このワーカー上で直列） ----
    let normalizer = Normalizer::new(ctx.profile.clone())
        .with_min_valid_joints(ctx.config.detection.min_valid_joints);
    let mut pump = InferencePump::new(Arc::clone(&ctx.model), normalizer, facing.is_mirrored());

    while !ctx.stale() {
        let Some(frame) = ctx.slot.take() else {
            break;
        };
        match pump.process(frame) {
            PumpOutcome::Pose(event) => bridge.pose(event),
            PumpOutcome::Invalid => bridge.invalid_frame(),
            PumpOutcome::Error(err) => {
                // 単発の推論失敗は回復可能: 抑制付きエラーと無効フレームを
                // 流し、次フレームを待つ
                bridge.error(err);
                bridge.invalid_frame();
            }
        }
    }

    session.stop();
    // 世代交代で抜けた場合も保留フレームを処理せず破棄
    ctx.slot.close();
}
