pub mod bridge;
pub mod pump;
pub mod session;

pub use bridge::{BridgeEvent, ErrorThrottle, EventBridge, ERROR_WINDOW_MS};
pub use pump::{InferencePump, PumpOutcome};
pub use session::{SessionController, SessionState};
