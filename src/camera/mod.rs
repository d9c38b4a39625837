pub mod feeder;
pub mod frame;
pub mod source;

pub use feeder::FrameSlot;
pub use frame::{FrameBuffer, PoseFrame, VecFrameBuffer};
pub use source::{
    CameraFacing, CameraProvider, CameraSession, CaptureConfig, FrameCallback, PermissionStatus,
    PreviewSurface,
};
