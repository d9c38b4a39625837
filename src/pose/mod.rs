pub mod event;
pub mod joint;
pub mod model;
pub mod normalize;

pub use event::{JointSample, PoseEvent};
pub use joint::Joint;
pub use model::{PoseModel, RawJoint, RawJointId, RawPose};
pub use normalize::{NormalizeOutcome, Normalizer, MIN_VALID_JOINTS};
