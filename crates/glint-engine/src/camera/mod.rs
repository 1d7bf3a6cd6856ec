mod core;
mod motion;

pub use core::Camera;
pub use motion::{MotionDelta, ViewportGate, sample_motion};
