//! Demo kernel: per-frame rotation state for the gimbal lock demo.
//!
//! # Invariants
//! - No windowing or GPU types; everything here runs headless.
//! - The quaternion accumulator is renormalized after every update.
//! - Light projection stays finite for every slider value.

pub mod light;
pub mod rotation;
pub mod state;
pub mod stats;

pub use light::LightRig;
pub use rotation::{EulerAngles, GimbalPose, QuatAccumulator, RotationController, RotationMode};
pub use state::DemoState;
pub use stats::FrameStats;
