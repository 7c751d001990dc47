//! Steadyframe Core — Trajectory Stabilization
//!
//! Turns raw frame-to-frame camera motion into corrective transforms:
//! - **Integrate:** Accumulate motion samples into an absolute trajectory
//! - **Smooth:** Centered sliding-window mean over the trajectory
//! - **Correct:** Per-frame deltas whose running sum follows the smoothed path
//! - **Render plan:** Warp matrix and border crop for each output frame
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! Motion estimation and frame rendering are plugged in through the
//! [`MotionEstimator`] and [`FrameRenderer`] traits.

pub mod correct;
pub mod integrate;
pub mod pipeline;
pub mod render;
pub mod smooth;
pub mod source;

pub use correct::correct;
pub use integrate::integrate;
pub use pipeline::{Stabilized, Stabilizer};
pub use render::{FrameRenderer, FrameSize, RenderInstruction};
pub use smooth::TrajectorySmoother;
pub use source::{Estimate, MotionEstimator, MotionSource, MotionTrack, SampleOrigin};
