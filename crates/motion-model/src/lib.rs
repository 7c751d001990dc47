//! Steadyframe Motion Model
//!
//! Defines the data contracts shared by the stabilization pipeline:
//! - **Samples:** Relative frame-to-frame rigid motion `(dx, dy, da)`
//! - **Trajectory:** Absolute camera pose obtained by accumulating samples
//! - **Motion logs:** Text and JSONL encodings of sample sequences
//!
//! Angles are in radians; translations are in pixels.

pub mod motion_log;
pub mod sample;

pub use motion_log::*;
pub use sample::*;
