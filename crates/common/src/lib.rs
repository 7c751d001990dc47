//! Steadyframe Common Utilities
//!
//! Shared infrastructure for all Steadyframe crates:
//! - Error types and result aliases
//! - Stage timing for the stabilization pipeline
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
