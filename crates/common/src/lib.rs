//! TiltDraw Common Utilities
//!
//! Shared infrastructure for all TiltDraw crates:
//! - Error types and result aliases
//! - Clocks used to timestamp gestures
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
