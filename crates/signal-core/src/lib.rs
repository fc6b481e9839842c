//! TiltDraw Signal Core
//!
//! Turns raw accelerometer samples into brush motion:
//! - **Smoothing:** first-order low-pass (EMA) over the planar axes
//! - **Gestures:** shake detection over a rolling magnitude window
//! - **Processor:** thread-safe owner of both, fed by hardware or mock input
//! - **Cursor:** host-side integration of the smoothed signal into a brush
//!   position
//!
//! This crate is pure computation. No I/O, no platform dependencies.

pub mod cursor;
pub mod gesture;
pub mod processor;
pub mod sample;
pub mod smoothing;

pub use cursor::{BrushCursor, ShakeWatcher};
pub use gesture::{ShakeDetector, ShakeEvent};
pub use processor::SignalProcessor;
pub use sample::{InputMode, RawSample, SensorState};
pub use smoothing::EmaFilter;
