//! TiltDraw Sensor Sources
//!
//! Feeds the signal processor from one of two interchangeable sources:
//!
//! - **Hardware:** a platform accelerometer pushing readings from its own
//!   thread (Linux Industrial I/O today)
//! - **Mock:** directional key state polled once per host tick
//!
//! [`SensorService`] picks a source at construction and silently falls back
//! to mock input whenever the hardware path fails.

pub mod backends;
pub mod hardware;
pub mod mock;
pub mod service;

use std::sync::Arc;
use std::time::Duration;

use tiltdraw_common::error::TiltResult;
use tiltdraw_signal_core::sample::{InputMode, RawSample};

pub use backends::acquire_default_accelerometer;
pub use hardware::HardwareSource;
pub use mock::{Direction, MockControls, MockSource};
pub use service::SensorService;

/// Receives readings pushed by a device, possibly from a driver thread.
pub type ReadingCallback = Arc<dyn Fn(RawSample) + Send + Sync>;

/// A physical accelerometer handle.
pub trait Accelerometer: Send {
    /// Device name for logging.
    fn name(&self) -> &str;

    /// Fastest report interval the device supports.
    fn minimum_report_interval(&self) -> Duration;

    /// Currently configured report interval.
    fn report_interval(&self) -> Duration;

    fn set_report_interval(&mut self, interval: Duration) -> TiltResult<()>;

    /// Start delivering readings to `callback`.
    fn on_reading(&mut self, callback: ReadingCallback) -> TiltResult<()>;

    /// Stop delivering readings. No callbacks run after this returns.
    fn remove_reading_callback(&mut self) -> TiltResult<()>;
}

/// Where raw samples come from, as seen by the sensor service.
///
/// Push sources deliver through the sink given to [`attach`](Self::attach);
/// pull sources hand out one sample per [`poll`](Self::poll).
pub trait SampleSource: Send {
    /// Source name for logging.
    fn name(&self) -> &str;

    fn mode(&self) -> InputMode;

    fn attach(&mut self, sink: ReadingCallback) -> TiltResult<()>;

    fn detach(&mut self) -> TiltResult<()>;

    /// Next sample for this tick, if the source is pull-based.
    fn poll(&mut self) -> Option<RawSample>;
}
