//! Push source backed by a physical accelerometer.

use std::time::Duration;

use tiltdraw_common::error::{TiltError, TiltResult};
use tiltdraw_signal_core::sample::{InputMode, RawSample};

use crate::{Accelerometer, ReadingCallback, SampleSource};

/// Report interval for a ~30 Hz pipeline.
pub const TARGET_REPORT_INTERVAL: Duration = Duration::from_millis(33);

/// Slowest of the device minimum and the target, so the device is never
/// asked for more than it can do and never driven faster than needed.
pub fn report_interval_for(minimum: Duration, target: Duration) -> Duration {
    minimum.max(target)
}

pub struct HardwareSource {
    device: Box<dyn Accelerometer>,
    attached: bool,
}

impl HardwareSource {
    /// Configure the device's report interval and wrap it.
    ///
    /// Any configuration failure is reported as [`TiltError::DeviceInit`].
    pub fn new(mut device: Box<dyn Accelerometer>, target: Duration) -> TiltResult<Self> {
        let minimum = device.minimum_report_interval();
        let interval = report_interval_for(minimum, target);

        device.set_report_interval(interval).map_err(|e| match e {
            TiltError::DeviceInit { .. } => e,
            other => TiltError::device_init(other.to_string()),
        })?;

        tracing::info!(
            device = %device.name(),
            minimum_ms = minimum.as_millis() as u64,
            interval_ms = device.report_interval().as_millis() as u64,
            "Accelerometer configured"
        );

        Ok(Self {
            device,
            attached: false,
        })
    }
}

impl SampleSource for HardwareSource {
    fn name(&self) -> &str {
        self.device.name()
    }

    fn mode(&self) -> InputMode {
        InputMode::Hardware
    }

    fn attach(&mut self, sink: ReadingCallback) -> TiltResult<()> {
        if self.attached {
            return Ok(());
        }
        self.device.on_reading(sink).map_err(|e| match e {
            TiltError::CallbackRegistration { .. } => e,
            other => TiltError::callback_registration(other.to_string()),
        })?;
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) -> TiltResult<()> {
        if !self.attached {
            return Ok(());
        }
        self.attached = false;
        self.device.remove_reading_callback().map_err(|e| match e {
            TiltError::CallbackDeregistration { .. } => e,
            other => TiltError::callback_deregistration(other.to_string()),
        })
    }

    /// Readings arrive through the attached sink, never by polling.
    fn poll(&mut self) -> Option<RawSample> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_respects_device_minimum() {
        let target = TARGET_REPORT_INTERVAL;
        assert_eq!(
            report_interval_for(Duration::from_millis(16), target),
            Duration::from_millis(33)
        );
        assert_eq!(
            report_interval_for(Duration::from_millis(50), target),
            Duration::from_millis(50)
        );
    }
}
