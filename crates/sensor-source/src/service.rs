//! Sensor service: source selection and lifecycle around a processor.
//!
//! Hardware failures never reach the host. A missing or broken device at
//! construction, or a failed callback registration at start, downgrades the
//! service to mock input; a failed deregistration at stop is logged and
//! dropped. Hosts observe the outcome through [`SensorService::use_mock`]
//! and [`SensorService::status`].

use std::sync::Arc;

use tiltdraw_common::clock::{Clock, SystemClock};
use tiltdraw_common::config::SensorConfig;
use tiltdraw_common::error::{TiltError, TiltResult};
use tiltdraw_signal_core::processor::SignalProcessor;
use tiltdraw_signal_core::sample::{InputMode, RawSample, SensorState};

use crate::backends::acquire_default_accelerometer;
use crate::hardware::HardwareSource;
use crate::mock::{MockControls, MockSource};
use crate::{Accelerometer, ReadingCallback, SampleSource};

pub struct SensorService {
    processor: Arc<SignalProcessor>,
    source: Box<dyn SampleSource>,
    controls: MockControls,
    mock_speed: f64,
    running: bool,
    status: String,
}

impl SensorService {
    /// Detect hardware per `config` and build a service on the wall clock.
    pub fn new(config: &SensorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &SensorConfig, clock: Arc<dyn Clock>) -> Self {
        let acquired = if config.force_mock {
            tracing::info!("Mock input forced by configuration");
            Ok(None)
        } else {
            acquire_default_accelerometer(config.iio_root.as_deref())
        };
        Self::from_acquisition(acquired, config, clock)
    }

    /// Build from the outcome of a device acquisition attempt.
    ///
    /// `Ok(None)` and any error both end in mock mode.
    pub fn from_acquisition(
        acquired: TiltResult<Option<Box<dyn Accelerometer>>>,
        config: &SensorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let processor =
            Arc::new(SignalProcessor::with_clock(clock).with_smoothing(config.smoothing_factor));
        let controls = MockControls::new();

        let source: Box<dyn SampleSource> = match select_hardware(acquired, config) {
            Some(hardware) => Box::new(hardware),
            None => Box::new(MockSource::new(controls.clone(), config.mock_speed)),
        };

        let status = source.mode().label().to_string();
        Self {
            processor,
            source,
            controls,
            mock_speed: config.mock_speed,
            running: false,
            status,
        }
    }

    /// Begin accepting samples. Calling it again while running does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;

        let processor = Arc::clone(&self.processor);
        let sink: ReadingCallback = Arc::new(move |sample: RawSample| {
            processor.ingest_sample(sample);
        });

        if let Err(e) = self.source.attach(sink) {
            tracing::warn!(
                source = %self.source.name(),
                error = %e,
                "Falling back to mock input"
            );
            self.downgrade_to_mock();
        }

        self.status = self.mode().label().to_string();
        match self.mode() {
            InputMode::Hardware => {
                tracing::info!(source = %self.source.name(), "Started with hardware accelerometer")
            }
            InputMode::Mock => {
                tracing::info!("Started in mock mode; use arrow keys to simulate tilt")
            }
        }
    }

    /// Stop accepting samples. Never fails; detach errors are only logged.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        if let Err(e) = self.source.detach() {
            tracing::warn!(source = %self.source.name(), error = %e, "Ignoring detach failure");
        }
        tracing::info!("Sensor service stopped");
    }

    /// Pull one sample from a polled source into the processor.
    ///
    /// Returns the sample ingested, if any. Push sources and a stopped
    /// service yield `None`.
    pub fn tick(&mut self) -> Option<RawSample> {
        if !self.running {
            return None;
        }
        let sample = self.source.poll()?;
        self.processor.ingest_sample(sample);
        Some(sample)
    }

    /// Feed a simulated tilt sample directly.
    pub fn ingest_mock(&self, dx: f64, dy: f64) {
        self.processor.ingest_mock(dx, dy);
    }

    pub fn get_state(&self) -> SensorState {
        self.processor.get_state()
    }

    /// Returns the clamped factor that took effect.
    pub fn set_smoothing(&self, factor: f64) -> f64 {
        self.processor.set_smoothing(factor)
    }

    pub fn use_mock(&self) -> bool {
        self.mode() == InputMode::Mock
    }

    pub fn mode(&self) -> InputMode {
        self.source.mode()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Human-readable mode, for status displays.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Key state driving mock input. Valid in either mode, so hosts can
    /// bind keys before knowing whether hardware will hold up.
    pub fn mock_controls(&self) -> &MockControls {
        &self.controls
    }

    pub fn processor(&self) -> Arc<SignalProcessor> {
        Arc::clone(&self.processor)
    }

    fn downgrade_to_mock(&mut self) {
        self.source = Box::new(MockSource::new(self.controls.clone(), self.mock_speed));
    }
}

impl Drop for SensorService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SensorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorService")
            .field("source", &self.source.name())
            .field("mode", &self.mode())
            .field("running", &self.running)
            .finish()
    }
}

fn select_hardware(
    acquired: TiltResult<Option<Box<dyn Accelerometer>>>,
    config: &SensorConfig,
) -> Option<HardwareSource> {
    let device = match acquired.and_then(|device| device.ok_or(TiltError::DeviceUnavailable)) {
        Ok(device) => device,
        Err(TiltError::DeviceUnavailable) => {
            if !config.force_mock {
                tracing::info!("No accelerometer found, using mock input");
            }
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Accelerometer unavailable, using mock input");
            return None;
        }
    };

    match HardwareSource::new(device, config.target_report_interval()) {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::warn!(error = %e, "Accelerometer setup failed, using mock input");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::Direction;
    use tiltdraw_common::clock::ManualClock;

    fn mock_service() -> SensorService {
        let config = SensorConfig {
            force_mock: true,
            ..SensorConfig::default()
        };
        SensorService::with_clock(&config, Arc::new(ManualClock::new(0.0)))
    }

    #[test]
    fn forced_mock_never_touches_hardware() {
        let service = mock_service();
        assert!(service.use_mock());
        assert_eq!(service.source_name(), "mock");
        assert_eq!(service.status(), "Mock (Arrow Keys)");
    }

    #[test]
    fn tick_requires_running() {
        let mut service = mock_service();
        assert!(service.tick().is_none());
        service.start();
        assert_eq!(service.tick(), Some(RawSample::mock(0.0, 0.0)));
        service.stop();
        assert!(service.tick().is_none());
    }

    #[test]
    fn held_key_moves_smoothed_state() {
        let mut service = mock_service();
        service.start();
        service.mock_controls().press(Direction::Right);
        for _ in 0..30 {
            service.tick();
        }
        let state = service.get_state();
        assert_eq!(state.raw_x, 1.0);
        assert!(state.x > 0.9 && state.x < 1.0);
        assert_eq!(state.y, 0.0);
    }

    #[test]
    fn initial_smoothing_comes_from_config() {
        let config = SensorConfig {
            force_mock: true,
            smoothing_factor: 0.9,
            ..SensorConfig::default()
        };
        let service = SensorService::with_clock(&config, Arc::new(ManualClock::new(0.0)));
        assert_eq!(service.processor().smoothing(), 0.5);
        assert_eq!(service.set_smoothing(0.01), 0.05);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut service = mock_service();
        service.start();
        service.start();
        assert!(service.is_running());
        service.stop();
        service.stop();
        assert!(!service.is_running());
    }
}
