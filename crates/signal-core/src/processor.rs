//! The signal processor: smoothing plus gesture detection behind one lock.
//!
//! Hardware readings arrive on a driver thread while hosts read state from
//! their own loop, so every method takes `&self` and the whole per-sample
//! update runs under a single mutex. A reader never observes a sample that
//! has been smoothed but not yet fed to the gesture detector.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tiltdraw_common::clock::{Clock, SystemClock};

use crate::gesture::{ShakeDetector, ShakeEvent};
use crate::sample::{RawSample, SensorState};
use crate::smoothing::{EmaFilter, DEFAULT_SMOOTHING};

struct ProcessorInner {
    raw: RawSample,
    filter: EmaFilter,
    detector: ShakeDetector,
}

/// Thread-safe accelerometer pipeline. Share it with `Arc`.
pub struct SignalProcessor {
    inner: Mutex<ProcessorInner>,
    clock: Arc<dyn Clock>,
}

impl SignalProcessor {
    /// Processor on the wall clock with the default smoothing factor.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Processor timestamping shakes with the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(ProcessorInner {
                raw: RawSample::default(),
                filter: EmaFilter::new(DEFAULT_SMOOTHING),
                detector: ShakeDetector::new(),
            }),
            clock,
        }
    }

    /// Builder-style initial smoothing factor (clamped).
    pub fn with_smoothing(self, factor: f64) -> Self {
        self.set_smoothing(factor);
        self
    }

    // The state is plain numbers; a panic elsewhere while holding the lock
    // cannot leave it in a shape later samples would trip over.
    fn lock(&self) -> MutexGuard<'_, ProcessorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one hardware reading.
    pub fn ingest(&self, x: f64, y: f64, z: f64) {
        self.ingest_sample(RawSample::new(x, y, z));
    }

    /// Process one simulated tilt sample.
    pub fn ingest_mock(&self, dx: f64, dy: f64) {
        self.ingest_sample(RawSample::mock(dx, dy));
    }

    /// Store the raw sample, smooth it, then run shake detection on the raw
    /// values. Smoothing would flatten the burst the detector looks for.
    pub fn ingest_sample(&self, sample: RawSample) {
        let now = self.clock.now_secs();
        let shake = {
            let mut inner = self.lock();
            inner.raw = sample;
            inner.filter.update(sample.x, sample.y);
            inner.detector.observe(&sample, now)
        };

        if let Some(ShakeEvent {
            time,
            variance,
            count,
        }) = shake
        {
            tracing::info!(time, variance, count, "Shake detected");
        }
    }

    /// Immutable snapshot of the current state.
    pub fn get_state(&self) -> SensorState {
        let inner = self.lock();
        let (x, y) = inner.filter.value();
        SensorState {
            x,
            y,
            raw_x: inner.raw.x,
            raw_y: inner.raw.y,
            shake_time: inner.detector.last_shake_time(),
            shake_count: inner.detector.shake_count(),
        }
    }

    /// Change the smoothing factor for all later samples. Returns the
    /// clamped value that took effect.
    pub fn set_smoothing(&self, factor: f64) -> f64 {
        let effective = self.lock().filter.set_alpha(factor);
        tracing::debug!(requested = factor, effective, "Smoothing factor updated");
        effective
    }

    pub fn smoothing(&self) -> f64 {
        self.lock().filter.alpha()
    }

    /// Live magnitude window, oldest first.
    pub fn history(&self) -> Vec<f64> {
        self.lock().detector.history().iter().copied().collect()
    }

    /// Clear filter, history, and shake state. The smoothing factor stays.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.raw = RawSample::default();
        inner.filter.reset();
        inner.detector.reset();
    }
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalProcessor")
            .field("state", &self.get_state())
            .field("smoothing", &self.smoothing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltdraw_common::clock::ManualClock;

    fn manual() -> (ManualClock, SignalProcessor) {
        let clock = ManualClock::new(100.0);
        let processor = SignalProcessor::with_clock(Arc::new(clock.clone()));
        (clock, processor)
    }

    #[test]
    fn fifteen_unit_samples() {
        let (_, processor) = manual();
        assert_eq!(processor.smoothing(), 0.15);
        for _ in 0..15 {
            processor.ingest(1.0, 0.0, 0.0);
        }
        let state = processor.get_state();
        assert!((state.x - (1.0 - 0.85f64.powi(15))).abs() < 1e-9);
        assert!((state.x - 0.9126).abs() < 1e-4);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.raw_x, 1.0);
        assert_eq!(state.shake_count, 0);
    }

    #[test]
    fn shake_is_timestamped_with_clock() {
        let (clock, processor) = manual();
        for i in 0..10 {
            clock.advance(0.033);
            let x = if i % 2 == 0 { 0.0 } else { 2.0 };
            processor.ingest(x, 0.0, 0.0);
        }
        let state = processor.get_state();
        assert_eq!(state.shake_count, 1);
        assert_eq!(state.shake_time, clock.now_secs());
    }

    #[test]
    fn mock_samples_never_shake() {
        let (clock, processor) = manual();
        // Key input stays within [-1, 1], so magnitudes span [1, sqrt(3)].
        for i in 0..60 {
            clock.advance(0.033);
            let d = if i % 2 == 0 { 1.0 } else { -1.0 };
            processor.ingest_mock(d, -d);
            processor.ingest_mock(0.0, 0.0);
        }
        assert_eq!(processor.get_state().shake_count, 0);
    }

    #[test]
    fn set_smoothing_applies_to_next_sample() {
        let (_, processor) = manual();
        assert_eq!(processor.set_smoothing(0.5), 0.5);
        processor.ingest(1.0, 1.0, 0.0);
        let state = processor.get_state();
        assert_eq!(state.x, 0.5);
        assert_eq!(state.y, 0.5);
        assert_eq!(processor.set_smoothing(7.0), 0.5);
        assert_eq!(processor.set_smoothing(0.0), 0.05);
    }

    #[test]
    fn reset_keeps_smoothing() {
        let (_, processor) = manual();
        processor.set_smoothing(0.3);
        for _ in 0..12 {
            processor.ingest(0.5, 0.5, 0.5);
        }
        processor.reset();
        assert_eq!(processor.get_state(), SensorState::default());
        assert!(processor.history().is_empty());
        assert_eq!(processor.smoothing(), 0.3);
    }

    #[test]
    fn concurrent_ingest_and_read() {
        let (_, processor) = manual();
        let processor = Arc::new(processor);
        let writer = {
            let processor = Arc::clone(&processor);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    processor.ingest(1.0, -1.0, 0.0);
                }
            })
        };

        for _ in 0..2_000 {
            let state = processor.get_state();
            // Both axes are updated under the same lock, so they always
            // move together.
            assert!((state.x + state.y).abs() < 1e-12);
        }
        writer.join().unwrap();
        assert_eq!(processor.history().len(), 20);
    }
}
