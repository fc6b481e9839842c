//! Shake gesture detection.
//!
//! A shake is a short burst of acceleration energy. Each raw sample's
//! magnitude goes into a rolling window; once the window holds enough
//! samples, the spread `max - min` stands in for burst energy. A spread above
//! [`SHAKE_THRESHOLD`] is a shake, unless one was already accepted within
//! [`COOLDOWN_SECS`].
//!
//! The constants are calibration values and are reproduced exactly.

use std::collections::VecDeque;

use crate::sample::RawSample;

/// Minimum magnitude spread (g) that counts as a shake.
pub const SHAKE_THRESHOLD: f64 = 1.5;
/// Number of recent magnitudes kept.
pub const HISTORY_CAPACITY: usize = 20;
/// Samples required before any shake can be accepted.
pub const MIN_HISTORY: usize = 10;
/// Minimum spacing between accepted shakes.
pub const COOLDOWN_SECS: f64 = 1.0;

/// Fixed-capacity FIFO of recent magnitudes.
#[derive(Debug, Clone)]
pub struct MagnitudeHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl MagnitudeHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a magnitude, evicting the oldest one when full.
    pub fn push(&mut self, magnitude: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(magnitude);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `max - min` over the live window, `None` when empty.
    pub fn range(&self) -> Option<f64> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(max - min)
    }

    /// Live magnitudes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// An accepted shake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeEvent {
    /// Clock seconds at acceptance.
    pub time: f64,
    /// Magnitude spread that triggered it.
    pub variance: f64,
    /// Running count including this shake.
    pub count: u64,
}

/// Rolling-window shake detector with cooldown.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    history: MagnitudeHistory,
    last_shake: Option<f64>,
    count: u64,
}

impl ShakeDetector {
    pub fn new() -> Self {
        Self {
            history: MagnitudeHistory::new(HISTORY_CAPACITY),
            last_shake: None,
            count: 0,
        }
    }

    /// Feed one raw (unsmoothed) sample observed at `now` seconds.
    ///
    /// Returns the shake if this sample was accepted as one. Rejected
    /// candidates leave no trace.
    pub fn observe(&mut self, sample: &RawSample, now: f64) -> Option<ShakeEvent> {
        self.history.push(sample.magnitude());

        if self.history.len() < MIN_HISTORY {
            return None;
        }

        let variance = self.history.range()?;
        if variance <= SHAKE_THRESHOLD || !self.cooled_down(now) {
            return None;
        }

        self.last_shake = Some(now);
        self.count += 1;
        Some(ShakeEvent {
            time: now,
            variance,
            count: self.count,
        })
    }

    // A clock running backwards yields a negative gap, which also fails the
    // check, so the last shake time never decreases.
    fn cooled_down(&self, now: f64) -> bool {
        match self.last_shake {
            None => true,
            Some(last) => now - last >= COOLDOWN_SECS,
        }
    }

    /// Seconds of the latest accepted shake, `0.0` if none.
    pub fn last_shake_time(&self) -> f64 {
        self.last_shake.unwrap_or(0.0)
    }

    pub fn shake_count(&self) -> u64 {
        self.count
    }

    pub fn history(&self) -> &MagnitudeHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_shake = None;
        self.count = 0;
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten samples alternating magnitude 0 and 2, ending on magnitude 2.
    fn burst(detector: &mut ShakeDetector, now: f64) -> Vec<Option<ShakeEvent>> {
        (0..10)
            .map(|i| {
                let x = if i % 2 == 0 { 0.0 } else { 2.0 };
                detector.observe(&RawSample::new(x, 0.0, 0.0), now)
            })
            .collect()
    }

    #[test]
    fn history_evicts_oldest() {
        let mut history = MagnitudeHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            history.push(v);
        }
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.range(), Some(2.0));
    }

    #[test]
    fn empty_history_has_no_range() {
        assert_eq!(MagnitudeHistory::new(4).range(), None);
    }

    #[test]
    fn shake_accepted_on_tenth_sample() {
        let mut detector = ShakeDetector::new();
        let results = burst(&mut detector, 5.0);

        assert!(results[..9].iter().all(Option::is_none));
        let event = results[9].expect("tenth sample should trigger");
        assert_eq!(event.time, 5.0);
        assert_eq!(event.variance, 2.0);
        assert_eq!(event.count, 1);
        assert_eq!(detector.last_shake_time(), 5.0);
    }

    #[test]
    fn magnitude_spans_all_three_axes() {
        let mut detector = ShakeDetector::new();
        let mut accepted = None;
        for i in 0..10 {
            let sample = if i % 2 == 0 {
                RawSample::new(0.0, 0.0, 1.0)
            } else {
                RawSample::new(0.0, 0.0, 3.0)
            };
            accepted = detector.observe(&sample, 2.0);
        }
        assert_eq!(detector.history().iter().last(), Some(&3.0));
        assert_eq!(accepted.map(|e| e.variance), Some(2.0));
    }

    #[test]
    fn nine_wild_samples_never_shake() {
        let mut detector = ShakeDetector::new();
        for i in 0..9 {
            let x = if i % 2 == 0 { 0.0 } else { 50.0 };
            assert!(detector.observe(&RawSample::new(x, 0.0, 0.0), 0.0).is_none());
        }
        assert_eq!(detector.shake_count(), 0);
        assert_eq!(detector.last_shake_time(), 0.0);
    }

    #[test]
    fn spread_equal_to_threshold_is_not_a_shake() {
        let mut detector = ShakeDetector::new();
        for i in 0..12 {
            let x = if i % 2 == 0 { 1.0 } else { 2.5 };
            assert!(detector.observe(&RawSample::new(x, 0.0, 0.0), 0.0).is_none());
        }
    }

    #[test]
    fn cooldown_suppresses_second_burst() {
        let mut detector = ShakeDetector::new();
        burst(&mut detector, 0.0);
        let second = burst(&mut detector, 0.5);
        assert!(second.iter().all(Option::is_none));
        assert_eq!(detector.shake_count(), 1);
        assert_eq!(detector.last_shake_time(), 0.0);
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let mut detector = ShakeDetector::new();
        burst(&mut detector, 0.0);
        let second = burst(&mut detector, 1.0);
        assert!(second.iter().any(Option::is_some));
        assert_eq!(detector.shake_count(), 2);
        assert_eq!(detector.last_shake_time(), 1.0);
    }

    #[test]
    fn clock_going_backwards_is_rejected() {
        let mut detector = ShakeDetector::new();
        burst(&mut detector, 10.0);
        burst(&mut detector, 3.0);
        assert_eq!(detector.last_shake_time(), 10.0);
        assert_eq!(detector.shake_count(), 1);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut detector = ShakeDetector::new();
        burst(&mut detector, 2.0);
        detector.reset();
        assert!(detector.history().is_empty());
        assert_eq!(detector.shake_count(), 0);
        assert_eq!(detector.last_shake_time(), 0.0);
    }
}
