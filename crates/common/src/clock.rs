//! Clocks used to timestamp sensor gestures.
//!
//! Shake timestamps are seconds on a [`Clock`]. Production code uses the
//! wall clock so timestamps are comparable across restarts of a host; tests
//! and log replay drive a [`ManualClock`] instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of "now" in seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> f64;
}

/// Wall-clock seconds since the Unix epoch, microsecond resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start_secs`.
    pub fn new(start_secs: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_secs.to_bits())),
        }
    }

    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, secs: f64) {
        // fetch_update retries on contention, so concurrent advances add up.
        let _ = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + secs).to_bits())
            });
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// Fires at most once per interval of clock time.
///
/// Hosts tick the pipeline at ~30 Hz but usually want to report status
/// far less often.
#[derive(Debug)]
pub struct Throttle {
    interval_secs: f64,
    last_fire: Option<f64>,
}

impl Throttle {
    /// Create a throttle firing at most `hz` times per second.
    pub fn per_second(hz: f64) -> Self {
        Self {
            interval_secs: 1.0 / hz.max(f64::MIN_POSITIVE),
            last_fire: None,
        }
    }

    /// Returns true and re-arms if the interval has elapsed since the last
    /// fire. The first call always fires.
    pub fn ready(&mut self, now_secs: f64) -> bool {
        match self.last_fire {
            Some(last) if now_secs < last + self.interval_secs => false,
            _ => {
                self.last_fire = Some(now_secs);
                true
            }
        }
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_secs() > 1_577_836_800.0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10.0);
        let other = clock.clone();
        clock.advance(0.5);
        assert_eq!(other.now_secs(), 10.5);
        other.set(2.0);
        assert_eq!(clock.now_secs(), 2.0);
    }

    #[test]
    fn concurrent_advances_are_not_lost() {
        let clock = ManualClock::new(0.0);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        clock.advance(1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clock.now_secs(), 4000.0);
    }

    #[test]
    fn throttle_fires_once_per_interval() {
        let mut throttle = Throttle::per_second(4.0);
        assert!(throttle.ready(0.0));
        assert!(!throttle.ready(0.1));
        assert!(throttle.ready(0.25));
        assert!(!throttle.ready(0.4));
        assert!(throttle.ready(0.6));
    }
}
