use std::sync::Arc;

use proptest::prelude::*;
use tiltdraw_common::clock::ManualClock;
use tiltdraw_signal_core::gesture::{COOLDOWN_SECS, HISTORY_CAPACITY};
use tiltdraw_signal_core::smoothing::{MAX_SMOOTHING, MIN_SMOOTHING};
use tiltdraw_signal_core::SignalProcessor;

fn processor_at(start: f64) -> (ManualClock, SignalProcessor) {
    let clock = ManualClock::new(start);
    let processor = SignalProcessor::with_clock(Arc::new(clock.clone()));
    (clock, processor)
}

/// Ten samples alternating magnitude 0 and 2 at the current clock time.
fn feed_burst(processor: &SignalProcessor) {
    for i in 0..10 {
        let x = if i % 2 == 0 { 0.0 } else { 2.0 };
        processor.ingest(x, 0.0, 0.0);
    }
}

fn feed_rest(processor: &SignalProcessor, samples: usize) {
    for _ in 0..samples {
        processor.ingest(0.0, 0.0, 1.0);
    }
}

#[test]
fn bursts_half_a_second_apart_count_once() {
    let (clock, processor) = processor_at(0.0);
    feed_burst(&processor);
    clock.advance(0.5);
    feed_burst(&processor);

    let state = processor.get_state();
    assert_eq!(state.shake_count, 1);
    assert_eq!(state.shake_time, 0.0);
}

#[test]
fn bursts_a_cooldown_apart_count_twice() {
    let (clock, processor) = processor_at(0.0);
    feed_burst(&processor);
    // Let the window settle so the second burst stands on its own.
    feed_rest(&processor, HISTORY_CAPACITY);
    clock.advance(COOLDOWN_SECS);
    feed_burst(&processor);

    let state = processor.get_state();
    assert_eq!(state.shake_count, 2);
    assert_eq!(state.shake_time, 1.0);
}

#[test]
fn history_keeps_latest_twenty_in_order() {
    let (_, processor) = processor_at(0.0);
    for i in 0..35 {
        processor.ingest(i as f64, 0.0, 0.0);
    }
    let expected: Vec<f64> = (15..35).map(|i| i as f64).collect();
    assert_eq!(processor.history(), expected);
}

proptest! {
    #[test]
    fn smoothing_is_always_clamped(requested in -10.0f64..10.0) {
        let (_, processor) = processor_at(0.0);
        let effective = processor.set_smoothing(requested);
        prop_assert_eq!(effective, requested.max(MIN_SMOOTHING).min(MAX_SMOOTHING));
        prop_assert_eq!(processor.smoothing(), effective);
    }

    #[test]
    fn constant_input_converges_monotonically(
        alpha in MIN_SMOOTHING..=MAX_SMOOTHING,
        x0 in -5.0f64..5.0,
        y0 in -5.0f64..5.0,
    ) {
        let (_, processor) = processor_at(0.0);
        processor.set_smoothing(alpha);

        let mut prev = (x0.abs(), y0.abs());
        for _ in 0..200 {
            processor.ingest(x0, y0, 0.0);
            let state = processor.get_state();
            let gap = ((state.x - x0).abs(), (state.y - y0).abs());
            prop_assert!(gap.0 <= prev.0 + 1e-12);
            prop_assert!(gap.1 <= prev.1 + 1e-12);
            prev = gap;
        }
        prop_assert!(prev.0 < 1e-3 && prev.1 < 1e-3);
    }

    #[test]
    fn warm_up_blocks_shakes(
        samples in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -50.0f64..50.0), 0..10)
    ) {
        let (_, processor) = processor_at(0.0);
        for (x, y, z) in samples {
            processor.ingest(x, y, z);
        }
        prop_assert_eq!(processor.get_state().shake_count, 0);
    }

    #[test]
    fn history_never_exceeds_capacity(count in 0usize..100) {
        let (_, processor) = processor_at(0.0);
        for i in 0..count {
            processor.ingest(i as f64, 1.0, 1.0);
        }
        prop_assert_eq!(processor.history().len(), count.min(HISTORY_CAPACITY));
    }
}
