//! Replay a recorded sample log through the pipeline.
//!
//! Each non-empty line not starting with `#` is a JSON object
//! `{"t": seconds, "x": .., "y": .., "z": ..}`. A missing `z` marks a mock
//! sample. Shake timing follows the logged `t`, so replays are
//! deterministic.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use tiltdraw_common::clock::ManualClock;
use tiltdraw_common::error::{TiltError, TiltResult};
use tiltdraw_signal_core::sample::{RawSample, MOCK_Z};
use tiltdraw_signal_core::{ShakeWatcher, SignalProcessor};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReplayRecord {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
}

impl ReplayRecord {
    pub fn sample(&self) -> RawSample {
        RawSample::new(self.x, self.y, self.z.unwrap_or(MOCK_Z))
    }
}

pub fn parse_log(content: &str) -> TiltResult<Vec<ReplayRecord>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(trimmed)
            .map_err(|e| TiltError::replay(format!("line {}: {e}", idx + 1)))?;
        if !record.t.is_finite() {
            return Err(TiltError::replay(format!(
                "line {}: timestamp must be finite",
                idx + 1
            )));
        }
        records.push(record);
    }
    Ok(records)
}

/// Outcome of a replay, for printing and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub samples: usize,
    /// `(sample index, clock seconds)` of each accepted shake.
    pub shakes: Vec<(usize, f64)>,
    pub final_x: f64,
    pub final_y: f64,
}

pub fn replay(
    records: &[ReplayRecord],
    smoothing: Option<f64>,
    mut on_state: impl FnMut(usize, &ReplayRecord, &tiltdraw_signal_core::SensorState),
) -> ReplaySummary {
    let clock = ManualClock::new(records.first().map_or(0.0, |r| r.t));
    let processor = SignalProcessor::with_clock(Arc::new(clock.clone()));
    if let Some(factor) = smoothing {
        processor.set_smoothing(factor);
    }

    let mut watcher = ShakeWatcher::new();
    let mut shakes = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        clock.set(record.t);
        processor.ingest_sample(record.sample());
        let state = processor.get_state();
        if watcher.poll(&state) {
            shakes.push((idx, state.shake_time));
        }
        on_state(idx, record, &state);
    }

    let state = processor.get_state();
    ReplaySummary {
        samples: records.len(),
        shakes,
        final_x: state.x,
        final_y: state.y,
    }
}

pub fn run(path: PathBuf, smoothing: Option<f64>, json: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read replay log {}", path.display()))?;
    let records = parse_log(&content)?;
    tracing::info!(path = %path.display(), samples = records.len(), "Replaying sample log");

    let summary = replay(&records, smoothing, |idx, _, state| {
        if json {
            match serde_json::to_string(state) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(sample = idx, error = %e, "Failed to encode state"),
            }
        }
    });

    if !json {
        println!("Samples: {}", summary.samples);
        println!("Shakes: {}", summary.shakes.len());
        for (idx, time) in &summary.shakes {
            println!("  sample {idx} at t={time:.3}s");
        }
        println!(
            "Final smoothed tilt: X: {:+.4}  Y: {:+.4}",
            summary.final_x, summary.final_y
        );
    }
    Ok(())
}
