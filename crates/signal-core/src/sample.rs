//! Sample and state types exchanged between sources, processor, and hosts.

use serde::{Deserialize, Serialize};

/// `z` value attached to mock samples, which only carry two tilt deltas.
pub const MOCK_Z: f64 = -1.0;

/// One accelerometer reading in g. Not retained after processing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A simulated tilt sample with `z` fixed to [`MOCK_Z`].
    pub fn mock(dx: f64, dy: f64) -> Self {
        Self::new(dx, dy, MOCK_Z)
    }

    /// Euclidean magnitude of the acceleration vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Which kind of input currently drives the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Hardware,
    Mock,
}

impl InputMode {
    /// Human-readable status label shown by hosts.
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Hardware => "Hardware Sensor",
            InputMode::Mock => "Mock (Arrow Keys)",
        }
    }
}

/// Snapshot of the processor, safe to hand to any consumer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorState {
    /// Smoothed X tilt.
    pub x: f64,
    /// Smoothed Y tilt.
    pub y: f64,
    pub raw_x: f64,
    pub raw_y: f64,
    /// Clock seconds of the latest accepted shake, `0.0` if none yet.
    pub shake_time: f64,
    /// Number of shakes accepted so far.
    pub shake_count: u64,
}
