//! Pull source simulating tilt from directional keys.
//!
//! The host flips key state on press/release through [`MockControls`]; the
//! service polls [`MockSource`] once per tick. Each held direction adds
//! `±speed` to its axis (left/up negative), so opposite keys cancel.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tiltdraw_common::error::{TiltError, TiltResult};
use tiltdraw_signal_core::sample::{InputMode, RawSample};

use crate::{ReadingCallback, SampleSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Unit contribution of this key to `(dx, dy)`.
    fn unit(self) -> (f64, f64) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}

impl FromStr for Direction {
    type Err = TiltError;

    /// Accepts keysym-style names ("Left", "ArrowLeft") and single letters
    /// (`l`, `r`, `u`, `d`), case-insensitively.
    fn from_str(s: &str) -> TiltResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "arrowleft" | "l" => Ok(Direction::Left),
            "right" | "arrowright" | "r" => Ok(Direction::Right),
            "up" | "arrowup" | "u" => Ok(Direction::Up),
            "down" | "arrowdown" | "d" => Ok(Direction::Down),
            other => Err(TiltError::config(format!("unknown direction '{other}'"))),
        }
    }
}

/// Shared key state. Clones observe the same keys.
#[derive(Debug, Clone, Default)]
pub struct MockControls {
    keys: Arc<[AtomicBool; 4]>,
}

impl MockControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, direction: Direction, pressed: bool) {
        self.keys[direction.index()].store(pressed, Ordering::Relaxed);
    }

    pub fn press(&self, direction: Direction) {
        self.set(direction, true);
    }

    pub fn release(&self, direction: Direction) {
        self.set(direction, false);
    }

    pub fn release_all(&self) {
        for direction in Direction::ALL {
            self.release(direction);
        }
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        self.keys[direction.index()].load(Ordering::Relaxed)
    }

    /// Tilt deltas for the held keys, each contributing `±speed`.
    pub fn delta(&self, speed: f64) -> (f64, f64) {
        Direction::ALL
            .iter()
            .filter(|d| self.is_pressed(**d))
            .fold((0.0, 0.0), |(dx, dy), d| {
                let (ux, uy) = d.unit();
                (dx + ux * speed, dy + uy * speed)
            })
    }
}

pub struct MockSource {
    controls: MockControls,
    speed: f64,
}

impl MockSource {
    pub fn new(controls: MockControls, speed: f64) -> Self {
        Self { controls, speed }
    }

    pub fn controls(&self) -> &MockControls {
        &self.controls
    }
}

impl SampleSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn mode(&self) -> InputMode {
        InputMode::Mock
    }

    fn attach(&mut self, _sink: ReadingCallback) -> TiltResult<()> {
        Ok(())
    }

    fn detach(&mut self) -> TiltResult<()> {
        Ok(())
    }

    fn poll(&mut self) -> Option<RawSample> {
        let (dx, dy) = self.controls.delta(self.speed);
        Some(RawSample::mock(dx, dy))
    }
}
