//! Host-side helpers that turn sensor state into brush behaviour.
//!
//! The processor produces a tilt signal; a drawing host integrates it into a
//! brush position once per tick and reacts to new shakes.

use crate::sample::{InputMode, SensorState};

/// Pixels per tick per unit of smoothed tilt, as a fraction of sensitivity.
pub const HARDWARE_GAIN: f64 = 0.1;
/// Pixels per tick per unit of key input, as a fraction of sensitivity.
pub const MOCK_GAIN: f64 = 0.05;

/// Brush position integrated from tilt, clamped to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushCursor {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    sensitivity: f64,
}

impl BrushCursor {
    /// A cursor centered on a `width` x `height` canvas.
    pub fn new(width: f64, height: f64, sensitivity: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            x: width / 2.0,
            y: height / 2.0,
            width,
            height,
            sensitivity,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    /// Move by one tick of input and return the requested movement.
    ///
    /// Hardware mode follows the smoothed tilt. Mock mode follows the raw
    /// key deltas directly, since keys carry no noise worth filtering.
    pub fn advance(&mut self, state: &SensorState, mode: InputMode) -> (f64, f64) {
        let (vx, vy, gain) = match mode {
            InputMode::Hardware => (state.x, state.y, HARDWARE_GAIN),
            InputMode::Mock => (state.raw_x, state.raw_y, MOCK_GAIN),
        };
        let speed = self.sensitivity * gain;
        let (dx, dy) = (vx * speed, vy * speed);

        self.x = (self.x + dx).clamp(0.0, self.width);
        self.y = (self.y + dy).clamp(0.0, self.height);
        (dx, dy)
    }

    /// Change canvas bounds, pulling the cursor inside if needed.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.x = self.x.clamp(0.0, self.width);
        self.y = self.y.clamp(0.0, self.height);
    }

    pub fn recenter(&mut self) {
        self.x = self.width / 2.0;
        self.y = self.height / 2.0;
    }
}

/// Detects shakes a consumer has not handled yet.
#[derive(Debug, Clone, Default)]
pub struct ShakeWatcher {
    handled_count: u64,
    handled_time: f64,
}

impl ShakeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once for every snapshot that carries an unseen shake.
    pub fn poll(&mut self, state: &SensorState) -> bool {
        if state.shake_count > self.handled_count {
            self.handled_count = state.shake_count;
            self.handled_time = state.shake_time;
            true
        } else {
            false
        }
    }

    /// Clock seconds of the last shake handled.
    pub fn handled_time(&self) -> f64 {
        self.handled_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilt(x: f64, y: f64) -> SensorState {
        SensorState {
            x,
            y,
            raw_x: x * 10.0,
            raw_y: y * 10.0,
            ..SensorState::default()
        }
    }

    #[test]
    fn starts_centered() {
        let cursor = BrushCursor::new(800.0, 600.0, 150.0);
        assert_eq!(cursor.position(), (400.0, 300.0));
    }

    #[test]
    fn hardware_uses_smoothed_tilt() {
        let mut cursor = BrushCursor::new(800.0, 600.0, 150.0);
        let (dx, dy) = cursor.advance(&tilt(0.5, -0.2), InputMode::Hardware);
        assert!((dx - 7.5).abs() < 1e-9);
        assert!((dy + 3.0).abs() < 1e-9);
        let (x, y) = cursor.position();
        assert!((x - 407.5).abs() < 1e-9);
        assert!((y - 297.0).abs() < 1e-9);
    }

    #[test]
    fn mock_uses_raw_keys() {
        let mut cursor = BrushCursor::new(800.0, 600.0, 150.0);
        let state = SensorState {
            raw_x: -1.0,
            raw_y: 1.0,
            ..SensorState::default()
        };
        let (dx, dy) = cursor.advance(&state, InputMode::Mock);
        assert!((dx + 7.5).abs() < 1e-9);
        assert!((dy - 7.5).abs() < 1e-9);
    }

    #[test]
    fn clamps_to_canvas() {
        let mut cursor = BrushCursor::new(100.0, 100.0, 1_000.0);
        cursor.advance(&tilt(5.0, -5.0), InputMode::Hardware);
        assert_eq!(cursor.position(), (100.0, 0.0));
    }

    #[test]
    fn resize_pulls_cursor_inside() {
        let mut cursor = BrushCursor::new(800.0, 600.0, 150.0);
        cursor.resize(200.0, 100.0);
        assert_eq!(cursor.position(), (200.0, 100.0));
        cursor.recenter();
        assert_eq!(cursor.position(), (100.0, 50.0));
    }

    #[test]
    fn watcher_reports_each_shake_once() {
        let mut watcher = ShakeWatcher::new();
        let mut state = SensorState::default();
        assert!(!watcher.poll(&state));

        state.shake_count = 1;
        state.shake_time = 12.0;
        assert!(watcher.poll(&state));
        assert!(!watcher.poll(&state));
        assert_eq!(watcher.handled_time(), 12.0);

        state.shake_count = 2;
        assert!(watcher.poll(&state));
    }
}
