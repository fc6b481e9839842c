//! Exponential moving average over the two planar tilt axes.
//!
//! `smooth = raw * alpha + smooth * (1 - alpha)` per axis. Lower alpha is
//! smoother, higher alpha is more responsive.

/// Smallest accepted smoothing coefficient.
pub const MIN_SMOOTHING: f64 = 0.05;
/// Largest accepted smoothing coefficient.
pub const MAX_SMOOTHING: f64 = 0.5;
/// Coefficient used until a host changes it.
pub const DEFAULT_SMOOTHING: f64 = 0.15;

/// Clamp a requested coefficient into `[MIN_SMOOTHING, MAX_SMOOTHING]`.
///
/// NaN has no meaningful clamp and maps to [`DEFAULT_SMOOTHING`].
pub fn clamp_smoothing(factor: f64) -> f64 {
    if factor.is_nan() {
        return DEFAULT_SMOOTHING;
    }
    factor.clamp(MIN_SMOOTHING, MAX_SMOOTHING)
}

/// Two-axis first-order low-pass filter. Starts at the origin.
#[derive(Debug, Clone)]
pub struct EmaFilter {
    alpha: f64,
    x: f64,
    y: f64,
}

impl EmaFilter {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: clamp_smoothing(alpha),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set the coefficient, returning the clamped value that took effect.
    pub fn set_alpha(&mut self, alpha: f64) -> f64 {
        self.alpha = clamp_smoothing(alpha);
        self.alpha
    }

    /// Feed one raw sample and return the new smoothed value.
    pub fn update(&mut self, x: f64, y: f64) -> (f64, f64) {
        self.x = x * self.alpha + self.x * (1.0 - self.alpha);
        self.y = y * self.alpha + self.y * (1.0 - self.alpha);
        (self.x, self.y)
    }

    pub fn value(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Return the filter to the origin, keeping alpha.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }
}

impl Default for EmaFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}
