//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{TiltError, TiltResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sensor pipeline settings.
    pub sensor: SensorConfig,

    /// Brush canvas settings used by hosts.
    pub canvas: CanvasConfig,

    /// Host tick rate (Hz). The sensor pipeline itself never waits.
    pub tick_rate_hz: u32,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Sensor pipeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Initial EMA coefficient. Clamped to `[0.05, 0.5]` when applied.
    pub smoothing_factor: f64,

    /// Desired accelerometer report interval in milliseconds (~30 Hz).
    pub target_report_interval_ms: u64,

    /// Skip hardware detection and always run on mock input.
    pub force_mock: bool,

    /// Tilt contributed by each held direction key in mock mode.
    pub mock_speed: f64,

    /// Override for the IIO sysfs root (Linux only).
    pub iio_root: Option<PathBuf>,
}

/// Canvas parameters for the brush cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,

    /// Pixels per unit of tilt.
    pub sensitivity: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tiltdraw=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            canvas: CanvasConfig::default(),
            tick_rate_hz: 30,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.15,
            target_report_interval_ms: 33,
            force_mock: false,
            mock_speed: 1.0,
            iio_root: None,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            sensitivity: 150.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SensorConfig {
    pub fn target_report_interval(&self) -> Duration {
        Duration::from_millis(self.target_report_interval_ms)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "Ignoring unusable config");
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> TiltResult<Self> {
        if !path.exists() {
            return Err(TiltError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> TiltResult<()> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> TiltResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values no host can run with.
    pub fn validate(&self) -> TiltResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(TiltError::config("tick_rate_hz must be positive"));
        }
        if self.sensor.target_report_interval_ms == 0 {
            return Err(TiltError::config(
                "sensor.target_report_interval_ms must be positive",
            ));
        }
        if !self.sensor.smoothing_factor.is_finite() {
            return Err(TiltError::config("sensor.smoothing_factor must be finite"));
        }
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(TiltError::config("canvas dimensions must be positive"));
        }
        Ok(())
    }

    /// Host tick period derived from `tick_rate_hz`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate_hz.max(1) as u64)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tiltdraw").join("config.json")
}
