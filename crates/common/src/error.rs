//! Error types shared across TiltDraw crates.

use std::path::PathBuf;

/// Top-level error type for TiltDraw operations.
///
/// The device variants never escape the sensor service: they are caught at
/// its boundary and turned into a downgrade to mock input.
#[derive(Debug, thiserror::Error)]
pub enum TiltError {
    #[error("No accelerometer available")]
    DeviceUnavailable,

    #[error("Accelerometer initialization failed: {message}")]
    DeviceInit { message: String },

    #[error("Failed to register reading callback: {message}")]
    CallbackRegistration { message: String },

    #[error("Failed to remove reading callback: {message}")]
    CallbackDeregistration { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TiltError.
pub type TiltResult<T> = Result<T, TiltError>;

impl TiltError {
    pub fn device_init(msg: impl Into<String>) -> Self {
        Self::DeviceInit {
            message: msg.into(),
        }
    }

    pub fn callback_registration(msg: impl Into<String>) -> Self {
        Self::CallbackRegistration {
            message: msg.into(),
        }
    }

    pub fn callback_deregistration(msg: impl Into<String>) -> Self {
        Self::CallbackDeregistration {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }
}
