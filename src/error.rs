//! Error types for the theremin.
//!
//! Nothing on the per-frame or per-sample path returns these; they only
//! surface at startup, at the settings boundary, or from a frame source
//! (where the frame loop swallows them).

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum ThereminError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio output errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Unsupported output config: {0}")]
    UnsupportedConfig(String),

    #[error("Failed to build output stream: {0}")]
    StreamBuild(String),

    #[error("Failed to start output stream: {0}")]
    StreamStart(String),

    #[error("WAV writer error: {0}")]
    Wav(#[from] hound::Error),
}

/// Configuration errors, raised at the setter / CLI boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid setting command: {0}")]
    InvalidCommand(String),
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Frame capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No frame available yet; the tick is skipped
    #[error("Frame not ready")]
    NotReady,

    #[error("Capture failed: {0}")]
    Failed(String),

    #[error("Frame buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BadBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Result type alias for theremin operations
pub type Result<T> = std::result::Result<T, ThereminError>;
