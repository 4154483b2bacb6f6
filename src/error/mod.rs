//! Error handling module for TimeMark

use thiserror::Error;

/// Main error type for TimeMark operations
#[derive(Error, Debug)]
pub enum TimemarkError {
    /// Marker file not found or inaccessible
    #[error("Marker file not found: {path}")]
    MarkerFileNotFound { path: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Invalid frame rate specification
    #[error("Invalid frame rate: {rate}. Expected fps (e.g. 25) or a rational (e.g. 30000/1001)")]
    InvalidFrameRate { rate: String },

    /// Marker import error
    #[error("Failed to import markers: {message}")]
    ImportError { message: String },

    /// Settings file error
    #[error("Invalid settings: {message}")]
    SettingsError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for TimeMark operations
pub type TimemarkResult<T> = std::result::Result<T, TimemarkError>;
