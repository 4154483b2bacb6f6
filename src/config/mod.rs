//! Settings file handling
//!
//! The CLI reads a small TOML settings file; the library itself takes plain
//! values and never touches the filesystem.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{FrameRate, CATEGORY_COUNT};
use crate::error::{TimemarkError, TimemarkResult};
use crate::history::DEFAULT_HISTORY_LIMIT;

/// TimeMark settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Category assigned to markers created without one
    pub default_marker_type: usize,
    /// Project frame rate, `FrameRate` syntax ("25", "30000/1001")
    pub frame_rate: String,
    /// Number of undo history entries kept
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_marker_type: 0,
            frame_rate: "25".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Settings {
    /// Load and validate settings from a TOML file
    pub fn load(path: &str) -> TimemarkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings
            .validate()
            .map_err(|e| TimemarkError::SettingsError {
                message: e.to_string(),
            })?;
        Ok(settings)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.default_marker_type >= CATEGORY_COUNT {
            return Err(DomainError::InvalidCategory(format!(
                "default_marker_type {} is outside [0, {})",
                self.default_marker_type, CATEGORY_COUNT
            )));
        }
        if self.history_limit == 0 {
            return Err(DomainError::BadArgs(
                "history_limit must be at least 1".to_string(),
            ));
        }
        FrameRate::parse(&self.frame_rate)?;
        Ok(())
    }

    /// The configured frame rate
    pub fn frame_rate(&self) -> Result<FrameRate, DomainError> {
        FrameRate::parse(&self.frame_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_marker_type, 0);
        assert_eq!(settings.frame_rate().unwrap(), FrameRate::fps_25());
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let settings: Settings = toml::from_str("frame_rate = \"30000/1001\"").unwrap();
        assert_eq!(settings.frame_rate().unwrap(), FrameRate::fps_ntsc());
        assert_eq!(settings.default_marker_type, 0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let settings: Settings = toml::from_str("default_marker_type = 9").unwrap();
        assert!(settings.validate().is_err());

        let settings: Settings = toml::from_str("history_limit = 0").unwrap();
        assert!(settings.validate().is_err());

        let settings: Settings = toml::from_str("frame_rate = \"abc\"").unwrap();
        assert!(settings.validate().is_err());
    }
}
