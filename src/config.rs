//! Engine configuration
//!
//! Loaded from a JSON file. Every field has a default so an empty object
//! (`{}`) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{Event, Logger, Severity};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this structure
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value outside its allowed range
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject malformed query input instead of dropping it (default: false)
    #[serde(default)]
    pub strict: bool,

    /// Upper bound applied to `$top` (default: none)
    #[serde(default)]
    pub max_top: Option<usize>,

    /// Promote date-like strings to dates when loading JSON records (default: true)
    #[serde(default = "default_detect_dates")]
    pub detect_dates: bool,

    /// Minimum severity written by the engine's logger (default: off)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_detect_dates() -> bool {
    true
}

fn default_log_level() -> Severity {
    Severity::Off
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_top: None,
            detect_dates: default_detect_dates(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: display.clone(),
                source,
            })?;
        config.validate()?;

        config
            .logger()
            .event(Event::ConfigLoaded, Severity::Info, &[("path", display.as_str())]);
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_top == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_top",
                reason: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }

    /// Builder-style strict toggle
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builder-style `$top` cap
    pub fn with_max_top(mut self, max_top: usize) -> Self {
        self.max_top = Some(max_top);
        self
    }

    /// Builder-style log level
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = level;
        self
    }

    /// Logger honouring `log_level`
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(!config.strict);
        assert_eq!(config.max_top, None);
        assert!(config.detect_dates);
        assert_eq!(config.log_level, Severity::Off);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"strict": true, "max_top": 50, "log_level": "off"}}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.strict);
        assert_eq!(config.max_top, Some(50));
        assert!(config.detect_dates);
        assert_eq!(config.log_level, Severity::Off);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_max_top_rejected() {
        let config = EngineConfig::default().with_max_top(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_top"));
    }
}
