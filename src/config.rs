//! Configuration loading
//!
//! TOML configuration with sensible defaults; a missing file falls back to
//! defaults with a warning rather than failing startup.

use crate::error::ConfigError;
use crate::export::DEFAULT_PREFIX;
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub export: ExportConfig,
}

/// Sampler settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// Sampling period in seconds
    pub period_seconds: u64,
}

/// Export settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory report files are written to
    pub directory: PathBuf,
    /// File name prefix for report files
    pub prefix: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            period_seconds: 300,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no path is
    /// given. A missing file warns and falls back to defaults; a present
    /// but invalid file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::ReadError(format!("{}: {}", path.display(), e))
                })?;
                toml::from_str(&contents)?
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracking.period_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "tracking.period_seconds must be greater than zero".to_string(),
            ));
        }
        if self.export.prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "export.prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tracking_period(&self) -> Duration {
        Duration::from_secs(self.tracking.period_seconds)
    }
}
