//! Configuration loading for the audio identification engine
//!
//! Bootstrap configuration lives in a single TOML file. Every field has a
//! built-in default, so a missing or partial file never prevents startup.
//!
//! # Settings Sources Priority
//!
//! 1. Explicit path (command-line argument), which must exist
//! 2. Default path: `<config_dir>/audioid/audioid.toml`
//! 3. Built-in defaults (code constants)
//!
//! Environment variables are applied on top of whichever source won:
//! `AUDIOID_LOG_LEVEL`, `AUDIOID_MIN_SCORE`, `AUDIOID_DUMP_RESPONSES`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "AUDIOID_LOG_LEVEL";
/// Environment variable overriding `matching.min_score`
pub const ENV_MIN_SCORE: &str = "AUDIOID_MIN_SCORE";
/// Environment variable overriding `diagnostics.dump_responses`
pub const ENV_DUMP_RESPONSES: &str = "AUDIOID_DUMP_RESPONSES";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Candidate filtering and scoring thresholds (optional)
    #[serde(default)]
    pub matching: MatchConfig,

    /// Diagnostic aids (optional)
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Thresholds used when scoring candidates against the known song.
///
/// None of these values has a documented derivation; they are tunables,
/// not semantic constants.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchConfig {
    /// Minimum raw score (0-100 scale) a candidate needs to survive filtering
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Maximum allowed duration difference in milliseconds.
    ///
    /// Fingerprint services round durations to the nearest second, so this
    /// must stay above 1000.
    #[serde(default = "default_duration_tolerance_ms")]
    pub duration_tolerance_ms: u64,

    /// Score deduction applied per mismatching field
    #[serde(default = "default_score_penalty")]
    pub score_penalty: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            duration_tolerance_ms: default_duration_tolerance_ms(),
            score_penalty: default_score_penalty(),
        }
    }
}

/// Diagnostic aids, all disabled by default
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiagnosticsConfig {
    /// Write each raw service payload to a fixed file name before parsing
    #[serde(default)]
    pub dump_responses: bool,

    /// Directory for payload dumps (defaults to the OS temp directory)
    #[serde(default)]
    pub dump_dir: Option<PathBuf>,
}

impl DiagnosticsConfig {
    /// Directory payload dumps are written to
    pub fn dump_dir(&self) -> PathBuf {
        self.dump_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_score() -> f64 {
    85.0
}

fn default_duration_tolerance_ms() -> u64 {
    2000
}

fn default_score_penalty() -> f64 {
    1.0
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("audioid").join("audioid.toml"))
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from a file that must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Resolve configuration following the documented priority order.
    ///
    /// An explicit path that cannot be read is an error. A missing default
    /// file is not: a warning is logged and built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                let config = Self::from_file(path)?;
                info!("Configuration loaded from {}", path.display());
                config
            }
            None => match default_config_path() {
                Some(path) if path.exists() => match Self::from_file(&path) {
                    Ok(config) => {
                        info!("Configuration loaded from {}", path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Ignoring unreadable config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                _ => {
                    warn!("No config file found, using built-in defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var(ENV_MIN_SCORE) {
            match raw.trim().parse::<f64>() {
                Ok(score) => self.matching.min_score = score,
                Err(_) => warn!("{} is not a number: {:?}", ENV_MIN_SCORE, raw),
            }
        }

        if let Ok(raw) = std::env::var(ENV_DUMP_RESPONSES) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.diagnostics.dump_responses = true,
                "0" | "false" | "no" | "off" => self.diagnostics.dump_responses = false,
                _ => warn!("{} is not a boolean: {:?}", ENV_DUMP_RESPONSES, raw),
            }
        }
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;
        if !m.min_score.is_finite() || m.min_score < 0.0 || m.min_score > 100.0 {
            return Err(Error::Config(format!(
                "matching.min_score must be within 0-100, got {}",
                m.min_score
            )));
        }
        if !m.score_penalty.is_finite() || m.score_penalty < 0.0 {
            return Err(Error::Config(format!(
                "matching.score_penalty must be non-negative, got {}",
                m.score_penalty
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.matching.min_score, 85.0);
        assert_eq!(config.matching.duration_tolerance_ms, 2000);
        assert_eq!(config.matching.score_penalty, 1.0);
        assert!(!config.diagnostics.dump_responses);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str("[matching]\nmin_score = 90.0\n").unwrap();
        assert_eq!(config.matching.min_score, 90.0);
        assert_eq!(config.matching.duration_tolerance_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[matching\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        let mut config = TomlConfig::default();
        config.matching.min_score = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dump_dir_falls_back_to_temp() {
        let diag = DiagnosticsConfig::default();
        assert_eq!(diag.dump_dir(), std::env::temp_dir());
    }
}
