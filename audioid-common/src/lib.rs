//! # Audio Identification Common Library
//!
//! Shared code for the audio identification workspace:
//! - Error and result types
//! - TOML bootstrap configuration (logging, matching thresholds, diagnostics)
//! - The locally known song that candidates are matched against

pub mod config;
pub mod error;
pub mod song;

pub use config::{DiagnosticsConfig, LoggingConfig, MatchConfig, TomlConfig};
pub use error::{Error, Result};
pub use song::KnownSong;
