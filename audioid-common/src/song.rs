//! The locally known song being identified
//!
//! Candidates returned by the identification services are scored against
//! this metadata. It is read-only for the duration of a lookup cycle.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata already known locally for the song under identification.
///
/// Every field is optional: a missing value is never penalized when
/// comparing against a candidate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KnownSong {
    /// Audio file the metadata was read from
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub disc_number: Option<u32>,
    /// Song duration in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Recording identifier from an earlier identification (MusicBrainz MBID)
    #[serde(default)]
    pub recording_id: Option<String>,
}

impl KnownSong {
    /// Create a song with only a title and duration set
    pub fn new(title: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            title: Some(title.into()),
            duration_ms: Some(duration_ms),
            ..Default::default()
        }
    }

    /// Parse a song description from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, PathBuf::from("<inline>"))
    }

    /// Load a song description from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path.to_path_buf())
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Song { path, source })
    }

    /// Recording identifier, if present and non-blank
    pub fn recording_id(&self) -> Option<&str> {
        self.recording_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
