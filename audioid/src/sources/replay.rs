//! Transport serving saved payload files
//!
//! Used to re-run identification offline, e.g. against payloads written by
//! `diagnostics.dump_responses`. The format is taken from the file extension,
//! falling back to the service's usual format.

use super::{LookupTransport, SourceResponse};
use crate::error::TransportError;
use crate::parse::PayloadFormat;
use crate::types::SourceId;
use audioid_common::KnownSong;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ReplayTransport {
    acoustid: Option<PathBuf>,
    musicbrainz: Option<PathBuf>,
    acrcloud: Option<PathBuf>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `path` for the given source
    pub fn with_payload(mut self, source: SourceId, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match source {
            SourceId::AcoustId => self.acoustid = path,
            SourceId::MusicBrainz => self.musicbrainz = path,
            SourceId::AcrCloud => self.acrcloud = path,
        }
        self
    }

    fn serve(&self, source: SourceId) -> Result<Option<SourceResponse>, TransportError> {
        let path = match source {
            SourceId::AcoustId => &self.acoustid,
            SourceId::MusicBrainz => &self.musicbrainz,
            SourceId::AcrCloud => &self.acrcloud,
        };
        let Some(path) = path else {
            return Ok(None);
        };

        let body = std::fs::read(path)?;
        let format = format_of(path, source);
        debug!(source = %source, path = %path.display(), format = %format, bytes = body.len(), "Replaying payload");
        Ok(Some(SourceResponse { format, body }))
    }
}

fn format_of(path: &Path, source: SourceId) -> PayloadFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(PayloadFormat::from_extension)
        .unwrap_or(match source {
            SourceId::MusicBrainz => PayloadFormat::Xml,
            SourceId::AcoustId | SourceId::AcrCloud => PayloadFormat::Json,
        })
}

impl LookupTransport for ReplayTransport {
    fn fingerprint_lookup(
        &mut self,
        _song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.serve(SourceId::AcoustId)
    }

    fn recording_lookup(
        &mut self,
        _recording_id: &str,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.serve(SourceId::MusicBrainz)
    }

    fn recognition_lookup(
        &mut self,
        _song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.serve(SourceId::AcrCloud)
    }
}
