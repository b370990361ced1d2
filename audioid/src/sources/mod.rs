//! Identification sources
//!
//! The engine never talks to a service itself. A [`LookupTransport`] returns
//! raw payloads; this module picks the descriptor table for each payload and
//! feeds it through the parse engine.
//!
//! Source failures are never fatal: a transport error, an unsupported format
//! or a malformed payload is logged and the source contributes no candidates.

pub mod acoustid;
pub mod acrcloud;
pub mod musicbrainz;
mod replay;

pub use replay::ReplayTransport;

use crate::descriptor::Descriptor;
use crate::error::TransportError;
use crate::parse::{parser_for, PayloadFormat};
use crate::pool::ResponsePool;
use crate::types::SourceId;
use audioid_common::{DiagnosticsConfig, KnownSong};
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Raw payload returned by a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    pub format: PayloadFormat,
    pub body: Vec<u8>,
}

impl SourceResponse {
    pub fn xml(body: impl Into<Vec<u8>>) -> Self {
        Self {
            format: PayloadFormat::Xml,
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            format: PayloadFormat::Json,
            body: body.into(),
        }
    }
}

/// Network side of the identification services.
///
/// `Ok(None)` means the service is not configured or had nothing to report.
pub trait LookupTransport {
    /// Acoustic fingerprint lookup for the song's audio
    fn fingerprint_lookup(
        &mut self,
        song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError>;

    /// Recording lookup by a previously known recording identifier
    fn recording_lookup(
        &mut self,
        recording_id: &str,
    ) -> Result<Option<SourceResponse>, TransportError>;

    /// Commercial recognition lookup for the song's audio
    fn recognition_lookup(
        &mut self,
        song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError>;
}

/// Descriptor table for a source payload, if the format is supported
pub fn descriptors_for(source: SourceId, format: PayloadFormat) -> Option<&'static [Descriptor]> {
    match (source, format) {
        (SourceId::AcoustId, PayloadFormat::Json) => Some(&acoustid::JSON_RESPONSE[..]),
        (SourceId::AcoustId, PayloadFormat::Xml) => Some(&acoustid::XML_RESPONSE[..]),
        (SourceId::MusicBrainz, PayloadFormat::Xml) => Some(&musicbrainz::RECORDING_RESPONSE[..]),
        (SourceId::AcrCloud, PayloadFormat::Json) => Some(&acrcloud::MUSIC_RESPONSE[..]),
        _ => None,
    }
}

/// Recording identifier usable for a recording lookup
pub fn valid_recording_id(song: &KnownSong) -> Option<String> {
    let raw = song.recording_id()?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id.hyphenated().to_string()),
        Err(e) => {
            warn!(recording_id = raw, error = %e, "Recording id is not a UUID, skipping recording lookup");
            None
        }
    }
}

/// Query one source and parse its payload into `pool`.
///
/// Returns the number of candidates added.
pub fn run_source<T: LookupTransport + ?Sized>(
    transport: &mut T,
    source: SourceId,
    song: &KnownSong,
    pool: &mut ResponsePool,
    diagnostics: &DiagnosticsConfig,
) -> usize {
    let response = match source {
        SourceId::AcoustId => transport.fingerprint_lookup(song),
        SourceId::MusicBrainz => match valid_recording_id(song) {
            Some(id) => transport.recording_lookup(&id),
            None => return 0,
        },
        SourceId::AcrCloud => transport.recognition_lookup(song),
    };

    let response = match response {
        Ok(Some(response)) => response,
        Ok(None) => {
            debug!(source = %source, "Source returned no payload");
            return 0;
        }
        Err(e) => {
            warn!(source = %source, error = %e, "Source lookup failed");
            return 0;
        }
    };

    if diagnostics.dump_responses {
        dump_payload(&diagnostics.dump_dir(), source, &response);
    }

    let Some(descriptors) = descriptors_for(source, response.format) else {
        warn!(source = %source, format = %response.format, "Unsupported payload format");
        return 0;
    };

    if source == SourceId::AcrCloud && !acrcloud::status_ok(&response) {
        return 0;
    }

    let count = parser_for(response.format).parse_all(&response.body, descriptors, pool, source);
    info!(source = %source, candidates = count, "Source parsed");
    count
}

/// Write a raw payload to `<dir>/audioid-<source>.<ext>`
fn dump_payload(dir: &Path, source: SourceId, response: &SourceResponse) {
    let path = dir.join(format!(
        "audioid-{}.{}",
        source.name(),
        response.format.extension()
    ));
    match std::fs::write(&path, &response.body) {
        Ok(()) => debug!(path = %path.display(), "Payload dumped"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to dump payload"),
    }
}
