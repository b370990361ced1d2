//! Transport answering from a script, recording every call

use audioid::{LookupTransport, SourceId, SourceResponse, TransportError};
use audioid_common::KnownSong;

/// What a scripted source answers
#[derive(Debug, Clone)]
pub enum Reply {
    Payload(SourceResponse),
    Nothing,
    Fail(String),
}

#[derive(Debug)]
pub struct ScriptedTransport {
    pub fingerprint: Reply,
    pub recording: Reply,
    pub recognition: Reply,
    /// Sources queried, in order
    pub calls: Vec<SourceId>,
    /// Recording ids passed to the recording lookup
    pub recording_ids: Vec<String>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self {
            fingerprint: Reply::Nothing,
            recording: Reply::Nothing,
            recognition: Reply::Nothing,
            calls: Vec::new(),
            recording_ids: Vec::new(),
        }
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(mut self, reply: Reply) -> Self {
        self.fingerprint = reply;
        self
    }

    pub fn recording(mut self, reply: Reply) -> Self {
        self.recording = reply;
        self
    }

    pub fn recognition(mut self, reply: Reply) -> Self {
        self.recognition = reply;
        self
    }

    fn answer(reply: &Reply) -> Result<Option<SourceResponse>, TransportError> {
        match reply {
            Reply::Payload(response) => Ok(Some(response.clone())),
            Reply::Nothing => Ok(None),
            Reply::Fail(reason) => Err(TransportError::Unavailable(reason.clone())),
        }
    }
}

impl LookupTransport for ScriptedTransport {
    fn fingerprint_lookup(
        &mut self,
        _song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.calls.push(SourceId::AcoustId);
        Self::answer(&self.fingerprint)
    }

    fn recording_lookup(
        &mut self,
        recording_id: &str,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.calls.push(SourceId::MusicBrainz);
        self.recording_ids.push(recording_id.to_string());
        Self::answer(&self.recording)
    }

    fn recognition_lookup(
        &mut self,
        _song: &KnownSong,
    ) -> Result<Option<SourceResponse>, TransportError> {
        self.calls.push(SourceId::AcrCloud);
        Self::answer(&self.recognition)
    }
}
