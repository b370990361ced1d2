//! Lookup cycle orchestrator
//!
//! # State Progression
//! OFF → START → WAIT → PROCESS → FINISH
//!
//! The orchestrator is polled: every [`LookupOrchestrator::poll`] call makes
//! at most one state transition (or runs one source while in WAIT) and
//! returns whether the cycle is complete. A host event loop can interleave
//! polling with other work.
//!
//! - **OFF**: idle. With a song submitted, moves to START.
//! - **START**: clears the pool and the ranked index.
//! - **WAIT**: one source per call: fingerprint, recording lookup, recognition.
//!   A recording lookup that yields candidates skips the recognition service.
//! - **PROCESS**: scoring then deduplication.
//! - **FINISH**: results ready until the next song is submitted.
//!
//! Each instance owns its own pool; independent songs use independent
//! instances.

use crate::dedup::dedup;
use crate::error::{LookupError, LookupResult};
use crate::pool::{CandidateRecord, ResponsePool};
use crate::ranked::RankedIndex;
use crate::scorer::Scorer;
use crate::sources::{run_source, LookupTransport};
use crate::types::SourceId;
use audioid_common::{DiagnosticsConfig, KnownSong, MatchConfig, TomlConfig};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Lookup cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LookupState {
    Off,
    Start,
    Wait,
    Process,
    Finish,
}

impl LookupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupState::Off => "OFF",
            LookupState::Start => "START",
            LookupState::Wait => "WAIT",
            LookupState::Process => "PROCESS",
            LookupState::Finish => "FINISH",
        }
    }

    /// A cycle is running and must not be interrupted
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LookupState::Start | LookupState::Wait | LookupState::Process
        )
    }
}

impl fmt::Display for LookupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs one identification cycle per submitted song
pub struct LookupOrchestrator<T: LookupTransport> {
    transport: T,
    scorer: Scorer,
    diagnostics: DiagnosticsConfig,
    state: LookupState,
    song: Option<KnownSong>,
    pool: ResponsePool,
    ranked: RankedIndex,
    /// Position in [`SourceId::ROUND_ROBIN`] of the next source to query
    next_source: usize,
    results: Vec<usize>,
    cursor: usize,
}

impl<T: LookupTransport> LookupOrchestrator<T> {
    pub fn new(transport: T, matching: MatchConfig) -> Self {
        Self {
            transport,
            scorer: Scorer::new(matching),
            diagnostics: DiagnosticsConfig::default(),
            state: LookupState::Off,
            song: None,
            pool: ResponsePool::new(),
            ranked: RankedIndex::new(),
            next_source: 0,
            results: Vec::new(),
            cursor: 0,
        }
    }

    /// Build from the full bootstrap configuration
    pub fn from_config(transport: T, config: &TomlConfig) -> Self {
        Self::new(transport, config.matching.clone()).with_diagnostics(config.diagnostics.clone())
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn state(&self) -> LookupState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pool(&self) -> &ResponsePool {
        &self.pool
    }

    /// Submit a song. Refused while a previous cycle is still running.
    pub fn begin_lookup(&mut self, song: KnownSong) -> LookupResult<()> {
        if self.state.is_busy() {
            return Err(LookupError::CycleInProgress);
        }
        debug!(title = ?song.title, "Lookup submitted");
        self.song = Some(song);
        self.transition_to(LookupState::Off);
        Ok(())
    }

    /// Drop the song and every candidate
    pub fn reset(&mut self) {
        self.pool.reset();
        self.ranked = RankedIndex::new();
        self.results.clear();
        self.cursor = 0;
        self.next_source = 0;
        self.song = None;
        self.state = LookupState::Off;
    }

    /// Advance the cycle by one step. Returns true once the cycle is complete
    /// (or when idle with nothing submitted).
    pub fn poll(&mut self) -> bool {
        match self.state {
            LookupState::Off => {
                if self.song.is_none() {
                    return true;
                }
                self.next_source = 0;
                self.transition_to(LookupState::Start);
            }
            LookupState::Start => {
                self.pool.reset();
                self.ranked = RankedIndex::new();
                self.results.clear();
                self.cursor = 0;
                self.transition_to(LookupState::Wait);
            }
            LookupState::Wait => {
                let next = self.dispatch_next();
                self.transition_to(next);
            }
            LookupState::Process => {
                self.process();
                self.transition_to(LookupState::Finish);
            }
            LookupState::Finish => {}
        }
        self.state == LookupState::Finish
    }

    /// Run the next source; returns the state to move to
    fn dispatch_next(&mut self) -> LookupState {
        let Some(song) = self.song.as_ref() else {
            return LookupState::Process;
        };

        while let Some(&source) = SourceId::ROUND_ROBIN.get(self.next_source) {
            self.next_source += 1;

            if source == SourceId::MusicBrainz && song.recording_id().is_none() {
                debug!("No recording id, recording lookup skipped");
                continue;
            }

            let count = run_source(
                &mut self.transport,
                source,
                song,
                &mut self.pool,
                &self.diagnostics,
            );

            if source == SourceId::MusicBrainz && count > 0 {
                debug!(candidates = count, "Recording lookup matched, remaining sources skipped");
                return LookupState::Process;
            }
            if self.next_source >= SourceId::ROUND_ROBIN.len() {
                return LookupState::Process;
            }
            return LookupState::Wait;
        }

        LookupState::Process
    }

    fn process(&mut self) {
        let Some(song) = self.song.as_ref() else {
            return;
        };

        let scored = self.scorer.rank(&mut self.pool, song);
        self.ranked = dedup(&self.pool, &scored);
        self.results = self.ranked.indices();
        self.cursor = 0;

        info!(
            candidates = self.pool.finalized().count(),
            accepted = scored.len(),
            ranked = self.ranked.len(),
            "Lookup complete"
        );
    }

    fn transition_to(&mut self, next: LookupState) {
        if next != self.state {
            debug!(old_state = %self.state, new_state = %next, "State transition");
            self.state = next;
        }
    }

    /// Rewind the result cursor
    pub fn start_iteration(&mut self) {
        self.cursor = 0;
    }

    /// Next candidate index in rank order
    pub fn next_candidate(&mut self) -> Option<usize> {
        let index = self.results.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(index)
    }

    pub fn get_record(&self, index: usize) -> Option<&CandidateRecord> {
        self.pool.get(index)
    }

    /// Ranked candidates, best first
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &CandidateRecord)> + '_ {
        self.results
            .iter()
            .filter_map(move |index| self.pool.get(*index).map(|record| (*index, record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::sources::SourceResponse;

    /// Counts calls; every source answers with nothing
    #[derive(Default)]
    struct Silent {
        calls: Vec<SourceId>,
    }

    impl LookupTransport for Silent {
        fn fingerprint_lookup(&mut self, _: &KnownSong) -> Result<Option<SourceResponse>, TransportError> {
            self.calls.push(SourceId::AcoustId);
            Ok(None)
        }

        fn recording_lookup(&mut self, _: &str) -> Result<Option<SourceResponse>, TransportError> {
            self.calls.push(SourceId::MusicBrainz);
            Ok(None)
        }

        fn recognition_lookup(&mut self, _: &KnownSong) -> Result<Option<SourceResponse>, TransportError> {
            self.calls.push(SourceId::AcrCloud);
            Err(TransportError::Unavailable("rate limited".to_string()))
        }
    }

    fn orchestrator() -> LookupOrchestrator<Silent> {
        LookupOrchestrator::new(Silent::default(), MatchConfig::default())
    }

    #[test]
    fn test_idle_poll_is_complete() {
        let mut orch = orchestrator();
        assert!(orch.poll());
        assert_eq!(orch.state(), LookupState::Off);
    }

    #[test]
    fn test_one_transition_per_poll() {
        let mut orch = orchestrator();
        orch.begin_lookup(KnownSong::new("Song", 180000)).unwrap();

        assert!(!orch.poll());
        assert_eq!(orch.state(), LookupState::Start);
        assert!(!orch.poll());
        assert_eq!(orch.state(), LookupState::Wait);

        // Fingerprint, then recognition (no recording id)
        assert!(!orch.poll());
        assert_eq!(orch.transport().calls, vec![SourceId::AcoustId]);
        assert!(!orch.poll());
        assert_eq!(orch.transport().calls, vec![SourceId::AcoustId, SourceId::AcrCloud]);
        assert_eq!(orch.state(), LookupState::Process);

        assert!(orch.poll());
        assert_eq!(orch.state(), LookupState::Finish);
        assert!(orch.poll(), "finish stays complete");

        orch.start_iteration();
        assert_eq!(orch.next_candidate(), None);
    }

    #[test]
    fn test_begin_refused_while_busy() {
        let mut orch = orchestrator();
        orch.begin_lookup(KnownSong::new("First", 1000)).unwrap();
        orch.poll();

        assert!(matches!(
            orch.begin_lookup(KnownSong::new("Second", 1000)),
            Err(LookupError::CycleInProgress)
        ));

        while !orch.poll() {}
        assert!(orch.begin_lookup(KnownSong::new("Second", 1000)).is_ok());
        assert_eq!(orch.state(), LookupState::Off);
    }

    #[test]
    fn test_reset_twice_then_new_lookup() {
        let mut orch = orchestrator();
        orch.begin_lookup(KnownSong::new("First", 1000)).unwrap();
        while !orch.poll() {}

        orch.reset();
        orch.reset();
        assert_eq!(orch.pool().current_index(), 0);
        assert!(orch.pool().is_empty());

        orch.begin_lookup(KnownSong::new("Second", 1000)).unwrap();
        orch.poll();
        orch.poll();
        assert_eq!(orch.state(), LookupState::Wait);
        assert_eq!(orch.pool().current_index(), 0);
        assert!(orch.pool().is_empty());
    }
}
