//! Candidate scoring and filtering
//!
//! Each finalized candidate is checked against the known song:
//!
//! 1. Rejected without a title.
//! 2. Rejected without a score, or below `min_score`.
//! 3. Except for recording-lookup candidates, rejected when the duration is
//!    off by more than `duration_tolerance_ms`. Fingerprint durations are
//!    rounded to whole seconds, so the window must exceed one second.
//! 4. Penalized by `score_penalty` for each mismatch of album, title, track
//!    number and disc number. Track and disc are skipped for sources that do
//!    not report them. Missing values on either side are never penalized.
//!
//! Survivors go into a [`RankedIndex`] by penalized score.

use crate::pool::{CandidateRecord, ResponsePool};
use crate::ranked::RankedIndex;
use crate::types::{AttributeKey, SourceId};
use audioid_common::{KnownSong, MatchConfig};
use std::fmt;
use tracing::debug;

/// Why a candidate was excluded
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MissingTitle,
    MissingScore,
    ScoreBelowMinimum { score: f64 },
    UnknownSource,
    MissingDuration,
    DurationOutOfWindow { delta_ms: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingTitle => write!(f, "no title"),
            Rejection::MissingScore => write!(f, "no score"),
            Rejection::ScoreBelowMinimum { score } => write!(f, "score {} below minimum", score),
            Rejection::UnknownSource => write!(f, "unknown source"),
            Rejection::MissingDuration => write!(f, "no duration"),
            Rejection::DurationOutOfWindow { delta_ms } => {
                write!(f, "duration off by {} ms", delta_ms)
            }
        }
    }
}

/// Scores candidates against a known song
#[derive(Debug, Clone)]
pub struct Scorer {
    config: MatchConfig,
}

impl Scorer {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Penalized score for one candidate, or why it is excluded
    pub fn assess(&self, record: &CandidateRecord, song: &KnownSong) -> Result<f64, Rejection> {
        if !record.has(AttributeKey::Title) {
            return Err(Rejection::MissingTitle);
        }

        let score = record.score().ok_or(Rejection::MissingScore)?;
        if !score.is_finite() || score < self.config.min_score {
            return Err(Rejection::ScoreBelowMinimum { score });
        }

        let source = record.source().ok_or(Rejection::UnknownSource)?;
        if source != SourceId::MusicBrainz {
            self.check_duration(record, song)?;
        }

        let mut mismatches = 0u32;
        if text_mismatch(record, AttributeKey::Album, song.album.as_deref()) {
            mismatches += 1;
        }
        if text_mismatch(record, AttributeKey::Title, song.title.as_deref()) {
            mismatches += 1;
        }
        if source.reports_track_numbers() {
            if number_mismatch(record, AttributeKey::TrackNumber, song.track_number) {
                mismatches += 1;
            }
            if number_mismatch(record, AttributeKey::DiscNumber, song.disc_number) {
                mismatches += 1;
            }
        }

        Ok(score - f64::from(mismatches) * self.config.score_penalty)
    }

    fn check_duration(&self, record: &CandidateRecord, song: &KnownSong) -> Result<(), Rejection> {
        let Some(known) = song.duration_ms else {
            return Ok(());
        };
        let candidate = record
            .number(AttributeKey::Duration)
            .ok_or(Rejection::MissingDuration)?;

        let delta_ms = (candidate - known as f64).abs().round() as u64;
        if delta_ms > self.config.duration_tolerance_ms {
            return Err(Rejection::DurationOutOfWindow { delta_ms });
        }
        Ok(())
    }

    /// Score every finalized candidate, writing penalized scores back
    pub fn rank(&self, pool: &mut ResponsePool, song: &KnownSong) -> RankedIndex {
        let assessed: Vec<(usize, Result<f64, Rejection>)> = pool
            .finalized()
            .map(|(index, record)| (index, self.assess(record, song)))
            .collect();

        let mut ranked = RankedIndex::new();
        for (index, outcome) in assessed {
            match outcome {
                Ok(score) => {
                    pool.set_number(index, AttributeKey::AudioIdScore, score);
                    ranked.insert(score, index);
                    debug!(index, score, "Candidate accepted");
                }
                Err(reason) => debug!(index, reason = %reason, "Candidate rejected"),
            }
        }

        debug!(accepted = ranked.len(), "Scoring complete");
        ranked
    }
}

fn text_mismatch(record: &CandidateRecord, key: AttributeKey, known: Option<&str>) -> bool {
    match (record.text(key), known.filter(|k| !k.is_empty())) {
        (Some(candidate), Some(known)) => candidate != known,
        _ => false,
    }
}

fn number_mismatch(record: &CandidateRecord, key: AttributeKey, known: Option<u32>) -> bool {
    match (record.number(key), known) {
        (Some(candidate), Some(known)) => candidate != f64::from(known),
        _ => false,
    }
}
