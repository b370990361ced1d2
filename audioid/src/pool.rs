//! Candidate store
//!
//! One [`CandidateRecord`] per proposed match, keyed by candidate index, plus
//! the transient state the parse engine threads between descriptor nodes:
//! the index being populated, a pending join phrase, and a pending redirect
//! key.
//!
//! A pool lives for one lookup cycle and is reset at the start of the next.

use crate::types::{parse_finite, AttributeKey, SourceId, Value};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

// ============================================================================
// Candidate record
// ============================================================================

/// Ordered attribute map for one candidate.
///
/// Every record carries its own [`AttributeKey::RespIdx`] equal to the index
/// it is stored under; a mismatch means the store is corrupt and writes are
/// refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    values: BTreeMap<AttributeKey, Value>,
}

impl CandidateRecord {
    fn new(index: usize) -> Self {
        let mut values = BTreeMap::new();
        values.insert(AttributeKey::RespIdx, Value::Num(index as f64));
        Self { values }
    }

    pub fn get(&self, key: AttributeKey) -> Option<&Value> {
        self.values.get(&key)
    }

    /// Non-empty text for a key
    pub fn text(&self, key: AttributeKey) -> Option<Cow<'_, str>> {
        self.values
            .get(&key)
            .filter(|v| !v.is_empty())
            .map(Value::as_text)
    }

    pub fn number(&self, key: AttributeKey) -> Option<f64> {
        self.values.get(&key).and_then(Value::as_f64)
    }

    /// Key holds a non-empty value
    pub fn has(&self, key: AttributeKey) -> bool {
        self.values.get(&key).is_some_and(|v| !v.is_empty())
    }

    pub fn score(&self) -> Option<f64> {
        self.number(AttributeKey::AudioIdScore)
    }

    /// Source stamped when the record was finalized
    pub fn source(&self) -> Option<SourceId> {
        self.number(AttributeKey::AudioIdIdent)
            .and_then(SourceId::from_ident)
    }

    /// Index stamped when the record was created
    pub fn index(&self) -> Option<usize> {
        self.number(AttributeKey::RespIdx).map(|n| n as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, key: AttributeKey, value: Value) {
        self.values.insert(key, value);
    }

    pub(crate) fn remove(&mut self, key: AttributeKey) -> Option<Value> {
        self.values.remove(&key)
    }
}

// ============================================================================
// Response pool
// ============================================================================

/// Result of a single write into the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Value overwrote the field
    Stored,
    /// Value was appended to the existing one using the pending join phrase
    Joined,
    /// Write refused (record integrity mismatch or unparseable score)
    Rejected,
}

/// All candidates of one lookup cycle
#[derive(Debug, Default)]
pub struct ResponsePool {
    records: BTreeMap<usize, CandidateRecord>,
    current_index: usize,
    pending_join_phrase: Option<String>,
    pending_redirect_key: Option<AttributeKey>,
}

impl ResponsePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all records and transient state
    pub fn reset(&mut self) {
        self.records.clear();
        self.current_index = 0;
        self.pending_join_phrase = None;
        self.pending_redirect_key = None;
    }

    /// Existing record, or a new one stamped with its index
    pub fn get_or_create(&mut self, index: usize) -> &mut CandidateRecord {
        self.records
            .entry(index)
            .or_insert_with(|| CandidateRecord::new(index))
    }

    pub fn get(&self, index: usize) -> Option<&CandidateRecord> {
        self.records.get(&index)
    }

    /// Index currently being populated
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of stored records, open or finalized
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records closed by a TOP node, in index order
    pub fn finalized(&self) -> impl Iterator<Item = (usize, &CandidateRecord)> {
        let limit = self.current_index;
        self.records
            .range(..limit)
            .map(|(index, record)| (*index, record))
    }

    pub fn join_phrase(&self) -> Option<&str> {
        self.pending_join_phrase.as_deref()
    }

    /// Install a join phrase for the next write to a non-empty field.
    ///
    /// An empty phrase clears any pending one.
    pub fn install_join_phrase(&mut self, phrase: &str) {
        if phrase.is_empty() {
            self.pending_join_phrase = None;
        } else {
            self.pending_join_phrase = Some(phrase.to_string());
        }
    }

    pub fn clear_join_phrase(&mut self) {
        self.pending_join_phrase = None;
    }

    pub fn pending_redirect(&self) -> Option<AttributeKey> {
        self.pending_redirect_key
    }

    /// Also write the next value under `key`
    pub fn arm_redirect(&mut self, key: AttributeKey) {
        self.pending_redirect_key = Some(key);
    }

    pub fn clear_redirect(&mut self) {
        self.pending_redirect_key = None;
    }

    /// Write a raw value.
    ///
    /// Without a pending join phrase the value overwrites. With one, a
    /// non-empty field becomes `old + phrase + value` and the phrase is
    /// consumed; an empty field is overwritten and the phrase stays pending.
    /// Score keys are parsed as numbers and bypass joining.
    pub fn set_value(&mut self, index: usize, key: AttributeKey, value: &str) -> SetOutcome {
        if key.is_score() {
            return match parse_finite(value) {
                Some(score) => self.set_number(index, key, score),
                None => {
                    debug!(index, key = %key, value, "Unparseable score ignored");
                    SetOutcome::Rejected
                }
            };
        }

        let record = self
            .records
            .entry(index)
            .or_insert_with(|| CandidateRecord::new(index));
        if record.index() != Some(index) {
            warn!(
                index,
                stored = ?record.index(),
                key = %key,
                "Record integrity mismatch, write rejected"
            );
            return SetOutcome::Rejected;
        }

        let existing = record.text(key).map(Cow::into_owned);
        let (stored, outcome) = match existing {
            Some(old) if self.pending_join_phrase.is_some() => {
                let phrase = self.pending_join_phrase.take().unwrap_or_default();
                (format!("{}{}{}", old, phrase, value), SetOutcome::Joined)
            }
            _ => (value.to_string(), SetOutcome::Stored),
        };
        trace!(index, key = %key, value = %stored, "set");
        record.insert(key, Value::Str(stored));

        if let Some(mut target) = self.pending_redirect_key.take() {
            if target == AttributeKey::Composer && key == AttributeKey::ArtistSort {
                target = AttributeKey::ComposerSort;
            }
            trace!(index, key = %target, value, "redirect");
            record.insert(target, Value::Str(value.to_string()));
        }

        outcome
    }

    /// Write a number, bypassing join and redirect handling. NaN and
    /// infinities are rejected.
    pub fn set_number(&mut self, index: usize, key: AttributeKey, value: f64) -> SetOutcome {
        if !value.is_finite() {
            debug!(index, key = %key, value, "Non-finite number ignored");
            return SetOutcome::Rejected;
        }
        self.store(index, key, Value::Num(value))
    }

    /// Overwrite a value as-is, bypassing join and redirect handling
    pub(crate) fn store(&mut self, index: usize, key: AttributeKey, value: Value) -> SetOutcome {
        let record = self.get_or_create(index);
        if record.index() != Some(index) {
            warn!(
                index,
                stored = ?record.index(),
                key = %key,
                "Record integrity mismatch, write rejected"
            );
            return SetOutcome::Rejected;
        }
        record.insert(key, value);
        SetOutcome::Stored
    }

    /// Close the record at the current index and move to the next one.
    ///
    /// Stamps the source, forces the recording-lookup score to 100, and fills
    /// every still-empty attribute from the previous record, whichever
    /// source produced it. Index and source markers never propagate; the
    /// score does not propagate for recording-lookup candidates.
    pub(crate) fn finalize(&mut self, source: SourceId) -> usize {
        let index = self.current_index;

        let inherited: Vec<(AttributeKey, Value)> = index
            .checked_sub(1)
            .and_then(|prev| self.records.get(&prev))
            .map(|prev| {
                prev.iter()
                    .filter(|(key, _)| {
                        !matches!(key, AttributeKey::RespIdx | AttributeKey::AudioIdIdent)
                    })
                    .filter(|(key, _)| !(key.is_score() && source == SourceId::MusicBrainz))
                    .map(|(key, value)| (key, value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let record = self.get_or_create(index);
        record.insert(AttributeKey::AudioIdIdent, Value::Num(source.ident()));
        if source == SourceId::MusicBrainz {
            record.insert(AttributeKey::AudioIdScore, Value::Num(100.0));
        }

        let mut propagated = 0;
        for (key, value) in inherited {
            if !record.has(key) {
                record.insert(key, value);
                propagated += 1;
            }
        }

        debug!(index, source = %source, propagated, "Candidate finalized");
        self.current_index += 1;
        index
    }

    /// Drop a record left open at the end of a parse pass
    pub(crate) fn discard_pending(&mut self) {
        if self.records.remove(&self.current_index).is_some() {
            debug!(index = self.current_index, "Discarded unfinished record");
        }
        self.pending_join_phrase = None;
        self.pending_redirect_key = None;
    }
}
