//! Adjacent duplicate removal
//!
//! Walks the ranked order once, comparing each candidate only with the last
//! one kept. Two candidates are duplicates when every identity field that is
//! non-empty on both sides has the same text. Duplicates separated by a
//! differing candidate are both kept.

use crate::pool::{CandidateRecord, ResponsePool};
use crate::ranked::RankedIndex;
use crate::types::AttributeKey;
use once_cell::sync::Lazy;
use tracing::debug;

/// Identity fields compared for duplicates (score and source excluded)
pub static DUPLICATE_CHECK_KEYS: Lazy<Vec<AttributeKey>> = Lazy::new(|| {
    AttributeKey::ALL
        .iter()
        .copied()
        .filter(|key| key.is_audio_id())
        .filter(|key| !matches!(key, AttributeKey::AudioIdScore | AttributeKey::AudioIdIdent))
        .collect()
});

/// Candidates agree on every identity field both of them carry
pub fn is_duplicate(a: &CandidateRecord, b: &CandidateRecord) -> bool {
    DUPLICATE_CHECK_KEYS.iter().all(|key| {
        match (a.text(*key), b.text(*key)) {
            (Some(left), Some(right)) => left == right,
            _ => true,
        }
    })
}

/// Rebuild `ranked` without score-adjacent duplicates
pub fn dedup(pool: &ResponsePool, ranked: &RankedIndex) -> RankedIndex {
    let mut kept = RankedIndex::new();
    let mut previous: Option<&CandidateRecord> = None;
    let mut dropped = 0;

    for index in ranked.iter() {
        let Some(record) = pool.get(index) else {
            continue;
        };
        if let Some(prev) = previous {
            if is_duplicate(prev, record) {
                debug!(index, duplicate_of = ?prev.index(), "Duplicate candidate dropped");
                dropped += 1;
                continue;
            }
        }
        kept.insert(record.score().unwrap_or_default(), index);
        previous = Some(record);
    }

    debug!(kept = kept.len(), dropped, "Deduplication complete");
    kept
}
