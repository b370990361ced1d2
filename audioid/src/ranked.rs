//! Score-ordered candidate index
//!
//! Keys are `1000 - round(score * 10)`, so ascending key order is descending
//! score. Equal scores keep insertion order.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RankedIndex {
    entries: BTreeMap<(i64, usize), usize>,
    inserted: usize,
}

impl RankedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort weight for a score
    pub fn weight(score: f64) -> i64 {
        1000 - (score * 10.0).round() as i64
    }

    pub fn insert(&mut self, score: f64, candidate: usize) {
        self.entries
            .insert((Self::weight(score), self.inserted), candidate);
        self.inserted += 1;
    }

    /// Candidate indices, best first
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.values().copied()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_score_order() {
        let mut ranked = RankedIndex::new();
        ranked.insert(89.0, 0);
        ranked.insert(99.5, 1);
        ranked.insert(92.0, 2);

        assert_eq!(ranked.indices(), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut ranked = RankedIndex::new();
        ranked.insert(90.0, 4);
        ranked.insert(90.0, 2);
        ranked.insert(90.04, 7);

        assert_eq!(ranked.indices(), vec![4, 2, 7]);
        assert_eq!(RankedIndex::weight(100.0), 0);
    }
}
