//! A transposition table for the minimax core, keyed by
//! `(p1_mask, p2_mask, last_move, p1_to_move)`.
//!
//! Generalized from a fixed-capacity, open-addressed table (viable when
//! boards reduce to a single `u64` Zobrist-ish key) to a `HashMap`, since
//! Niya's key is a 4-tuple with no comparably cheap perfect-hash scheme.
//! Entries carry a bound flag so that only exact values, or
//! correctly-flagged alpha/beta bounds, are ever reused.

use std::collections::HashMap;

use crate::outcome::Outcome;

/// Whether a cached score is the exact minimax value, or merely a bound
/// produced by a cutoff.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// A cached node value: score, outcome, and search depth, plus its bound kind.
#[derive(Copy, Clone, Debug)]
pub struct TtEntry {
    pub score: i8,
    pub outcome: Outcome,
    pub depth: u8,
    pub bound: Bound,
}

/// The key a minimax node is memoized under: the board layout itself is
/// deliberately excluded (a single table is only ever used within one
/// top-level solve, which operates on a single board).
pub type TtKey = (u16, u16, u8, bool);

/// A per-solve transposition table. Created fresh per top-level `solve`
/// call and dropped at the end of it.
#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<TtKey, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: TtKey) -> Option<TtEntry> {
        self.entries.get(&key).copied()
    }

    pub fn insert(&mut self, key: TtKey, entry: TtEntry) {
        self.entries.insert(key, entry);
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
    fn round_trips_a_stored_entry() {
        let mut tt = TranspositionTable::new();
        let key: TtKey = (0b1, 0b10, 3, true);
        let entry = TtEntry {
            score: 1,
            outcome: Outcome::Row,
            depth: 7,
            bound: Bound::Exact,
        };
        tt.insert(key, entry);
        let got = tt.get(key).unwrap();
        assert_eq!(got.score, 1);
        assert_eq!(got.outcome, Outcome::Row);
        assert_eq!(got.depth, 7);
        assert_eq!(got.bound, Bound::Exact);
    }

    #[test]
    fn unknown_key_misses() {
        let tt = TranspositionTable::new();
        assert!(tt.get((0, 0, 0, false)).is_none());
    }
}
