//! A fixed-capacity repetition table: counts, per Zobrist hash, how many
//! times a position has occurred along the current search/game line.
//! Owned by the search session (or the UCI-adjacent game driver), not by
//! [`crate::position::Position`] itself, so a search can push/pop positions
//! on its own stack without disturbing the position's own move history.

use std::collections::HashMap;

pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    #[must_use]
    pub fn new() -> Self {
        RepetitionTable { counts: HashMap::new() }
    }

    /// Like [`RepetitionTable::new`], pre-sizing the backing map for a game
    /// expected to run about `capacity` plies deep, so the common case
    /// doesn't rehash partway through a search.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RepetitionTable { counts: HashMap::with_capacity(capacity) }
    }

    /// Record that `hash` has now been reached (called after `make_move`).
    pub fn push(&mut self, hash: u64) {
        *self.counts.entry(hash).or_insert(0) += 1;
    }

    /// Undo a previous [`RepetitionTable::push`] (called after `undo_move`).
    pub fn pop(&mut self, hash: u64) {
        if let Some(count) = self.counts.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&hash);
            }
        }
    }

    /// Number of times `hash` has been pushed so far (including the current
    /// occurrence, if the caller already pushed it).
    #[must_use]
    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    /// True once `hash` has occurred twice before (so the current position
    /// is the third occurrence) — the search's cheap draw short-circuit.
    #[must_use]
    pub fn is_threefold(&self, hash: u64) -> bool {
        self.count(hash) >= 3
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        #[cfg(feature = "logging")]
        log::debug!("repetition table cleared");
    }
}

impl Default for RepetitionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_round_trips_to_zero() {
        let mut table = RepetitionTable::new();
        table.push(42);
        table.push(42);
        assert_eq!(table.count(42), 2);
        table.pop(42);
        assert_eq!(table.count(42), 1);
        table.pop(42);
        assert_eq!(table.count(42), 0);
    }

    #[test]
    fn is_threefold_triggers_on_third_occurrence() {
        let mut table = RepetitionTable::new();
        for _ in 0..3 {
            table.push(7);
        }
        assert!(table.is_threefold(7));
    }
}
