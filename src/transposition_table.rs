//! A two-bound transposition table: a direct-mapped, power-of-two-sized
//! array of optional entries. Replacement is always-replace-newest per
//! §4.6 — collisions at the same index are accepted silently since `hash`
//! is re-verified on every probe — with a `side_to_move` check added to the
//! probe so a same-hash-different-side collision can never be trusted.

use std::mem;

use crate::types::{Color, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Clone, Debug)]
pub struct TTEntry {
    pub hash: u64,
    pub side_to_move: Color,
    pub depth: u32,
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
    /// Generation counter (wraps) used to prefer newer entries when replacing.
    pub generation: u8,
}

pub struct TranspositionTable {
    table: Vec<Option<TTEntry>>,
    mask: usize,
    pub generation: u8,
}

impl TranspositionTable {
    /// Create a new table sized approximately `size_mb` megabytes, rounded
    /// down to a power-of-two entry count.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Option<TTEntry>>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;

        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }

        TranspositionTable {
            table: vec![None; num_entries],
            mask: num_entries - 1,
            generation: 0,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Look up `hash` for the given side to move. Returns `None` on a miss
    /// or on an index collision between two different positions.
    #[must_use]
    pub fn probe(&self, hash: u64, side_to_move: Color) -> Option<&TTEntry> {
        let index = self.index(hash);
        self.table[index]
            .as_ref()
            .filter(|entry| entry.hash == hash && entry.side_to_move == side_to_move)
    }

    /// Store an entry for `hash`, unconditionally replacing whatever
    /// currently occupies that index — always-replace-newest (§4.6).
    pub fn store(
        &mut self,
        hash: u64,
        side_to_move: Color,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        let index = self.index(hash);
        self.table[index] = Some(TTEntry {
            hash,
            side_to_move,
            depth,
            score,
            bound_type,
            best_move,
            generation: self.generation,
        });
    }

    /// Bump the generation counter between iterative-deepening iterations so
    /// newer entries are preferred over stale ones on replacement.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.table {
            *slot = None;
        }
        self.generation = 0;
        #[cfg(feature = "logging")]
        log::debug!("transposition table cleared ({} entries)", self.table.len());
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(64)
    }
}
