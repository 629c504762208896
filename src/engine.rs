//! The top-level `Engine` entry point: owns a transposition table and
//! repetition table across calls, so a caller can drive one game's worth of
//! `search` invocations without losing cached work between moves.

use std::time::Duration;

use crate::eval::{Evaluator, MaterialEvaluator};
use crate::position::Position;
use crate::repetition::RepetitionTable;
use crate::search::{self, SearchConfig, SearchResult};
use crate::transposition_table::TranspositionTable;
use crate::types::Move;

/// Tuning knobs for an [`Engine`], mirroring [`SearchConfig`] plus the
/// resources the engine owns across searches.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub tt_size_mb: usize,
    /// Expected plies per game, used to pre-size the repetition table.
    pub repetition_capacity: usize,
    pub min_depth: u32,
    pub max_depth: u32,
    pub quiescence_plies: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { tt_size_mb: 64, repetition_capacity: 256, min_depth: 1, max_depth: 6, quiescence_plies: 4 }
    }
}

/// A search session: a transposition table, a repetition table, and an
/// evaluator, reused across successive calls to [`Engine::search`].
pub struct Engine {
    tt: TranspositionTable,
    repetition: RepetitionTable,
    evaluator: Box<dyn Evaluator>,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            tt: TranspositionTable::new(config.tt_size_mb),
            repetition: RepetitionTable::with_capacity(config.repetition_capacity),
            evaluator: Box::new(MaterialEvaluator),
            config,
        }
    }

    #[must_use]
    pub fn with_evaluator(config: EngineConfig, evaluator: Box<dyn Evaluator>) -> Self {
        Engine {
            tt: TranspositionTable::new(config.tt_size_mb),
            repetition: RepetitionTable::with_capacity(config.repetition_capacity),
            evaluator,
            config,
        }
    }

    /// Record that `pos` has been reached, so the repetition table tracks
    /// it across searches played along the same game line (a caller
    /// replaying moves outside of `search` should call this too).
    pub fn record_position(&mut self, pos: &Position) {
        self.repetition.push(pos.zobrist_key);
    }

    /// Search `pos` for at most `time_budget` (or until `config.max_depth`
    /// is exhausted if `time_budget` is `None`), returning the best move
    /// found.
    pub fn search(&mut self, pos: &mut Position, time_budget: Option<Duration>) -> Option<Move> {
        self.search_verbose(pos, time_budget).best_move
    }

    /// Like [`Engine::search`], but returns the full [`SearchResult`]
    /// (score, depth reached, node count) instead of just the move.
    pub fn search_verbose(&mut self, pos: &mut Position, time_budget: Option<Duration>) -> SearchResult {
        let config = SearchConfig {
            min_depth: self.config.min_depth,
            max_depth: self.config.max_depth,
            time_budget,
            quiescence_plies: self.config.quiescence_plies,
        };
        search::search(pos, &mut self.tt, &mut self.repetition, self.evaluator.as_ref(), &config)
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.repetition.clear();
        #[cfg(feature = "logging")]
        log::info!("engine reset for a new game");
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_returns_a_legal_move_from_the_starting_position() {
        let mut engine = Engine::default();
        let mut pos = Position::new();
        let mv = engine.search(&mut pos, Some(Duration::from_millis(100)));
        assert!(mv.is_some());
    }

    #[test]
    fn new_game_clears_accumulated_state() {
        let mut engine = Engine::default();
        let mut pos = Position::new();
        engine.record_position(&pos);
        engine.search(&mut pos, Some(Duration::from_millis(50)));
        engine.new_game();
        assert_eq!(engine.repetition.count(pos.zobrist_key), 0);
    }
}
