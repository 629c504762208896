//! Fixed-depth negamax search with alpha-beta pruning, a check extension,
//! quiescence over captures, MVV/LVA move ordering, a transposition-table
//! probe/store at every node, and draw short-circuits against the
//! repetition table and the 50-move rule.
//!
//! Grounded in the teacher's `search.rs` negamax/quiescence shape, with its
//! null-move pruning, late-move reductions, internal iterative deepening,
//! and futility pruning left out — this search only does what's listed
//! above, one depth at a time. The wall clock is polled only between
//! top-level moves and at the start of each iterative-deepening
//! iteration; recursive calls never check it.

use std::time::{Duration, Instant};

use crate::eval::{Evaluator, MaterialEvaluator};
use crate::position::Position;
use crate::repetition::RepetitionTable;
use crate::transposition_table::{BoundType, TranspositionTable};
use crate::types::{Move, MoveList};

pub const MATE_SCORE: i32 = 1_000_000;

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Shallowest depth iterative deepening starts from.
    pub min_depth: u32,
    pub max_depth: u32,
    pub time_budget: Option<Duration>,
    /// Plies quiescence is allowed to extend past the nominal search depth.
    pub quiescence_plies: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { min_depth: 1, max_depth: 6, time_budget: None, quiescence_plies: 4 }
    }
}

pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth_reached: u32,
    pub nodes: u64,
}

struct SearchState<'a> {
    tt: &'a mut TranspositionTable,
    repetition: &'a mut RepetitionTable,
    evaluator: &'a dyn Evaluator,
    deadline: Option<Instant>,
    quiescence_plies: u32,
    nodes: u64,
    stopped: bool,
}

impl SearchState<'_> {
    fn time_up(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stopped = true;
            }
        }
        self.stopped
    }
}

/// Run iterative deepening up to `config.max_depth`, stopping early if
/// `config.time_budget` elapses. Each completed depth's best move is kept as
/// the fallback if a deeper iteration is aborted midway.
pub fn search(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    repetition: &mut RepetitionTable,
    evaluator: &dyn Evaluator,
    config: &SearchConfig,
) -> SearchResult {
    let deadline = config.time_budget.map(|d| Instant::now() + d);
    let mut state = SearchState {
        tt,
        repetition,
        evaluator,
        deadline,
        quiescence_plies: config.quiescence_plies,
        nodes: 0,
        stopped: false,
    };

    let mut best_move = None;
    let mut best_score = 0;
    let mut depth_reached = 0;

    let legal = pos.generate_legal_moves();
    if legal.is_empty() {
        return SearchResult { best_move: None, score: 0, depth_reached: 0, nodes: 0 };
    }
    if legal.len() == 1 {
        return SearchResult { best_move: Some(legal[0]), score: 0, depth_reached: 0, nodes: 0 };
    }

    for depth in config.min_depth..=config.max_depth {
        state.tt.new_generation();
        let (mv, score) = root_search(pos, &mut state, depth);
        if state.stopped && depth > 1 {
            break;
        }
        best_move = mv.or(best_move);
        best_score = score;
        depth_reached = depth;
        #[cfg(feature = "logging")]
        log::debug!(
            "iterative deepening: depth={depth} score={best_score} nodes={} best={}",
            state.nodes,
            best_move.map_or_else(|| "none".to_string(), |m| m.to_uci())
        );
        if state.stopped {
            break;
        }
    }

    SearchResult { best_move, score: best_score, depth_reached, nodes: state.nodes }
}

fn root_search(pos: &mut Position, state: &mut SearchState, depth: u32) -> (Option<Move>, i32) {
    let mut moves = pos.generate_legal_moves();
    order_moves(pos, state.tt, &mut moves);

    let mut alpha = -MATE_SCORE * 2;
    let beta = MATE_SCORE * 2;
    let mut best_move = None;

    for mv in &moves {
        if state.time_up() {
            break;
        }
        let mut applied = *mv;
        pos.make_move(&mut applied);
        let child_depth = if pos.in_check { depth } else { depth - 1 };
        state.repetition.push(pos.zobrist_key);
        let score = -negamax(pos, state, child_depth, 1, -beta, -alpha);
        state.repetition.pop(pos.zobrist_key);
        pos.undo_move(&applied);

        if score > alpha {
            alpha = score;
            best_move = Some(applied);
        }
    }

    if let Some(mv) = best_move {
        state.tt.store(pos.zobrist_key, pos.side_to_move, depth, alpha, BoundType::Exact, Some(mv));
    }
    (best_move, alpha)
}

/// `root_distance` counts plies played since the search root (1 at the first
/// recursive call), the opposite direction from `depth`'s countdown — used
/// only to bias mate scores toward faster mates (§4.8 step 3).
fn negamax(pos: &mut Position, state: &mut SearchState, depth: u32, root_distance: u32, mut alpha: i32, beta: i32) -> i32 {
    let original_alpha = alpha;
    let hash = pos.zobrist_key;
    let side = pos.side_to_move;

    if pos.is_draw_by_rules() || state.repetition.is_threefold(hash) {
        return 0;
    }

    let mut hash_move = None;
    if let Some(entry) = state.tt.probe(hash, side) {
        if entry.depth >= depth {
            match entry.bound_type {
                BoundType::Exact => return entry.score,
                BoundType::LowerBound => alpha = alpha.max(entry.score),
                BoundType::UpperBound if entry.score < beta => {
                    if entry.score <= alpha {
                        return entry.score;
                    }
                }
                BoundType::UpperBound => {}
            }
            if alpha >= beta {
                return entry.score;
            }
        }
        hash_move = entry.best_move;
    }

    state.nodes += 1;

    if depth == 0 {
        return quiescence(pos, state, alpha, beta, state.quiescence_plies);
    }

    let mut moves = pos.generate_legal_moves();
    if moves.is_empty() {
        return if pos.in_check {
            -(MATE_SCORE - i32::try_from(root_distance).unwrap_or(0))
        } else {
            0
        };
    }
    order_moves_with_hint(pos, &mut moves, hash_move);

    let mut best_score = -MATE_SCORE * 2;
    let mut best_move = None;

    for mv in &moves {
        let mut applied = *mv;
        pos.make_move(&mut applied);
        let child_depth = if pos.in_check { depth } else { depth - 1 };
        state.repetition.push(pos.zobrist_key);
        let score = -negamax(pos, state, child_depth, root_distance + 1, -beta, -alpha);
        state.repetition.pop(pos.zobrist_key);
        pos.undo_move(&applied);

        if score > best_score {
            best_score = score;
            best_move = Some(applied);
        }
        alpha = alpha.max(best_score);
        if alpha >= beta {
            break;
        }
    }

    let bound_type = if best_score <= original_alpha {
        BoundType::UpperBound
    } else if best_score >= beta {
        BoundType::LowerBound
    } else {
        BoundType::Exact
    };
    state.tt.store(hash, side, depth, best_score, bound_type, best_move);

    best_score
}

/// Quiescence search: keep capturing until the position is "quiet" or
/// `plies_left` runs out, bounded by a stand-pat evaluation.
fn quiescence(pos: &mut Position, state: &mut SearchState, mut alpha: i32, beta: i32, plies_left: u32) -> i32 {
    state.nodes += 1;
    let stand_pat = state.evaluator.evaluate(pos);
    if pos.is_draw_by_rules() {
        return 0;
    }
    if stand_pat >= beta {
        return beta;
    }
    alpha = alpha.max(stand_pat);

    if plies_left == 0 {
        return alpha;
    }

    let mut captures = pos.generate_capture_moves();
    captures.sort_by_key(|m| -mvv_lva_score(pos, m));

    for mv in &captures {
        let mut applied = *mv;
        pos.make_move(&mut applied);
        let score = -quiescence(pos, state, -beta, -alpha, plies_left - 1);
        pos.undo_move(&applied);

        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    alpha
}

#[must_use]
fn mvv_lva_score(pos: &Position, mv: &Move) -> i32 {
    let attacker = pos.piece_at(mv.from).map(|(_, k)| k);
    match (mv.captured, attacker) {
        (Some(victim), Some(attacker)) => {
            crate::eval::piece_value_cp(victim) * 10 - crate::eval::piece_value_cp(attacker)
        }
        (Some(victim), None) => crate::eval::piece_value_cp(victim) * 10,
        (None, _) => 0,
    }
}

fn order_moves(pos: &Position, tt: &TranspositionTable, moves: &mut MoveList) {
    let hash_move = tt.probe(pos.zobrist_key, pos.side_to_move).and_then(|e| e.best_move);
    order_moves_with_hint(pos, moves, hash_move);
}

fn order_moves_with_hint(pos: &Position, moves: &mut MoveList, hash_move: Option<Move>) {
    moves.sort_by_key(|m| {
        let is_hash_move = hash_move.is_some_and(|hm| hm.from == m.from && hm.to == m.to && hm.promotion == m.promotion);
        if is_hash_move {
            i32::MIN
        } else {
            -mvv_lva_score(pos, m)
        }
    });
}

/// Convenience wrapper using the default material evaluator.
#[must_use]
pub fn search_with_defaults(pos: &mut Position, config: &SearchConfig) -> SearchResult {
    let mut tt = TranspositionTable::default();
    let mut repetition = RepetitionTable::default();
    search(pos, &mut tt, &mut repetition, &MaterialEvaluator, config)
}
