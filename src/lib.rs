//! Bitboard-backed chess move generation and fixed-depth search core.
//!
//! See [`position::Position`] for the game-state representation and
//! [`engine::Engine`] for the search entry point.

pub mod attacks;
pub mod bitboard;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod position;
pub mod repetition;
pub mod san;
pub mod search;
pub mod transposition_table;
pub mod types;
pub mod uci_move;
pub mod zobrist;
