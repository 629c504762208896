//! Serialization round-trips, gated behind the `serde` feature.

#![cfg(feature = "serde")]

use chess_core::types::{Move, PieceKind, Square};

#[test]
fn move_round_trips_through_json() {
    let mv = Move::promotion_move(
        Square::from_algebraic("a7").unwrap(),
        Square::from_algebraic("a8").unwrap(),
        PieceKind::Queen,
    );

    let json = serde_json::to_string(&mv).expect("Move must serialize");
    let parsed: Move = serde_json::from_str(&json).expect("Move must deserialize");

    assert_eq!(parsed.from, mv.from);
    assert_eq!(parsed.to, mv.to);
    assert_eq!(parsed.promotion, mv.promotion);
}

#[test]
fn square_round_trips_through_json() {
    let sq = Square::from_algebraic("d4").unwrap();
    let json = serde_json::to_string(&sq).unwrap();
    let parsed: Square = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, sq);
}
