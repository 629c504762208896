//! End-to-end scenarios and quantified invariants over FEN import,
//! make/undo, and the legality filter.

use chess_core::position::Position;
use chess_core::types::{Move, PieceKind, Square};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

#[test]
fn double_pawn_push_sets_en_passant_target() {
    let mut pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let mv = pos.make(Move::quiet(sq("e2"), sq("e4"))).unwrap();

    assert!(!pos.side_to_move.is_white());
    assert_eq!(pos.en_passant_target, Some(sq("e3")));
    assert_eq!(pos.castling_rights, 0b1111);
    assert_eq!(pos.halfmove_clock, 0);

    pos.undo(&mv);
    assert!(pos.side_to_move.is_white());
    assert_eq!(pos.en_passant_target, None);
}

#[test]
fn en_passant_capture_removes_the_skipped_pawn() {
    let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let before_pieces = pos.piece_bitboard(PieceKind::Pawn).count_ones();

    let mv = pos.make(Move::quiet(sq("e5"), sq("d6"))).unwrap();
    assert!(mv.is_en_passant);
    assert_eq!(pos.piece_at(sq("d5")), None);
    assert_eq!(pos.piece_bitboard(PieceKind::Pawn).count_ones(), before_pieces - 1);
    assert_eq!(pos.en_passant_target, None);
    assert_eq!(pos.halfmove_clock, 0);

    pos.undo(&mv);
    assert_eq!(pos.piece_at(sq("d5")), Some((chess_core::types::Color::Black, PieceKind::Pawn)));
}

#[test]
fn kingside_castle_moves_both_king_and_rook() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = pos.make(Move::quiet(sq("e1"), sq("g1"))).unwrap();
    assert!(mv.is_castle);

    assert_eq!(pos.piece_at(sq("g1")).map(|(_, k)| k), Some(PieceKind::King));
    assert_eq!(pos.piece_at(sq("f1")).map(|(_, k)| k), Some(PieceKind::Rook));
    assert_eq!(pos.piece_at(sq("e1")), None);
    assert_eq!(pos.piece_at(sq("h1")), None);
    // White's rights are both cleared; Black's survive untouched.
    assert_eq!(pos.castling_rights, 0b1100);

    pos.undo(&mv);
    assert_eq!(pos.piece_at(sq("e1")).map(|(_, k)| k), Some(PieceKind::King));
    assert_eq!(pos.piece_at(sq("h1")).map(|(_, k)| k), Some(PieceKind::Rook));
}

#[test]
fn lone_pawn_on_seventh_generates_all_four_promotions() {
    let pos = Position::from_fen("8/P7/8/8/8/8/8/4k2K w - - 0 1").unwrap();
    let promos: Vec<_> = pos
        .generate_legal_moves()
        .into_iter()
        .filter(|m| m.from == sq("a7") && m.to == sq("a8"))
        .filter_map(|m| m.promotion)
        .collect();
    assert_eq!(promos.len(), 4);
    for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
        assert!(promos.contains(&kind), "missing promotion to {kind:?}");
    }
}

#[test]
fn king_in_check_is_not_checkmate_when_it_can_step_away() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
    assert!(pos.is_check());
    assert!(!pos.is_checkmate());
    for mv in pos.generate_legal_moves() {
        assert_eq!(mv.from, sq("e1"), "only the king may move while in check here");
    }
}

#[test]
fn threefold_repetition_is_detected_on_the_third_occurrence() {
    let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1").unwrap();
    assert!(!pos.is_draw_by_rules());

    let shuffle = [("g8", "h8"), ("g1", "h1"), ("h8", "g8"), ("h1", "g1")];
    let mut applied = Vec::new();
    for (from, to) in shuffle {
        applied.push(pos.make(Move::quiet(sq(from), sq(to))).unwrap());
    }
    assert!(!pos.is_draw_by_rules(), "only two occurrences so far");

    for (from, to) in shuffle {
        applied.push(pos.make(Move::quiet(sq(from), sq(to))).unwrap());
    }
    assert!(pos.is_draw_by_rules(), "position has now occurred three times");

    for mv in applied.into_iter().rev() {
        pos.undo(&mv);
    }
    assert_eq!(pos.to_fen(), "6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1");
}

#[test]
fn make_undo_restores_zobrist_key_across_every_legal_move() {
    let mut pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let before_key = pos.zobrist_key;
    let before_fen = pos.to_fen();

    for mv in pos.generate_legal_moves() {
        let mut applied = mv;
        pos.make_move(&mut applied);
        pos.undo_move(&applied);
        assert_eq!(pos.zobrist_key, before_key, "zobrist key not restored for {mv:?}");
        assert_eq!(pos.to_fen(), before_fen, "board state not restored for {mv:?}");
    }
}

#[test]
fn incremental_zobrist_matches_a_from_scratch_recompute() {
    let mut pos = Position::new();
    for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")] {
        let mv = pos.make(Move::quiet(sq(from), sq(to))).unwrap();
        let _ = mv;
    }
    let recomputed = Position::from_fen(&pos.to_fen()).unwrap();
    assert_eq!(pos.zobrist_key, recomputed.zobrist_key);
}

#[test]
fn occupancy_partitions_into_piece_kind_bitboards() {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let sum: u32 = PieceKind::ALL.iter().map(|&k| pos.piece_bitboard(k).count_ones()).sum();
    assert_eq!(sum, pos.occupancy().count_ones());
}

#[test]
fn every_legal_move_leaves_the_mover_not_in_check() {
    let mut pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let mover = pos.side_to_move;
    for mv in pos.generate_legal_moves() {
        let mut applied = mv;
        pos.make_move(&mut applied);
        assert!(
            pos.attack_map(pos.side_to_move) & (1u64 << pos.king_square(mover).0) == 0,
            "{mv:?} leaves {mover:?}'s king attacked"
        );
        pos.undo_move(&applied);
    }
}

#[test]
fn fen_rejects_a_missing_king() {
    let err = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1");
    assert!(err.is_err());
}

#[test]
fn make_rejects_a_move_not_in_the_legal_set() {
    let mut pos = Position::new();
    let result = pos.make(Move::quiet(sq("e2"), sq("e5")));
    assert!(result.is_err());
    // The rejected move must not have mutated the position.
    assert!(pos.side_to_move.is_white());
    assert_eq!(pos.piece_at(sq("e2")).map(|(_, k)| k), Some(PieceKind::Pawn));
}
