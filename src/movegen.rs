//! Legal move assembly: pseudo-legal generation per piece kind, filtered
//! directly against the position's precomputed check/pin state rather than
//! by trying each move and asking whether the king ends up attacked.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_moves, queen_attacks, rook_attacks};
use crate::bitboard::enumerate_bits;
use crate::position::Position;
use crate::types::{castling, Move, MoveList, PieceKind, Square};

impl Position {
    /// Every legal move in this position. Empty means checkmate (if
    /// [`Position::in_check`] at the time) or stalemate.
    #[must_use]
    pub fn generate_legal_moves(&self) -> MoveList {
        let mut moves = Vec::new();

        if self.in_double_check {
            self.generate_king_moves(&mut moves);
            return moves;
        }

        let allowed = if self.in_check { self.check_map } else { u64::MAX };
        self.generate_pawn_moves(&mut moves, allowed);
        self.generate_knight_moves(&mut moves, allowed);
        self.generate_slider_moves(&mut moves, PieceKind::Bishop, allowed);
        self.generate_slider_moves(&mut moves, PieceKind::Rook, allowed);
        self.generate_slider_moves(&mut moves, PieceKind::Queen, allowed);
        self.generate_king_moves(&mut moves);
        if !self.in_check {
            self.generate_castling_moves(&mut moves);
        }
        moves
    }

    /// Only capturing (and promoting) moves, for quiescence search.
    #[must_use]
    pub fn generate_capture_moves(&self) -> MoveList {
        self.generate_legal_moves()
            .into_iter()
            .filter(|mv| mv.is_capture() || mv.promotion.is_some())
            .collect()
    }

    /// Count leaf nodes reachable in exactly `depth` plies, the canonical
    /// move-generation correctness harness.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            let mut applied = mv;
            self.make_move(&mut applied);
            nodes += self.perft(depth - 1);
            self.undo_move(&applied);
        }
        nodes
    }

    fn finalize(&self, mut mv: Move) -> Move {
        if !mv.is_en_passant && !mv.is_castle {
            if let Some((_, kind)) = self.piece_at(mv.to) {
                mv.captured = Some(kind);
            }
        }
        mv
    }

    fn generate_pawn_moves(&self, moves: &mut MoveList, allowed: u64) {
        let side = self.side_to_move;
        let enemy = side.opposite();
        let promotion_rank = if side.is_white() { 7 } else { 0 };

        for &from in self.pieces_of(side, PieceKind::Pawn) {
            let restriction = self.pin_restriction(from);
            let raw = pawn_moves(from, side, self.occupancy, self.color_occupancy(enemy), self.en_passant_target);

            for to_idx in enumerate_bits(raw) {
                let to = Square::new(to_idx);
                let is_ep = self.en_passant_target == Some(to) && to.file() != from.file();

                let legal = if is_ep {
                    let captured_square = Square::from_rank_file(from.rank(), to.file());
                    let bit = 1u64 << to.0;
                    // En passant is subject to the normal check_map filter like any
                    // other pawn move (landing on `to` blocks or captures along a
                    // sliding check), plus the special case where the pawn being
                    // captured is itself the checker — its square isn't `to`, so
                    // `allowed` alone wouldn't see it.
                    let resolves_check =
                        !self.in_check || allowed & bit != 0 || self.checkers.first() == Some(&captured_square);
                    let pin_ok = restriction.map_or(true, |mask| mask & bit != 0);
                    resolves_check && pin_ok && !self.en_passant_reveals_check(from, captured_square)
                } else {
                    let bit = 1u64 << to.0;
                    let check_ok = allowed & bit != 0;
                    let pin_ok = restriction.map_or(true, |mask| mask & bit != 0);
                    check_ok && pin_ok
                };
                if !legal {
                    continue;
                }

                if to.rank() == promotion_rank {
                    for promo in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
                        moves.push(self.finalize(Move::promotion_move(from, to, promo)));
                    }
                } else if is_ep {
                    let captured_square = Square::from_rank_file(from.rank(), to.file());
                    let mut mv = Move::en_passant(from, to, captured_square);
                    mv.captured = Some(PieceKind::Pawn);
                    moves.push(mv);
                } else {
                    moves.push(self.finalize(Move::quiet(from, to)));
                }
            }
        }
    }

    fn generate_knight_moves(&self, moves: &mut MoveList, allowed: u64) {
        let side = self.side_to_move;
        for &from in self.pieces_of(side, PieceKind::Knight) {
            if self.is_pinned(from) {
                // A pinned knight has no destination that keeps it on the
                // pin ray, since a knight's move pattern never stays on a
                // straight line.
                continue;
            }
            let targets = knight_attacks(from) & !self.color_occupancy(side) & allowed;
            for to in enumerate_bits(targets) {
                moves.push(self.finalize(Move::quiet(from, Square::new(to))));
            }
        }
    }

    fn generate_slider_moves(&self, moves: &mut MoveList, kind: PieceKind, allowed: u64) {
        let side = self.side_to_move;
        for &from in self.pieces_of(side, kind) {
            let raw = match kind {
                PieceKind::Bishop => bishop_attacks(from, self.occupancy),
                PieceKind::Rook => rook_attacks(from, self.occupancy),
                PieceKind::Queen => queen_attacks(from, self.occupancy),
                _ => unreachable!("generate_slider_moves only called for sliding pieces"),
            };
            let mut targets = raw & !self.color_occupancy(side) & allowed;
            if let Some(mask) = self.pin_restriction(from) {
                targets &= mask;
            }
            for to in enumerate_bits(targets) {
                moves.push(self.finalize(Move::quiet(from, Square::new(to))));
            }
        }
    }

    fn generate_king_moves(&self, moves: &mut MoveList) {
        let side = self.side_to_move;
        let enemy = side.opposite();
        let from = self.king_square(side);
        let raw = king_attacks(from) & !self.color_occupancy(side);
        let enemy_attacks = self.attack_map_excluding_square(enemy, from);
        for to in enumerate_bits(raw & !enemy_attacks) {
            moves.push(self.finalize(Move::quiet(from, Square::new(to))));
        }
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        let side = self.side_to_move;
        let enemy = side.opposite();
        let rank = if side.is_white() { 0 } else { 7 };
        let king_from = Square::from_rank_file(rank, 4);
        let enemy_attacks = self.attack_map(enemy);

        let (kingside_right, queenside_right) = if side.is_white() {
            (castling::WHITE_KINGSIDE, castling::WHITE_QUEENSIDE)
        } else {
            (castling::BLACK_KINGSIDE, castling::BLACK_QUEENSIDE)
        };

        if self.castling_rights & kingside_right != 0 {
            let f = Square::from_rank_file(rank, 5);
            let g = Square::from_rank_file(rank, 6);
            let empty = self.occupancy & (1u64 << f.0 | 1u64 << g.0) == 0;
            let safe = enemy_attacks & (1u64 << king_from.0 | 1u64 << f.0 | 1u64 << g.0) == 0;
            if empty && safe {
                moves.push(Move::castle(king_from, g, true));
            }
        }
        if self.castling_rights & queenside_right != 0 {
            let b = Square::from_rank_file(rank, 1);
            let c = Square::from_rank_file(rank, 2);
            let d = Square::from_rank_file(rank, 3);
            let empty = self.occupancy & (1u64 << b.0 | 1u64 << c.0 | 1u64 << d.0) == 0;
            let safe = enemy_attacks & (1u64 << king_from.0 | 1u64 << c.0 | 1u64 << d.0) == 0;
            if empty && safe {
                moves.push(Move::castle(king_from, c, false));
            }
        }
    }
}
