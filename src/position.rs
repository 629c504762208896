//! The mutable game-state representation: bitboards, castling rights, the
//! en-passant target, the pin/check analysis pipeline, and `make`/`undo`.
//!
//! Pins and checks are computed once per move by sweeping all 8 rays outward
//! from the king plus a knight/pawn check pass, rather than by asking "is
//! this square attacked" on a trial basis for every candidate move.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_captures, queen_attacks, rook_attacks};
use crate::error::{FenError, IllegalMoveError};
use crate::types::{castling, Color, Move, PieceKind, Square};
use crate::zobrist::ZOBRIST;

/// Ray deltas `(d_rank, d_file)`, in the order the pin/check sweep walks
/// them: orthogonals first, then diagonals.
const RAY_DELTAS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-1, -1),
];

const A1: u8 = 0;
const H1: u8 = 7;
const A8: u8 = 56;
const H8: u8 = 63;

#[derive(Clone, Debug)]
pub struct Position {
    /// One bitboard per piece kind, both colors merged.
    pub(crate) piece_bb: [u64; 6],
    /// Occupancy per color.
    pub(crate) color_bb: [u64; 2],
    /// `color_bb[White] | color_bb[Black]`.
    pub(crate) occupancy: u64,
    /// `piece_lists[color][kind]` — the set of occupied cells, for iterating
    /// pieces of a kind without scanning bitboards.
    pub(crate) piece_lists: [[Vec<Square>; 6]; 2],

    pub side_to_move: Color,
    pub castling_rights: u8,
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,

    /// Union of all squares attacked by each color, recomputed after every move.
    pub(crate) attack_bb: [u64; 2],
    /// Bitboard of squares on the checking ray(s), including the checker —
    /// the set of squares a legal non-king move must land on while in check.
    pub(crate) check_map: u64,
    pub in_check: bool,
    pub in_double_check: bool,
    /// Union of all rays from the side-to-move's king through exactly one
    /// friendly blocker to an enemy slider.
    pub(crate) pin_map: u64,
    /// Per-pinned-piece `(square, allowed destination mask)`: the mask is the
    /// ray from the king to (and including) the pinning slider, the only
    /// squares that piece may move to without exposing the king.
    pub(crate) pin_restrictions: Vec<(Square, u64)>,
    pub(crate) checkers: Vec<Square>,

    pub zobrist_key: u64,

    /// Hash history for repetition detection via [`Position::is_draw_by_rules`].
    /// The search's own [`crate::repetition::RepetitionTable`] is the
    /// performant structure consulted on the hot path; this is the
    /// self-contained story behind the zero-argument public API.
    history: Vec<u64>,
}

impl Default for Position {
    fn default() -> Self {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("startpos FEN is well-formed")
    }
}

impl Position {
    #[must_use]
    pub fn new() -> Self {
        Position::default()
    }

    // ---- cell queries -------------------------------------------------

    #[must_use]
    pub fn occupancy(&self) -> u64 {
        self.occupancy
    }

    #[must_use]
    pub fn color_occupancy(&self, color: Color) -> u64 {
        self.color_bb[color.index()]
    }

    #[must_use]
    pub fn piece_bitboard(&self, kind: PieceKind) -> u64 {
        self.piece_bb[kind.index()]
    }

    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let bit = 1u64 << square.0;
        if self.occupancy & bit == 0 {
            return None;
        }
        let color = if self.color_bb[0] & bit != 0 { Color::White } else { Color::Black };
        for kind in PieceKind::ALL {
            if self.piece_bb[kind.index()] & bit != 0 {
                return Some((color, kind));
            }
        }
        unreachable!("occupied square must have a piece kind")
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.piece_lists[color.index()][PieceKind::King.index()][0]
    }

    #[must_use]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> &[Square] {
        &self.piece_lists[color.index()][kind.index()]
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.in_check
    }

    #[must_use]
    pub fn is_pinned(&self, square: Square) -> bool {
        self.pin_map & (1u64 << square.0) != 0
    }

    /// While [`Position::in_check`], the bitboard of squares a non-king move
    /// must land on to resolve it: the checker's own square (capturable) and
    /// every square between it and the king on a sliding check (blockable).
    /// Empty when not in check.
    #[must_use]
    pub fn check_resolution_squares(&self) -> u64 {
        self.check_map
    }

    /// The cell(s) currently giving check, at most two (double check).
    #[must_use]
    pub fn checkers(&self) -> &[Square] {
        &self.checkers
    }

    /// The allowed-destination mask for a pinned piece on `square`, or
    /// `None` if it isn't pinned.
    #[must_use]
    pub(crate) fn pin_restriction(&self, square: Square) -> Option<u64> {
        self.pin_restrictions.iter().find(|(sq, _)| *sq == square).map(|(_, mask)| *mask)
    }

    /// True if capturing en passant with the pawn on `pawn_from` (removing
    /// it and the pawn on `captured_square`) would expose the side-to-move's
    /// king to a rook/queen check along the shared rank — the one
    /// discovered-check shape that isn't caught by [`Position::pin_restriction`],
    /// since neither pawn individually blocks a ray to the king.
    #[must_use]
    pub(crate) fn en_passant_reveals_check(&self, pawn_from: Square, captured_square: Square) -> bool {
        let side = self.side_to_move;
        let enemy = side.opposite();
        let king_sq = self.king_square(side);
        if king_sq.rank() != pawn_from.rank() {
            return false;
        }
        let occ = self.occupancy & !(1u64 << pawn_from.0) & !(1u64 << captured_square.0);
        let enemy_sliders =
            (self.piece_bb[PieceKind::Rook.index()] | self.piece_bb[PieceKind::Queen.index()]) & self.color_bb[enemy.index()];
        rook_attacks(king_sq, occ) & enemy_sliders != 0
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check && self.generate_legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check && self.generate_legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        if self.piece_bb[PieceKind::Pawn.index()] != 0 {
            return false;
        }
        if self.piece_bb[PieceKind::Rook.index()] != 0 || self.piece_bb[PieceKind::Queen.index()] != 0 {
            return false;
        }
        // Conservative: only K+minor vs K+minor (or fewer) is recognized;
        // bishops on opposite colors and other fine-grained draws are not
        // specially distinguished.
        let minors = |c: Color| {
            self.pieces_of(c, PieceKind::Bishop).len() + self.pieces_of(c, PieceKind::Knight).len()
        };
        minors(Color::White) <= 1 && minors(Color::Black) <= 1
    }

    /// True if the 50-move rule, recognized insufficient material, or a
    /// threefold repetition of the current position (against this
    /// position's own move history) applies.
    #[must_use]
    pub fn is_draw_by_rules(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        if self.is_insufficient_material() {
            return true;
        }
        let occurrences = self.history.iter().filter(|&&h| h == self.zobrist_key).count();
        occurrences >= 3
    }

    // ---- FEN ------------------------------------------------------------

    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewFields { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut piece_bb = [0u64; 6];
        let mut color_bb = [0u64; 2];
        let mut piece_lists: [[Vec<Square>; 6]; 2] = Default::default();

        // FEN ranks run 8 (top) down to 1 (bottom); rank 0 in our indexing is
        // white's back rank, i.e. FEN rank 1.
        for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - fen_rank_idx as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as u8;
                    if file > 8 {
                        return Err(FenError::TooManySquaresInRank { rank: fen_rank_idx });
                    }
                    continue;
                }
                if file >= 8 {
                    return Err(FenError::TooManySquaresInRank { rank: fen_rank_idx });
                }
                let kind = PieceKind::from_char(ch).ok_or(FenError::InvalidPiece { ch })?;
                let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
                let square = Square::from_rank_file(rank, file);
                piece_bb[kind.index()] |= 1u64 << square.0;
                color_bb[color.index()] |= 1u64 << square.0;
                piece_lists[color.index()][kind.index()].push(square);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::TooFewSquaresInRank { rank: fen_rank_idx });
            }
        }

        if piece_lists[Color::White.index()][PieceKind::King.index()].len() != 1 {
            return Err(FenError::MissingKing { white: true });
        }
        if piece_lists[Color::Black.index()][PieceKind::King.index()].len() != 1 {
            return Err(FenError::MissingKing { white: false });
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove { found: other.to_string() }),
        };

        let mut castling_rights = 0u8;
        if parts[2] != "-" {
            for ch in parts[2].chars() {
                castling_rights |= match ch {
                    'K' => castling::WHITE_KINGSIDE,
                    'Q' => castling::WHITE_QUEENSIDE,
                    'k' => castling::BLACK_KINGSIDE,
                    'q' => castling::BLACK_QUEENSIDE,
                    other => return Err(FenError::InvalidCastlingChar { ch: other }),
                };
            }
        }

        let en_passant_target = if parts.len() > 3 && parts[3] != "-" {
            Some(Square::from_algebraic(parts[3]).ok_or_else(|| FenError::InvalidEnPassantSquare {
                found: parts[3].to_string(),
            })?)
        } else {
            None
        };

        let halfmove_clock = if parts.len() > 4 {
            parts[4].parse().map_err(|_| FenError::InvalidHalfmoveClock { found: parts[4].to_string() })?
        } else {
            0
        };
        let fullmove_number = if parts.len() > 5 {
            parts[5].parse().map_err(|_| FenError::InvalidFullmoveNumber { found: parts[5].to_string() })?
        } else {
            1
        };

        let mut pos = Position {
            piece_bb,
            color_bb,
            occupancy: color_bb[0] | color_bb[1],
            piece_lists,
            side_to_move,
            castling_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
            attack_bb: [0; 2],
            check_map: 0,
            in_check: false,
            in_double_check: false,
            pin_map: 0,
            pin_restrictions: Vec::new(),
            checkers: Vec::new(),
            zobrist_key: 0,
            history: Vec::new(),
        };
        pos.zobrist_key = pos.compute_zobrist_from_scratch();
        pos.recompute_attack_maps();
        pos.update_pins_and_checks();
        Ok(pos)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut s = String::new();
            let mut empty_run = 0u8;
            for file in 0..8 {
                let square = Square::from_rank_file(rank, file);
                match self.piece_at(square) {
                    None => empty_run += 1,
                    Some((color, kind)) => {
                        if empty_run > 0 {
                            s.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let c = kind.to_char();
                        s.push(if color.is_white() { c.to_ascii_uppercase() } else { c });
                    }
                }
            }
            if empty_run > 0 {
                s.push_str(&empty_run.to_string());
            }
            ranks.push(s);
        }
        let placement = ranks.join("/");

        let side = if self.side_to_move.is_white() { "w" } else { "b" };

        let mut castling = String::new();
        if self.castling_rights & castling::WHITE_KINGSIDE != 0 {
            castling.push('K');
        }
        if self.castling_rights & castling::WHITE_QUEENSIDE != 0 {
            castling.push('Q');
        }
        if self.castling_rights & castling::BLACK_KINGSIDE != 0 {
            castling.push('k');
        }
        if self.castling_rights & castling::BLACK_QUEENSIDE != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self.en_passant_target.map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    fn compute_zobrist_from_scratch(&self) -> u64 {
        let mut key = 0u64;
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                for &sq in self.pieces_of(color, kind) {
                    key ^= ZOBRIST.piece(kind, color, sq);
                }
            }
        }
        if !self.side_to_move.is_white() {
            key ^= ZOBRIST.side_to_move_key;
        }
        key ^= ZOBRIST.castling_rights(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            key ^= ZOBRIST.en_passant_file(ep.file());
        }
        key
    }

    // ---- low-level board mutation --------------------------------------

    fn place(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = 1u64 << square.0;
        self.piece_bb[kind.index()] |= bit;
        self.color_bb[color.index()] |= bit;
        self.occupancy |= bit;
        self.piece_lists[color.index()][kind.index()].push(square);
        self.zobrist_key ^= ZOBRIST.piece(kind, color, square);
    }

    fn remove(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = !(1u64 << square.0);
        self.piece_bb[kind.index()] &= bit;
        self.color_bb[color.index()] &= bit;
        self.occupancy &= bit;
        self.piece_lists[color.index()][kind.index()].retain(|&s| s != square);
        self.zobrist_key ^= ZOBRIST.piece(kind, color, square);
    }

    fn revoke_castling_right_for_corner(&mut self, corner: Square) {
        let bit = match corner.0 {
            H1 => castling::WHITE_KINGSIDE,
            A1 => castling::WHITE_QUEENSIDE,
            H8 => castling::BLACK_KINGSIDE,
            A8 => castling::BLACK_QUEENSIDE,
            _ => return,
        };
        if self.castling_rights & bit != 0 {
            self.zobrist_key ^= ZOBRIST.castling_rights(bit);
            self.castling_rights &= !bit;
        }
    }

    // ---- make / undo ------------------------------------------------------

    /// Validate `mv` against [`Position::generate_legal_moves`] and apply it,
    /// returning the applied move (with its undo-aid fields filled in) for a
    /// matching [`Position::undo`] call. Unlike [`Position::make_move`], this
    /// never mutates the position on a rejected move.
    pub fn make(&mut self, mv: Move) -> Result<Move, IllegalMoveError> {
        let mut applied = self
            .generate_legal_moves()
            .into_iter()
            .find(|m| m.from == mv.from && m.to == mv.to && m.promotion == mv.promotion)
            .ok_or_else(|| IllegalMoveError { uci: mv.to_uci() })?;
        self.make_move(&mut applied);
        Ok(applied)
    }

    /// Reverse a move previously applied by [`Position::make`].
    pub fn undo(&mut self, mv: &Move) {
        self.undo_move(mv);
    }

    /// Apply `mv` to the position, filling in its undo-aid fields. `mv` must
    /// have come from [`Position::generate_legal_moves`] for this exact
    /// position — the generator is the only legality check; this method does
    /// not re-validate.
    pub fn make_move(&mut self, mv: &mut Move) {
        let mover = self.side_to_move;
        mv.prior_castling_rights = self.castling_rights;
        mv.prior_en_passant_target = self.en_passant_target;
        mv.prior_halfmove_clock = self.halfmove_clock;

        if let Some(ep) = self.en_passant_target {
            self.zobrist_key ^= ZOBRIST.en_passant_file(ep.file());
        }

        let mut reset_halfmove_clock = false;

        if mv.is_castle {
            let rank = if mover.is_white() { 0 } else { 7 };
            let (rook_from_file, rook_to_file, king_to_file) = if mv.is_castle_kingside { (7, 5, 6) } else { (0, 3, 2) };
            let king_from = mv.from;
            let king_to = Square::from_rank_file(rank, king_to_file);
            let rook_from = Square::from_rank_file(rank, rook_from_file);
            let rook_to = Square::from_rank_file(rank, rook_to_file);

            self.remove(mover, PieceKind::King, king_from);
            self.place(mover, PieceKind::King, king_to);
            self.remove(mover, PieceKind::Rook, rook_from);
            self.place(mover, PieceKind::Rook, rook_to);

            let both = if mover.is_white() {
                castling::WHITE_KINGSIDE | castling::WHITE_QUEENSIDE
            } else {
                castling::BLACK_KINGSIDE | castling::BLACK_QUEENSIDE
            };
            if self.castling_rights & both != 0 {
                self.zobrist_key ^= ZOBRIST.castling_rights(self.castling_rights & both);
                self.castling_rights &= !both;
            }
        } else {
            let (_, moving_kind) = self.piece_at(mv.from).expect("move origin must hold a piece");

            let captured_square = if mv.is_en_passant {
                Square::from_rank_file(mv.from.rank(), mv.to.file())
            } else {
                mv.to
            };

            if mv.is_en_passant || self.occupancy & (1u64 << mv.to.0) != 0 {
                let (captured_color, captured_kind) =
                    self.piece_at(captured_square).expect("captured square must hold a piece");
                self.remove(captured_color, captured_kind, captured_square);
                mv.captured = Some(captured_kind);
                mv.captured_square = captured_square;
                reset_halfmove_clock = true;
                self.revoke_castling_right_for_corner(captured_square);
            }

            self.remove(mover, moving_kind, mv.from);
            self.place(mover, moving_kind, mv.to);

            if let Some(promotion) = mv.promotion {
                self.remove(mover, PieceKind::Pawn, mv.to);
                self.place(mover, promotion, mv.to);
            }

            if moving_kind == PieceKind::Pawn {
                reset_halfmove_clock = true;
                if mv.from.rank().abs_diff(mv.to.rank()) == 2 {
                    self.en_passant_target = Some(Square::from_rank_file(
                        (mv.from.rank() + mv.to.rank()) / 2,
                        mv.from.file(),
                    ));
                } else {
                    self.en_passant_target = None;
                }
            } else {
                self.en_passant_target = None;
            }

            if moving_kind == PieceKind::King {
                let both = if mover.is_white() {
                    castling::WHITE_KINGSIDE | castling::WHITE_QUEENSIDE
                } else {
                    castling::BLACK_KINGSIDE | castling::BLACK_QUEENSIDE
                };
                if self.castling_rights & both != 0 {
                    self.zobrist_key ^= ZOBRIST.castling_rights(self.castling_rights & both);
                    self.castling_rights &= !both;
                }
            } else if moving_kind == PieceKind::Rook {
                self.revoke_castling_right_for_corner(mv.from);
            }
        }

        if let Some(ep) = self.en_passant_target {
            self.zobrist_key ^= ZOBRIST.en_passant_file(ep.file());
        }

        self.halfmove_clock = if reset_halfmove_clock { 0 } else { self.halfmove_clock + 1 };
        if !mover.is_white() {
            self.fullmove_number += 1;
        }

        self.side_to_move = mover.opposite();
        self.zobrist_key ^= ZOBRIST.side_to_move_key;

        self.history.push(self.zobrist_key);

        self.recompute_attack_maps();
        self.update_pins_and_checks();
    }

    /// Reverse exactly the mutation `make_move` performed, using `mv`'s
    /// undo-aid fields. Must be called with the same `mv` value that was
    /// passed to the matching `make_move`, on the resulting position.
    pub fn undo_move(&mut self, mv: &Move) {
        self.history.pop();

        let mover = self.side_to_move.opposite();
        self.side_to_move = mover;

        if !mover.is_white() {
            self.fullmove_number -= 1;
        }

        if mv.is_castle {
            let rank = if mover.is_white() { 0 } else { 7 };
            let (rook_from_file, rook_to_file, king_to_file) = if mv.is_castle_kingside { (7, 5, 6) } else { (0, 3, 2) };
            let king_from = mv.from;
            let king_to = Square::from_rank_file(rank, king_to_file);
            let rook_from = Square::from_rank_file(rank, rook_from_file);
            let rook_to = Square::from_rank_file(rank, rook_to_file);

            self.remove(mover, PieceKind::King, king_to);
            self.place(mover, PieceKind::King, king_from);
            self.remove(mover, PieceKind::Rook, rook_to);
            self.place(mover, PieceKind::Rook, rook_from);
        } else {
            if let Some(promotion) = mv.promotion {
                self.remove(mover, promotion, mv.to);
                self.place(mover, PieceKind::Pawn, mv.from);
            } else {
                let (_, moving_kind) = self.piece_at(mv.to).expect("move target must hold the moved piece");
                self.remove(mover, moving_kind, mv.to);
                self.place(mover, moving_kind, mv.from);
            }

            if let Some(captured_kind) = mv.captured {
                let captured_color = mover.opposite();
                self.place(captured_color, captured_kind, mv.captured_square);
            }
        }

        self.zobrist_key ^= ZOBRIST.side_to_move_key;
        if let Some(ep) = self.en_passant_target {
            self.zobrist_key ^= ZOBRIST.en_passant_file(ep.file());
        }
        if let Some(ep) = mv.prior_en_passant_target {
            self.zobrist_key ^= ZOBRIST.en_passant_file(ep.file());
        }
        let changed_rights = self.castling_rights ^ mv.prior_castling_rights;
        if changed_rights != 0 {
            self.zobrist_key ^= ZOBRIST.castling_rights(changed_rights);
        }

        self.castling_rights = mv.prior_castling_rights;
        self.en_passant_target = mv.prior_en_passant_target;
        self.halfmove_clock = mv.prior_halfmove_clock;

        self.recompute_attack_maps();
        self.update_pins_and_checks();
    }

    // ---- attack maps & pin/check analysis -------------------------------

    /// Union of every square `color` attacks, given `occupancy`. Friendly
    /// pieces ARE included in the result (a square a friendly piece
    /// defends is still "attacked" by that color).
    pub(crate) fn attacks_with_occupancy(&self, color: Color, occupancy: u64) -> u64 {
        let mut attacks = 0u64;
        for &sq in self.pieces_of(color, PieceKind::Pawn) {
            attacks |= pawn_captures(sq, color);
        }
        for &sq in self.pieces_of(color, PieceKind::Knight) {
            attacks |= knight_attacks(sq);
        }
        for &sq in self.pieces_of(color, PieceKind::Bishop) {
            attacks |= bishop_attacks(sq, occupancy);
        }
        for &sq in self.pieces_of(color, PieceKind::Rook) {
            attacks |= rook_attacks(sq, occupancy);
        }
        for &sq in self.pieces_of(color, PieceKind::Queen) {
            attacks |= queen_attacks(sq, occupancy);
        }
        for &sq in self.pieces_of(color, PieceKind::King) {
            attacks |= king_attacks(sq);
        }
        attacks
    }

    fn recompute_attack_maps(&mut self) {
        self.attack_bb[Color::White.index()] = self.attacks_with_occupancy(Color::White, self.occupancy);
        self.attack_bb[Color::Black.index()] = self.attacks_with_occupancy(Color::Black, self.occupancy);
    }

    #[must_use]
    pub fn attack_map(&self, color: Color) -> u64 {
        self.attack_bb[color.index()]
    }

    /// The enemy's attack map as seen by a king considering a move away from
    /// `excluded`: sliding attacks must be computed with the king's own
    /// square removed from occupancy so a king cannot "hide" behind itself
    /// while stepping along a checking ray.
    #[must_use]
    pub fn attack_map_excluding_square(&self, color: Color, excluded: Square) -> u64 {
        self.attacks_with_occupancy(color, self.occupancy & !(1u64 << excluded.0))
    }

    /// Ray-walk pin/check sweep from the side-to-move's king: walk each of
    /// the 8 directions outward, tracking whether a single friendly piece
    /// has been passed. The first enemy slider that can attack along that
    /// ray either delivers check (no friendly piece seen) or pins the
    /// friendly piece seen (exactly one seen).
    fn update_pins_and_checks(&mut self) {
        self.pin_map = 0;
        self.pin_restrictions.clear();
        self.check_map = 0;
        self.in_check = false;
        self.in_double_check = false;
        self.checkers.clear();

        let side = self.side_to_move;
        let enemy = side.opposite();
        let king_sq = self.king_square(side);

        for (direction_index, &(dr, df)) in RAY_DELTAS.iter().enumerate() {
            let is_diagonal = direction_index >= 4;
            let mut mask = 0u64;
            let mut friendly_square: Option<Square> = None;
            let mut rank = king_sq.rank() as i32;
            let mut file = king_sq.file() as i32;

            loop {
                rank += dr;
                file += df;
                if !(0..8).contains(&rank) || !(0..8).contains(&file) {
                    break;
                }
                let sq = Square::from_rank_file(rank as u8, file as u8);
                mask |= 1u64 << sq.0;

                match self.piece_at(sq) {
                    None => continue,
                    Some((color, _)) if color == side => {
                        if friendly_square.is_some() {
                            break;
                        }
                        friendly_square = Some(sq);
                    }
                    Some((_, kind)) => {
                        let can_attack_ray = match kind {
                            PieceKind::Queen => true,
                            PieceKind::Rook => !is_diagonal,
                            PieceKind::Bishop => is_diagonal,
                            _ => false,
                        };
                        if can_attack_ray {
                            if let Some(pinned) = friendly_square {
                                self.pin_map |= mask;
                                self.pin_restrictions.push((pinned, mask));
                            } else {
                                self.in_double_check = self.in_check;
                                self.in_check = true;
                                self.check_map |= mask;
                                self.checkers.push(sq);
                            }
                        }
                        break;
                    }
                }
            }
        }

        if self.in_double_check {
            return;
        }

        for &sq in self.pieces_of(enemy, PieceKind::Knight) {
            if knight_attacks(sq) & (1u64 << king_sq.0) != 0 {
                self.check_map |= 1u64 << sq.0;
                self.in_double_check = self.in_check;
                self.in_check = true;
                self.checkers.push(sq);
                if self.in_double_check {
                    return;
                }
            }
        }

        for &sq in self.pieces_of(enemy, PieceKind::Pawn) {
            if pawn_captures(sq, enemy) & (1u64 << king_sq.0) != 0 {
                self.check_map |= 1u64 << sq.0;
                self.in_double_check = self.in_check;
                self.in_check = true;
                self.checkers.push(sq);
                if self.in_double_check {
                    return;
                }
            }
        }
    }
}

