//! Standard Algebraic Notation: `Position::move_to_san` / `Position::parse_san`.
//!
//! Examples: `"e4"`, `"Nf3"`, `"Bxc6+"`, `"O-O"`, `"e8=Q#"`.

use crate::error::SanError;
use crate::position::Position;
use crate::types::{Move, PieceKind, Square};

impl Position {
    /// Format `mv` in SAN, including check/checkmate suffixes. `mv` must be
    /// legal in this position.
    #[must_use]
    pub fn move_to_san(&self, mv: &Move) -> String {
        let mut san = String::new();

        if mv.is_castle {
            san.push_str(if mv.is_castle_kingside { "O-O" } else { "O-O-O" });
        } else {
            let (_, piece) = self.piece_at(mv.from).expect("move origin must hold a piece");

            if piece != PieceKind::Pawn {
                san.push(piece.to_char().to_ascii_uppercase());
                let (needs_file, needs_rank) = self.disambiguation(mv, piece);
                if needs_file {
                    san.push((b'a' + mv.from.file()) as char);
                }
                if needs_rank {
                    san.push((b'1' + mv.from.rank()) as char);
                }
            } else if mv.is_capture() {
                san.push((b'a' + mv.from.file()) as char);
            }

            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(&mv.to.to_algebraic());

            if let Some(promo) = mv.promotion {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        let mut after = self.clone();
        let mut applied = *mv;
        after.make_move(&mut applied);
        if after.is_checkmate() {
            san.push('#');
        } else if after.is_check() {
            san.push('+');
        }

        san
    }

    /// Whether distinguishing `mv` from other legal moves of the same piece
    /// kind to the same destination requires the origin file and/or rank.
    fn disambiguation(&self, mv: &Move, piece: PieceKind) -> (bool, bool) {
        let others: Vec<Move> = self
            .generate_legal_moves()
            .into_iter()
            .filter(|m| {
                m.to == mv.to
                    && m.from != mv.from
                    && self.piece_at(m.from).map(|(_, k)| k) == Some(piece)
            })
            .collect();

        if others.is_empty() {
            return (false, false);
        }
        let same_file = others.iter().any(|m| m.from.file() == mv.from.file());
        let same_rank = others.iter().any(|m| m.from.rank() == mv.from.rank());
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Parse a SAN token against this position's legal moves.
    pub fn parse_san(&self, token: &str) -> Result<Move, SanError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SanError::Empty);
        }
        let token = token.trim_end_matches(['+', '#']);

        let legal = self.generate_legal_moves();

        if token == "O-O" || token == "0-0" {
            return legal
                .into_iter()
                .find(|m| m.is_castle && m.is_castle_kingside)
                .ok_or_else(|| SanError::Illegal { token: token.to_string() });
        }
        if token == "O-O-O" || token == "0-0-0" {
            return legal
                .into_iter()
                .find(|m| m.is_castle && !m.is_castle_kingside)
                .ok_or_else(|| SanError::Illegal { token: token.to_string() });
        }

        let chars: Vec<char> = token.chars().collect();
        let (piece, rest) = if chars[0].is_ascii_uppercase() {
            let kind = PieceKind::from_char(chars[0])
                .ok_or_else(|| SanError::Unrecognized { token: token.to_string() })?;
            (kind, &chars[1..])
        } else {
            (PieceKind::Pawn, &chars[..])
        };

        let mut disambig_file = None;
        let mut disambig_rank = None;
        let mut dest = String::new();
        let mut promotion = None;
        let mut idx = 0;
        while idx < rest.len() {
            let c = rest[idx];
            if c == 'x' {
                idx += 1;
            } else if c == '=' {
                idx += 1;
                if idx < rest.len() {
                    promotion = Some(
                        PieceKind::from_char(rest[idx])
                            .ok_or_else(|| SanError::Unrecognized { token: token.to_string() })?,
                    );
                    idx += 1;
                }
            } else if c.is_ascii_lowercase() && idx + 1 < rest.len() && rest[idx + 1].is_ascii_digit() {
                dest.push(c);
                dest.push(rest[idx + 1]);
                idx += 2;
            } else if c.is_ascii_lowercase() {
                disambig_file = Some(c as u8 - b'a');
                idx += 1;
            } else if c.is_ascii_digit() {
                disambig_rank = Some(c as u8 - b'1');
                idx += 1;
            } else {
                idx += 1;
            }
        }

        let to = Square::from_algebraic(&dest).ok_or_else(|| SanError::Unrecognized { token: token.to_string() })?;

        let candidates: Vec<Move> = legal
            .into_iter()
            .filter(|m| {
                m.to == to
                    && !m.is_castle
                    && self.piece_at(m.from).map(|(_, k)| k) == Some(piece)
                    && m.promotion == promotion
                    && disambig_file.is_none_or_eq(m.from.file())
                    && disambig_rank.is_none_or_eq(m.from.rank())
            })
            .collect();

        match candidates.len() {
            0 => Err(SanError::Illegal { token: token.to_string() }),
            1 => Ok(candidates[0]),
            _ => Err(SanError::Ambiguous { token: token.to_string() }),
        }
    }
}

trait OptionEqExt {
    fn is_none_or_eq(self, value: u8) -> bool;
}

impl OptionEqExt for Option<u8> {
    fn is_none_or_eq(self, value: u8) -> bool {
        self.map_or(true, |expected| expected == value)
    }
}
