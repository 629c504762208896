//! UCI move-token conversion: `Move::to_uci` (on [`crate::types::Move`]) and
//! [`Position::parse_uci`] for the reverse direction, resolved against the
//! position's legal moves rather than synthesized directly — a 4/5-letter
//! token alone doesn't say whether a move is a castle or en passant.

use crate::error::MoveParseError;
use crate::position::Position;
use crate::types::{Move, PieceKind, Square};

impl Position {
    /// Parse a UCI move token (e.g. `"e2e4"`, `"e7e8q"`) and resolve it
    /// against this position's legal moves.
    pub fn parse_uci(&self, token: &str) -> Result<Move, MoveParseError> {
        if token.len() != 4 && token.len() != 5 {
            return Err(MoveParseError::InvalidLength { len: token.len() });
        }
        let from = Square::from_algebraic(&token[0..2])
            .ok_or_else(|| MoveParseError::InvalidSquare { token: token[0..2].to_string() })?;
        let to = Square::from_algebraic(&token[2..4])
            .ok_or_else(|| MoveParseError::InvalidSquare { token: token[2..4].to_string() })?;
        let promotion = if token.len() == 5 {
            let ch = token.as_bytes()[4] as char;
            Some(PieceKind::from_char(ch).ok_or(MoveParseError::InvalidPromotion { ch })?)
        } else {
            None
        };

        self.generate_legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| MoveParseError::NoSuchMove { uci: token.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves_a_legal_move() {
        let pos = Position::new();
        let mv = pos.parse_uci("e2e4").unwrap();
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn rejects_a_move_not_legal_here() {
        let pos = Position::new();
        assert!(pos.parse_uci("e2e5").is_err());
    }

    #[test]
    fn parses_promotion_suffix() {
        let pos = Position::from_fen("8/P6k/8/8/8/8/7K/8 w - - 0 1").unwrap();
        let mv = pos.parse_uci("a7a8q").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
    }
}
