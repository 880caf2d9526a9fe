//! Extended FEN parsing/serialisation: the standard six space-separated
//! fields, with `@` added to the piece alphabet for the duck and a `@`
//! suffix on the side-to-move field for a duck sub-turn.

use crate::error::FenError;
use crate::position::{Position, PositionBuilder};
use crate::types::{CastlingRights, Color, Piece, Side, Square};

impl Position {
    /// Parse an extended FEN string: `pieces turn castling ep halfmove fullmove`.
    pub fn from_fen(s: &str) -> Result<Position, FenError> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut builder = PositionBuilder::new();
        let mut duck_square = None;

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(8 + 1) {
                    if !c.is_ascii_digit() || digit == 0 {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += digit as u8;
                } else if c == '@' {
                    let sq = Square::try_new(rank, file).map_err(|_| FenError::InvalidRank {
                        rank: rank_from_top,
                        files: file as usize + 1,
                    })?;
                    duck_square = Some(sq);
                    file += 1;
                } else {
                    let piece = Piece::from_char(c).map_err(|_| FenError::InvalidPiece { char: c })?;
                    let sq = Square::try_new(rank, file).map_err(|_| FenError::InvalidRank {
                        rank: rank_from_top,
                        files: file as usize + 1,
                    })?;
                    match piece {
                        Piece::Colored(color, pt) => {
                            builder = builder.piece(sq, color, pt);
                        }
                        Piece::Duck => {
                            duck_square = Some(sq);
                        }
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidRank {
                    rank: rank_from_top,
                    files: file as usize,
                });
            }
        }
        if let Some(sq) = duck_square {
            builder = builder.duck(sq);
        }

        let turn = match parts[1] {
            "w" => Side::White,
            "w@" => Side::WhiteDuck,
            "b" => Side::Black,
            "b@" => Side::BlackDuck,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        builder = builder.turn(turn);

        let mut rights = 0u8;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                rights |= match c {
                    'K' => crate::types::WHITE_KINGSIDE,
                    'Q' => crate::types::WHITE_QUEENSIDE,
                    'k' => crate::types::BLACK_KINGSIDE,
                    'q' => crate::types::BLACK_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling { char: c }),
                };
            }
        }
        builder = builder.castle_rights(CastlingRights(rights));

        let ep = if parts[3] == "-" {
            None
        } else {
            let sq: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            let legal_rank = sq.rank() == 2 || sq.rank() == 5;
            if !legal_rank {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            Some(sq)
        };
        builder = builder.en_passant(ep);

        let halfmove: u32 = parts[4].parse().map_err(|_| FenError::InvalidClock {
            found: parts[4].to_string(),
        })?;
        let fullmove: u32 = parts[5].parse().map_err(|_| FenError::InvalidClock {
            found: parts[5].to_string(),
        })?;
        builder = builder.clocks(halfmove, fullmove);

        Ok(builder.build())
    }

    /// Serialise to the same extended FEN grammar `from_fen` accepts. Round
    /// trips: `Position::from_fen(p.to_fen())` reproduces every field `to_fen`
    /// writes (board, turn, castling, ep, clocks).
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0u8;
            for file in 0..8u8 {
                let sq = Square::new(rank, file);
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            ranks.push(row);
        }

        let turn = match self.turn {
            Side::White => "w",
            Side::WhiteDuck => "w@",
            Side::Black => "b",
            Side::BlackDuck => "b@",
        };

        let ep = self
            .en_passant_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());

        format!(
            "{} {} {} {} {} {}",
            ranks.join("/"),
            turn,
            self.castle_rights.to_fen_string(),
            ep,
            self.halfmove_clock,
            self.fullmove_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionBuilder;
    use crate::types::PieceType;

    #[test]
    fn starting_position_round_trips() {
        let position = PositionBuilder::starting().build();
        let fen = position.to_fen();
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        let parsed = Position::from_fen(&fen).unwrap();
        assert_eq!(parsed.white, position.white);
        assert_eq!(parsed.black, position.black);
        assert_eq!(parsed.turn, position.turn);
        assert_eq!(parsed.castle_rights, position.castle_rights);
        assert_eq!(parsed.zbr, parsed.recompute_zobrist());
    }

    #[test]
    fn parses_duck_and_duck_turn_marker() {
        let parsed = Position::from_fen(
            "rnbqkbnr/pppppppp/8/3@4/8/8/PPPPPPPP/RNBQKBNR w@ KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(parsed.duck, Square::new(4, 3).mask());
        assert_eq!(parsed.turn, Side::WhiteDuck);
    }

    #[test]
    fn parses_en_passant_square() {
        let parsed = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1",
        )
        .unwrap();
        assert_eq!(parsed.en_passant_square(), Some("d6".parse().unwrap()));
    }

    #[test]
    fn rejects_wrong_rank_count() {
        assert!(Position::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_bad_piece_char() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/7x w - - 0 1").is_err());
    }

    #[test]
    fn rejects_en_passant_on_illegal_rank() {
        assert!(Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1"
        )
        .is_err());
    }

    #[test]
    fn s3_scenario_promotions_round_trip() {
        let position = Position::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(position.piece_at(Square::new(6, 1)), Some(Piece::Colored(Color::White, PieceType::Pawn)));
        assert_eq!(position.to_fen(), "r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
    }
}
