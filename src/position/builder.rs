//! Fluent builder for constructing positions piece by piece, rather than
//! only through FEN parsing.

use crate::position::{GameState, Position, UndoRecord};
use crate::types::{
    Bitboard, CastlingRights, Color, Piece, PieceType, Side, Square, PIECE_TYPES,
};
use crate::zobrist;

/// # Example
/// ```
/// use duck_chess_engine::position::PositionBuilder;
/// use duck_chess_engine::types::{Color, PieceType, Square};
///
/// let position = PositionBuilder::new()
///     .piece(Square::new(0, 4), Color::White, PieceType::King)
///     .piece(Square::new(7, 4), Color::Black, PieceType::King)
///     .build();
/// assert_eq!(position.king_square(Color::White), Some(Square::new(0, 4)));
/// ```
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    pieces: [[Bitboard; 6]; 2],
    duck: Bitboard,
    turn: Side,
    castle_rights: CastlingRights,
    en_passant: Bitboard,
    halfmove_clock: u32,
    fullmove_count: u32,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionBuilder {
    #[must_use]
    pub fn new() -> Self {
        PositionBuilder {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            duck: Bitboard::EMPTY,
            turn: Side::White,
            castle_rights: CastlingRights::NONE,
            en_passant: Bitboard::EMPTY,
            halfmove_clock: 0,
            fullmove_count: 1,
        }
    }

    #[must_use]
    pub fn piece(mut self, sq: Square, color: Color, pt: PieceType) -> Self {
        self.pieces[color.index()][pt.array_index()] |= sq.mask();
        self
    }

    #[must_use]
    pub fn duck(mut self, sq: Square) -> Self {
        self.duck = sq.mask();
        self
    }

    #[must_use]
    pub fn turn(mut self, side: Side) -> Self {
        self.turn = side;
        self
    }

    #[must_use]
    pub fn castle_rights(mut self, rights: CastlingRights) -> Self {
        self.castle_rights = rights;
        self
    }

    #[must_use]
    pub fn en_passant(mut self, sq: Option<Square>) -> Self {
        self.en_passant = sq.map_or(Bitboard::EMPTY, Square::mask);
        self
    }

    #[must_use]
    pub fn clocks(mut self, halfmove: u32, fullmove: u32) -> Self {
        self.halfmove_clock = halfmove;
        self.fullmove_count = fullmove;
        self
    }

    /// The standard chess initial layout, no duck placed yet.
    #[must_use]
    pub fn starting() -> Self {
        let mut builder = Self::new().castle_rights(CastlingRights::STARTING);
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, pt) in back_rank.into_iter().enumerate() {
            builder = builder
                .piece(Square::new(0, file as u8), Color::White, pt)
                .piece(Square::new(7, file as u8), Color::Black, pt);
        }
        for file in 0..8u8 {
            builder = builder
                .piece(Square::new(1, file), Color::White, PieceType::Pawn)
                .piece(Square::new(6, file), Color::Black, PieceType::Pawn);
        }
        builder
    }

    #[must_use]
    pub fn build(self) -> Position {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for &pt in &PIECE_TYPES {
            white |= self.pieces[Color::White.index()][pt.array_index()];
            black |= self.pieces[Color::Black.index()][pt.array_index()];
        }
        let occupied = white | black | self.duck;

        let mut mailbox: [Option<Piece>; 64] = [None; 64];
        for color in [Color::White, Color::Black] {
            for &pt in &PIECE_TYPES {
                for sq in self.pieces[color.index()][pt.array_index()] {
                    mailbox[sq.index() as usize] = Some(Piece::Colored(color, pt));
                }
            }
        }
        for sq in self.duck {
            mailbox[sq.index() as usize] = Some(Piece::Duck);
        }

        let mut position = Position {
            pieces: self.pieces,
            duck: self.duck,
            white,
            black,
            occupied,
            mailbox,
            turn: self.turn,
            castle_rights: self.castle_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_count: self.fullmove_count,
            game_state: GameState::Ongoing,
            history: Vec::new(),
            zbr: 0,
        };
        position.zbr = position.recompute_zobrist();
        position.history.push(UndoRecord {
            game_state: position.game_state,
            turn: position.turn,
            duck: position.duck,
            castle_rights: position.castle_rights,
            en_passant: position.en_passant,
            halfmove_clock: position.halfmove_clock,
            fullmove_count: position.fullmove_count,
            captured_piece: None,
            captured_square: None,
            mv: None,
            zbr: position.zbr,
        });
        position
    }
}
