//! `Position`: the full Duck Chess board state, plus its invariants.

mod builder;
mod fen;
mod make_unmake;

pub use builder::PositionBuilder;

use crate::error::IllegalManualMove;
use crate::types::{Bitboard, CastlingRights, Color, Move, MoveKind, MoveList, Piece, Side, Square};
use crate::zobrist;

/// Terminal/non-terminal tag for the game, updated after every `make_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    Ongoing,
    WhiteWins,
    BlackWins,
    Stalemate,
}

/// A snapshot of every field `make_move` mutates, taken *before* applying
/// the move it records, so `unmake_move` can restore bit-exact state.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub game_state: GameState,
    pub turn: Side,
    pub duck: Bitboard,
    pub castle_rights: CastlingRights,
    pub en_passant: Bitboard,
    pub halfmove_clock: u32,
    pub fullmove_count: u32,
    pub captured_piece: Option<Piece>,
    pub captured_square: Option<Square>,
    pub mv: Option<Move>,
    pub zbr: u64,
}

/// The full Duck Chess position: twelve piece bitboards, the duck, their
/// aggregates, a parallel mailbox, and everything needed to make, unmake,
/// and incrementally rehash a move.
#[derive(Debug, Clone)]
pub struct Position {
    pub pieces: [[Bitboard; 6]; 2],
    pub duck: Bitboard,
    pub white: Bitboard,
    pub black: Bitboard,
    pub occupied: Bitboard,
    pub mailbox: [Option<Piece>; 64],
    pub turn: Side,
    pub castle_rights: CastlingRights,
    pub en_passant: Bitboard,
    pub halfmove_clock: u32,
    pub fullmove_count: u32,
    pub game_state: GameState,
    pub history: Vec<UndoRecord>,
    pub zbr: u64,
}

impl Position {
    /// The standard chess starting layout; no duck yet placed, white to move.
    #[must_use]
    pub fn starting() -> Self {
        PositionBuilder::starting().build()
    }

    #[must_use]
    pub fn piece_bb(&self, color: Color, pt: crate::types::PieceType) -> Bitboard {
        self.pieces[color.index()][pt.array_index()]
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.piece_bb(color, crate::types::PieceType::King).lsb()
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index() as usize]
    }

    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        !self.occupied.contains(sq)
    }

    #[must_use]
    pub fn allies(&self, color: Color) -> Bitboard {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[must_use]
    pub fn enemies(&self, color: Color) -> Bitboard {
        self.allies(color.opponent()) & !self.duck
    }

    /// The duck and the side to move's own pieces: squares a piece move may
    /// not land on or pass through.
    #[must_use]
    pub fn blockers(&self, color: Color) -> Bitboard {
        self.allies(color) | self.duck
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.lsb()
    }

    /// From-scratch Zobrist recomputation, used to verify the incrementally
    /// maintained `zbr` (invariant 4/7 of the position model).
    #[must_use]
    pub fn recompute_zobrist(&self) -> u64 {
        let mut zbr = 0u64;
        for (i, slot) in self.mailbox.iter().enumerate() {
            if let Some(piece) = slot {
                zbr ^= zobrist::piece_key(*piece, Square(i as u8));
            }
        }
        zbr ^= zobrist::turn_key(self.turn);
        zbr ^= zobrist::castle_rights_key(self.castle_rights.0);
        zbr ^= zobrist::en_passant_key(self.en_passant_square().map(|s| s.file()));
        zbr
    }

    /// Debug-only validation of the invariants listed in the position model.
    /// Cheap enough to call after every `make_move`/`unmake_move` in tests.
    pub fn debug_check_invariants(&self) {
        debug_assert!(self.duck.popcount() <= 1, "duck: popcount(duck) <= 1");
        let white_union = self.pieces[Color::White.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        let black_union = self.pieces[Color::Black.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        debug_assert_eq!(self.white, white_union);
        debug_assert_eq!(self.black, black_union);
        debug_assert!((self.white & self.black).is_empty());
        debug_assert!(((self.white | self.black) & self.duck).is_empty());
        debug_assert_eq!(self.occupied, self.white | self.black | self.duck);
        for i in 0..64u8 {
            let sq = Square(i);
            debug_assert_eq!(self.mailbox[i as usize].is_some(), self.occupied.contains(sq));
        }
        debug_assert!(self.castle_rights.0 & !crate::types::ALL_RIGHTS == 0);
        debug_assert!(self.piece_bb(Color::White, crate::types::PieceType::King).popcount() <= 1);
        debug_assert!(self.piece_bb(Color::Black, crate::types::PieceType::King).popcount() <= 1);
        debug_assert_eq!(self.zbr, self.recompute_zobrist());
    }

    /// Resolve a host-submitted move (parsed via `Move::from_string`, tagged
    /// `Manual` except for castling/duck notations which are already
    /// unambiguous) against the pseudo-legal moves available in the current
    /// position. Returns the fully-typed generated move, or
    /// `IllegalManualMove` if nothing matches.
    pub fn resolve_manual_move(&self, manual: &Move) -> Result<Move, IllegalManualMove> {
        let legal = crate::movegen::generate_moves(self);
        let found = if manual.kind.is_castle() {
            legal.iter().find(|m| m.kind == manual.kind)
        } else {
            legal.iter().find(|m| m.matches_squares(manual))
        };
        found.copied().ok_or_else(|| IllegalManualMove {
            notation: manual.to_string(),
        })
    }
}

/// Generate moves for the current side to move (piece turn or duck turn,
/// dispatched on `Position::turn`). Convenience forward so call sites don't
/// need to import `crate::movegen` directly.
impl Position {
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        crate::movegen::generate_moves(self)
    }

    /// True iff the game has reached a terminal state by king capture.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.game_state, GameState::Ongoing)
    }
}

/// Is `kind` one that clears the halfmove clock (any pawn move or capture)?
pub(crate) fn resets_halfmove_clock(piece: crate::types::PieceType, kind: MoveKind) -> bool {
    piece == crate::types::PieceType::Pawn || kind.is_capture()
}
