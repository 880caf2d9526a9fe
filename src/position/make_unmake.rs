//! `make_move` / `unmake_move` / `skip_move`: the only mutators of a
//! [`Position`]. Every derived structure (per-piece bitboards, colour
//! aggregates, occupancy, mailbox, castling rights, en passant, halfmove
//! clock, and the Zobrist key) is restored bit-exact by `unmake_move`.

use crate::position::{resets_halfmove_clock, GameState, Position, UndoRecord};
use crate::types::{Bitboard, CastlingRights, Color, Move, MoveKind, Piece, PieceType, Side, Square};
use crate::zobrist;

const WK_HOME: Square = Square(4);
const WK_KINGSIDE_TO: Square = Square(6);
const WR_KINGSIDE_HOME: Square = Square(7);
const WR_KINGSIDE_TO: Square = Square(5);
const WK_QUEENSIDE_TO: Square = Square(2);
const WR_QUEENSIDE_HOME: Square = Square(0);
const WR_QUEENSIDE_TO: Square = Square(3);

const BK_HOME: Square = Square(60);
const BK_KINGSIDE_TO: Square = Square(62);
const BR_KINGSIDE_HOME: Square = Square(63);
const BR_KINGSIDE_TO: Square = Square(61);
const BK_QUEENSIDE_TO: Square = Square(58);
const BR_QUEENSIDE_HOME: Square = Square(56);
const BR_QUEENSIDE_TO: Square = Square(59);

/// `(king_from, king_to, rook_from, rook_to)` for a castle of `kind` by `color`.
fn castle_squares(color: Color, kind: MoveKind) -> (Square, Square, Square, Square) {
    match (color, kind) {
        (Color::White, MoveKind::CastleKingside) => {
            (WK_HOME, WK_KINGSIDE_TO, WR_KINGSIDE_HOME, WR_KINGSIDE_TO)
        }
        (Color::White, MoveKind::CastleQueenside) => {
            (WK_HOME, WK_QUEENSIDE_TO, WR_QUEENSIDE_HOME, WR_QUEENSIDE_TO)
        }
        (Color::Black, MoveKind::CastleKingside) => {
            (BK_HOME, BK_KINGSIDE_TO, BR_KINGSIDE_HOME, BR_KINGSIDE_TO)
        }
        (Color::Black, MoveKind::CastleQueenside) => {
            (BK_HOME, BK_QUEENSIDE_TO, BR_QUEENSIDE_HOME, BR_QUEENSIDE_TO)
        }
        _ => unreachable!("castle_squares called with a non-castling kind"),
    }
}

/// King move clears both of that side's bits; a rook move (or a capture
/// landing on a rook's home square) clears only the bit for that square.
fn update_castling_rights(
    rights: CastlingRights,
    piece: PieceType,
    color: Color,
    from: Option<Square>,
    to: Square,
    captured_square: Option<Square>,
) -> CastlingRights {
    let mut clear = 0u8;
    if let Some(from) = from {
        clear |= CastlingRights::bit_for_square(from);
    }
    clear |= CastlingRights::bit_for_square(to);
    if let Some(csq) = captured_square {
        clear |= CastlingRights::bit_for_square(csq);
    }
    if piece == PieceType::King {
        clear |= CastlingRights::both_bits(color);
    }
    rights.with_cleared(clear)
}

impl Position {
    /// Bitboard/aggregate/mailbox mutation only — no Zobrist update. Used by
    /// `unmake_move`, which restores `zbr` directly from the undo record
    /// rather than inverting the incremental update.
    fn raw_remove(&mut self, piece: Piece, sq: Square) {
        match piece {
            Piece::Colored(color, pt) => {
                let slot = &mut self.pieces[color.index()][pt.array_index()];
                *slot = slot.without(sq);
                match color {
                    Color::White => self.white = self.white.without(sq),
                    Color::Black => self.black = self.black.without(sq),
                }
            }
            Piece::Duck => self.duck = self.duck.without(sq),
        }
        self.mailbox[sq.index() as usize] = None;
    }

    fn raw_place(&mut self, piece: Piece, sq: Square) {
        match piece {
            Piece::Colored(color, pt) => {
                let slot = &mut self.pieces[color.index()][pt.array_index()];
                *slot = slot.with(sq);
                match color {
                    Color::White => self.white = self.white.with(sq),
                    Color::Black => self.black = self.black.with(sq),
                }
            }
            Piece::Duck => self.duck = self.duck.with(sq),
        }
        self.mailbox[sq.index() as usize] = Some(piece);
    }

    fn remove_piece(&mut self, piece: Piece, sq: Square) {
        self.raw_remove(piece, sq);
        self.zbr ^= zobrist::piece_key(piece, sq);
    }

    fn place_piece(&mut self, piece: Piece, sq: Square) {
        self.raw_place(piece, sq);
        self.zbr ^= zobrist::piece_key(piece, sq);
    }

    fn apply_castle(&mut self, color: Color, kind: MoveKind) {
        let (king_from, king_to, rook_from, rook_to) = castle_squares(color, kind);
        self.remove_piece(Piece::Colored(color, PieceType::King), king_from);
        self.place_piece(Piece::Colored(color, PieceType::King), king_to);
        self.remove_piece(Piece::Colored(color, PieceType::Rook), rook_from);
        self.place_piece(Piece::Colored(color, PieceType::Rook), rook_to);
        self.castle_rights = self.castle_rights.with_cleared(CastlingRights::both_bits(color));
    }

    fn apply_piece_move(&mut self, undo: &mut UndoRecord, color: Color, m: &Move) {
        let from = m.from.expect("non-duck, non-castle moves always carry a from square");
        let to = m.to;

        let captured_square = match m.kind {
            MoveKind::EnPassant => {
                let shift: i8 = if color == Color::White { -1 } else { 1 };
                Some(
                    to.offset(shift, 0)
                        .expect("en passant capture square is always on the board"),
                )
            }
            kind if kind.is_capture() => Some(to),
            _ => None,
        };

        if let Some(csq) = captured_square {
            let captured = self.mailbox[csq.index() as usize]
                .expect("capture target square is occupied by a capturable piece");
            undo.captured_piece = Some(captured);
            undo.captured_square = Some(csq);
            self.remove_piece(captured, csq);
        }

        self.remove_piece(Piece::Colored(color, m.piece), from);
        let placed_type = m.promotion.unwrap_or(m.piece);
        self.place_piece(Piece::Colored(color, placed_type), to);

        self.en_passant = if m.kind == MoveKind::DoublePawn {
            let shift: i8 = if color == Color::White { -1 } else { 1 };
            to.offset(shift, 0)
                .expect("double push target always has a square behind it")
                .mask()
        } else {
            Bitboard::EMPTY
        };

        self.castle_rights =
            update_castling_rights(self.castle_rights, m.piece, color, Some(from), to, captured_square);
    }

    /// Apply `m`, the only mutator besides [`Position::skip_move`]. Snapshots
    /// pre-move state into a fresh `UndoRecord`, dispatches by `m.kind`,
    /// updates castling rights/halfmove clock/fullmove count, recomputes
    /// `occupied`, incrementally updates `zbr`, advances `turn`, and
    /// refreshes `game_state`.
    pub fn make_move(&mut self, m: Move) {
        let mut undo = UndoRecord {
            game_state: self.game_state,
            turn: self.turn,
            duck: self.duck,
            castle_rights: self.castle_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_count: self.fullmove_count,
            captured_piece: None,
            captured_square: None,
            mv: Some(m),
            zbr: self.zbr,
        };

        let old_turn = self.turn;
        let color = old_turn.color();

        self.zbr ^= zobrist::turn_key(old_turn);
        self.zbr ^= zobrist::castle_rights_key(self.castle_rights.0);
        self.zbr ^= zobrist::en_passant_key(self.en_passant_square().map(Square::file));

        match m.kind {
            MoveKind::Duck => {
                if let Some(from) = m.from {
                    self.remove_piece(Piece::Duck, from);
                }
                self.place_piece(Piece::Duck, m.to);
            }
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                self.apply_castle(color, m.kind);
                self.en_passant = Bitboard::EMPTY;
            }
            _ => self.apply_piece_move(&mut undo, color, &m),
        }

        self.halfmove_clock = if resets_halfmove_clock(m.piece, m.kind) {
            0
        } else {
            self.halfmove_clock + 1
        };

        if old_turn == Side::BlackDuck {
            self.fullmove_count += 1;
        }

        self.occupied = self.white | self.black | self.duck;
        self.turn = old_turn.next();

        self.zbr ^= zobrist::turn_key(self.turn);
        self.zbr ^= zobrist::castle_rights_key(self.castle_rights.0);
        self.zbr ^= zobrist::en_passant_key(self.en_passant_square().map(Square::file));

        self.history.push(undo);
        self.update_game_state();
    }

    /// Reverse the most recently applied move (or skipped turn), restoring
    /// every field the corresponding `UndoRecord` carries. A no-op if only
    /// the initial snapshot remains in `history` (the `CorruptHistory`
    /// condition, which is never surfaced to callers).
    pub fn unmake_move(&mut self) {
        if self.history.len() <= 1 {
            debug_assert!(false, "unmake_move called with empty history beyond the initial snapshot");
            return;
        }
        let undo = self.history.pop().expect("checked non-empty above");

        if let Some(mv) = undo.mv {
            let color = undo.turn.color();
            match mv.kind {
                MoveKind::Duck => {
                    if let Some(cur) = self.duck.lsb() {
                        self.raw_remove(Piece::Duck, cur);
                    }
                    if let Some(prev) = undo.duck.lsb() {
                        self.raw_place(Piece::Duck, prev);
                    }
                }
                MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                    let (king_from, king_to, rook_from, rook_to) = castle_squares(color, mv.kind);
                    self.raw_remove(Piece::Colored(color, PieceType::King), king_to);
                    self.raw_place(Piece::Colored(color, PieceType::King), king_from);
                    self.raw_remove(Piece::Colored(color, PieceType::Rook), rook_to);
                    self.raw_place(Piece::Colored(color, PieceType::Rook), rook_from);
                }
                _ => {
                    let from = mv.from.expect("non-duck, non-castle moves always carry a from square");
                    let to = mv.to;
                    let placed_type = mv.promotion.unwrap_or(mv.piece);
                    self.raw_remove(Piece::Colored(color, placed_type), to);
                    self.raw_place(Piece::Colored(color, mv.piece), from);
                    if let (Some(captured), Some(csq)) = (undo.captured_piece, undo.captured_square) {
                        self.raw_place(captured, csq);
                    }
                }
            }
        }

        self.game_state = undo.game_state;
        self.turn = undo.turn;
        self.castle_rights = undo.castle_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_count = undo.fullmove_count;
        self.occupied = self.white | self.black | self.duck;
        self.zbr = undo.zbr;
    }

    /// Advance `turn` by one step without moving any pieces, recording an
    /// `UndoRecord` sufficient to restore it. Used only by search to
    /// suppress the duck-placement sub-turn inside the recursion.
    pub fn skip_move(&mut self) {
        let undo = UndoRecord {
            game_state: self.game_state,
            turn: self.turn,
            duck: self.duck,
            castle_rights: self.castle_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_count: self.fullmove_count,
            captured_piece: None,
            captured_square: None,
            mv: None,
            zbr: self.zbr,
        };
        self.zbr ^= zobrist::turn_key(self.turn);
        self.turn = self.turn.next();
        self.zbr ^= zobrist::turn_key(self.turn);
        self.history.push(undo);
    }

    fn update_game_state(&mut self) {
        let white_king = self.piece_bb(Color::White, PieceType::King);
        let black_king = self.piece_bb(Color::Black, PieceType::King);
        self.game_state = if black_king.is_empty() {
            GameState::WhiteWins
        } else if white_king.is_empty() {
            GameState::BlackWins
        } else if self.halfmove_clock >= 50 || self.generate_moves().is_empty() {
            GameState::Stalemate
        } else {
            GameState::Ongoing
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionBuilder;
    use crate::types::Move;

    #[test]
    fn make_then_unmake_quiet_move_restores_position_bit_exact() {
        let mut position = PositionBuilder::starting().build();
        let before = position.clone();
        let m = Move::quiet(PieceType::Pawn, Square::new(1, 4), Square::new(2, 4));
        position.make_move(m);
        position.unmake_move();
        assert_eq!(position.pieces, before.pieces);
        assert_eq!(position.white, before.white);
        assert_eq!(position.black, before.black);
        assert_eq!(position.mailbox, before.mailbox);
        assert_eq!(position.zbr, before.zbr);
        assert_eq!(position.turn, before.turn);
        assert_eq!(position.castle_rights, before.castle_rights);
    }

    #[test]
    fn double_pawn_push_sets_en_passant_square() {
        let mut position = PositionBuilder::starting().build();
        let m = Move::double_pawn(Square::new(1, 4), Square::new(3, 4));
        position.make_move(m);
        assert_eq!(position.en_passant_square(), Some(Square::new(2, 4)));
    }

    #[test]
    fn king_move_clears_both_castling_bits() {
        let mut position = PositionBuilder::new()
            .piece(Square::new(0, 4), Color::White, PieceType::King)
            .piece(Square::new(7, 4), Color::Black, PieceType::King)
            .castle_rights(CastlingRights::STARTING)
            .build();
        let m = Move::quiet(PieceType::King, Square::new(0, 4), Square::new(0, 3));
        position.make_move(m);
        assert!(!position.castle_rights.kingside(Color::White));
        assert!(!position.castle_rights.queenside(Color::White));
        assert!(position.castle_rights.kingside(Color::Black));
    }

    #[test]
    fn duck_move_round_trips_through_make_and_unmake() {
        let mut position = PositionBuilder::starting().build();
        let place = Move::duck(None, Square::new(4, 3));
        position.make_move(place);
        assert_eq!(position.duck, Square::new(4, 3).mask());

        let relocate = Move::duck(Some(Square::new(4, 3)), Square::new(5, 3));
        let zbr_after_place = position.zbr;
        position.make_move(relocate);
        assert_eq!(position.duck, Square::new(5, 3).mask());
        position.unmake_move();
        assert_eq!(position.duck, Square::new(4, 3).mask());
        assert_eq!(position.zbr, zbr_after_place);
    }

    #[test]
    fn skip_move_only_advances_turn() {
        let mut position = PositionBuilder::starting().build();
        let pieces_before = position.pieces;
        position.skip_move();
        assert_eq!(position.turn, Side::WhiteDuck);
        assert_eq!(position.pieces, pieces_before);
        position.unmake_move();
        assert_eq!(position.turn, Side::White);
    }

    #[test]
    fn king_capture_ends_the_game_immediately() {
        let mut position = PositionBuilder::new()
            .piece(Square::new(0, 4), Color::White, PieceType::Queen)
            .piece(Square::new(7, 4), Color::Black, PieceType::King)
            .build();
        let m = Move::capture(PieceType::Queen, Square::new(0, 4), Square::new(7, 4));
        position.make_move(m);
        assert_eq!(position.game_state, GameState::WhiteWins);
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_move_and_capture() {
        let mut position = PositionBuilder::new()
            .piece(Square::new(0, 4), Color::White, PieceType::King)
            .piece(Square::new(7, 4), Color::Black, PieceType::King)
            .piece(Square::new(3, 3), Color::White, PieceType::Knight)
            .build();
        position.halfmove_clock = 12;
        let quiet_king_move = Move::quiet(PieceType::King, Square::new(0, 4), Square::new(0, 3));
        position.make_move(quiet_king_move);
        assert_eq!(position.halfmove_clock, 13);

        let mut position = PositionBuilder::starting().build();
        position.halfmove_clock = 12;
        let pawn_push = Move::quiet(PieceType::Pawn, Square::new(1, 4), Square::new(2, 4));
        position.make_move(pawn_push);
        assert_eq!(position.halfmove_clock, 0);
    }
}
