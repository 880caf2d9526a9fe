use crate::position::Position;
use crate::types::{Bitboard, Color, Move, MoveList, Piece, PieceType, Square};

const WK_HOME: Square = Square(4);
const BK_HOME: Square = Square(60);

/// `(king_home, kingside_between, kingside_rook_home, kingside_to,
/// queenside_between, queenside_rook_home, queenside_to)` for `color`.
fn squares(color: Color) -> (Square, [Square; 2], Square, Square, [Square; 3], Square, Square) {
    match color {
        Color::White => (
            WK_HOME,
            [Square(5), Square(6)],
            Square(7),
            Square(6),
            [Square(1), Square(2), Square(3)],
            Square(0),
            Square(2),
        ),
        Color::Black => (
            BK_HOME,
            [Square(61), Square(62)],
            Square(63),
            Square(62),
            [Square(57), Square(58), Square(59)],
            Square(56),
            Square(58),
        ),
    }
}

/// Castling moves for `color`: the duck counts as occupying the squares
/// between king and rook the same as any piece (§4.3). `occ` is the
/// occupancy the emptiness check runs against — ordinarily
/// `position.occupied`, but the search recursion passes the duck-excluded
/// occupancy (see [`crate::movegen::generate_moves_for_search`]).
pub fn generate(position: &Position, color: Color, occ: Bitboard, moves: &mut MoveList) {
    let (king_home, kingside_between, kingside_rook_home, kingside_to, queenside_between, queenside_rook_home, queenside_to) =
        squares(color);

    if position.piece_at(king_home) != Some(Piece::Colored(color, PieceType::King)) {
        return;
    }

    if position.castle_rights.kingside(color)
        && kingside_between.iter().all(|&sq| !occ.contains(sq))
        && position.piece_at(kingside_rook_home) == Some(Piece::Colored(color, PieceType::Rook))
    {
        moves.push(Move::castle_kingside(king_home, kingside_to));
    }

    if position.castle_rights.queenside(color)
        && queenside_between.iter().all(|&sq| !occ.contains(sq))
        && position.piece_at(queenside_rook_home) == Some(Piece::Colored(color, PieceType::Rook))
    {
        moves.push(Move::castle_queenside(king_home, queenside_to));
    }
}
