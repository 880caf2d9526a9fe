use crate::bits;
use crate::position::Position;
use crate::types::{Bitboard, Color, Move, MoveList, PieceType, Square};

pub fn generate_knights(
    position: &Position,
    color: Color,
    blockers: Bitboard,
    enemies: Bitboard,
    moves: &mut MoveList,
) {
    for from in position.piece_bb(color, PieceType::Knight) {
        let targets = bits::KNIGHT_ATTACKS[from.index() as usize] & !blockers;
        push_targets(moves, PieceType::Knight, from, targets, enemies);
    }
}

pub fn generate_king(
    position: &Position,
    color: Color,
    blockers: Bitboard,
    enemies: Bitboard,
    moves: &mut MoveList,
) {
    if let Some(from) = position.piece_bb(color, PieceType::King).lsb() {
        let targets = bits::KING_ATTACKS[from.index() as usize] & !blockers;
        push_targets(moves, PieceType::King, from, targets, enemies);
    }
}

fn push_targets(moves: &mut MoveList, piece: PieceType, from: Square, targets: Bitboard, enemies: Bitboard) {
    for to in targets {
        if enemies.contains(to) {
            moves.push(Move::capture(piece, from, to));
        } else {
            moves.push(Move::quiet(piece, from, to));
        }
    }
}
