use crate::bits;
use crate::position::Position;
use crate::types::{Bitboard, Color, Move, MoveList, PieceType, Square};

/// Bishop, rook, and queen moves via Hyperbola-Quintessence, masked off
/// `blockers`. `occ` is the occupancy the ray-tracing itself stops at;
/// ordinarily identical to `position.occupied`, but the search recursion
/// passes an occupancy with the duck excluded (see
/// [`crate::movegen::generate_moves_for_search`]) so a stale duck square
/// doesn't block rays it won't actually occupy once really placed.
pub fn generate(position: &Position, color: Color, blockers: Bitboard, enemies: Bitboard, occ: Bitboard, moves: &mut MoveList) {
    for from in position.piece_bb(color, PieceType::Bishop) {
        push_slider(moves, PieceType::Bishop, from, bits::bishop_attacks(occ, from) & !blockers, enemies);
    }
    for from in position.piece_bb(color, PieceType::Rook) {
        push_slider(moves, PieceType::Rook, from, bits::rook_attacks(occ, from) & !blockers, enemies);
    }
    for from in position.piece_bb(color, PieceType::Queen) {
        push_slider(moves, PieceType::Queen, from, bits::queen_attacks(occ, from) & !blockers, enemies);
    }
}

fn push_slider(moves: &mut MoveList, piece: PieceType, from: Square, targets: Bitboard, enemies: Bitboard) {
    for to in targets {
        if enemies.contains(to) {
            moves.push(Move::capture(piece, from, to));
        } else {
            moves.push(Move::quiet(piece, from, to));
        }
    }
}
