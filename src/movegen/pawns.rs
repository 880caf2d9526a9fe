use crate::bits;
use crate::position::Position;
use crate::types::{Bitboard, Color, Move, MoveList, PieceType, Square, PROMOTION_PIECES};

/// Pawn pushes (single, double, promoting), diagonal captures, and the en
/// passant capture, all for `color`'s pawns in `position`. `occupied` is
/// passed explicitly (rather than read off `position`) so the search
/// recursion can generate pseudo-legal moves against an occupancy with the
/// duck excluded (see [`crate::movegen::generate_moves_for_search`]).
pub fn generate(position: &Position, color: Color, enemies: Bitboard, occupied: Bitboard, moves: &mut MoveList) {
    let pawns = position.piece_bb(color, PieceType::Pawn);

    let (forward, start_rank, promo_rank) = match color {
        Color::White => (1i8, 1u8, 7u8),
        Color::Black => (-1i8, 6u8, 0u8),
    };

    for from in pawns {
        if let Some(one) = from.offset(forward, 0) {
            if !occupied.contains(one) {
                push_quiet(moves, from, one, promo_rank);
                if from.rank() == start_rank {
                    if let Some(two) = one.offset(forward, 0) {
                        if !occupied.contains(two) {
                            moves.push(Move::double_pawn(from, two));
                        }
                    }
                }
            }
        }

        let attacks = bits::PAWN_ATTACKS[color.index()][from.index() as usize] & enemies;
        for to in attacks {
            push_capture(moves, from, to, promo_rank);
        }
    }

    generate_en_passant(position, color, pawns, moves);
}

fn generate_en_passant(position: &Position, color: Color, pawns: Bitboard, moves: &mut MoveList) {
    let Some(ep_square) = position.en_passant_square() else {
        return;
    };
    let attackers = bits::PAWN_ATTACKS[color.opponent().index()][ep_square.index() as usize] & pawns;
    for from in attackers {
        moves.push(Move::en_passant(from, ep_square));
    }
}

fn push_quiet(moves: &mut MoveList, from: Square, to: Square, promo_rank: u8) {
    if to.rank() == promo_rank {
        for &promo in &PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, promo, false));
        }
    } else {
        moves.push(Move::quiet(PieceType::Pawn, from, to));
    }
}

fn push_capture(moves: &mut MoveList, from: Square, to: Square, promo_rank: u8) {
    if to.rank() == promo_rank {
        for &promo in &PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, promo, true));
        }
    } else {
        moves.push(Move::capture(PieceType::Pawn, from, to));
    }
}
