//! Incremental Zobrist hashing.
//!
//! Key tables are drawn once from a fixed-seed RNG so hashes are stable
//! across runs (and so positions could, in principle, be persisted or
//! looked up across sessions). Castling rights are keyed by the literal
//! 4-bit rights value rather than XORing four independent per-bit keys —
//! a 16-entry table, since `CastlingRights` never carries more than four
//! meaningful bits.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Color, Piece, PieceType, Side, Square};

const ZOBRIST_SEED: u64 = 271_082;

struct ZobristKeys {
    /// Indexed `[piece_index][square]`. Piece index 0..5 are white
    /// pawn..king, 6..11 black pawn..king, 12 is the duck.
    piece_square: [[u64; 64]; 13],
    turn: [u64; 4],
    castle_rights: [u64; 16],
    /// Index 0..7 is the en passant file; index 8 is "no en passant".
    en_passant: [u64; 9],
}

fn piece_zobrist_index(piece: Piece) -> usize {
    match piece {
        Piece::Colored(Color::White, pt) => pt.array_index(),
        Piece::Colored(Color::Black, pt) => 6 + pt.array_index(),
        Piece::Duck => 12,
    }
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut piece_square = [[0u64; 64]; 13];
    for row in &mut piece_square {
        for key in row.iter_mut() {
            *key = rng.gen();
        }
    }
    let mut turn = [0u64; 4];
    for key in &mut turn {
        *key = rng.gen();
    }
    let mut castle_rights = [0u64; 16];
    for key in &mut castle_rights {
        *key = rng.gen();
    }
    let mut en_passant = [0u64; 9];
    for key in &mut en_passant {
        *key = rng.gen();
    }
    ZobristKeys {
        piece_square,
        turn,
        castle_rights,
        en_passant,
    }
});

#[must_use]
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece_zobrist_index(piece)][sq.index() as usize]
}

#[must_use]
pub fn turn_key(side: Side) -> u64 {
    KEYS.turn[side.index()]
}

#[must_use]
pub fn castle_rights_key(rights: u8) -> u64 {
    debug_assert!(rights < 16);
    KEYS.castle_rights[rights as usize]
}

/// `ep` is `0..8` for a file, or `8` for "no en passant square".
#[must_use]
pub fn en_passant_key(ep_file: Option<u8>) -> u64 {
    match ep_file {
        Some(file) => {
            debug_assert!(file < 8);
            KEYS.en_passant[file as usize]
        }
        None => KEYS.en_passant[8],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_keys_are_distinct_across_pieces_and_squares() {
        let a = piece_key(Piece::Colored(Color::White, PieceType::Pawn), Square(8));
        let b = piece_key(Piece::Colored(Color::White, PieceType::Pawn), Square(9));
        let c = piece_key(Piece::Colored(Color::Black, PieceType::Pawn), Square(8));
        let d = piece_key(Piece::Duck, Square(8));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn keys_are_deterministic_across_calls() {
        let a = piece_key(Piece::Colored(Color::White, PieceType::King), Square(4));
        let b = piece_key(Piece::Colored(Color::White, PieceType::King), Square(4));
        assert_eq!(a, b);
    }

    #[test]
    fn no_en_passant_key_differs_from_every_file_key() {
        let none_key = en_passant_key(None);
        for file in 0..8 {
            assert_ne!(none_key, en_passant_key(Some(file)));
        }
    }

    #[test]
    fn turn_keys_cover_all_four_sides() {
        let keys: Vec<u64> = [Side::White, Side::WhiteDuck, Side::Black, Side::BlackDuck]
            .iter()
            .map(|&s| turn_key(s))
            .collect();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j]);
            }
        }
    }
}
