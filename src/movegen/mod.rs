//! Pseudo-legal move generation: a piece turn for the side to move, or a
//! duck turn, dispatched on [`crate::types::Side`].
//!
//! Duck Chess has no check, so pseudo-legal and legal coincide for piece
//! moves (§4.3); the only "legality" filter left is the root/search split
//! between pseudo-legal generation (duck ignored as a blocker, used inside
//! the search recursion) and full legal generation (duck included, used at
//! the root and by the host-facing API).

mod castling;
mod duck;
mod leapers;
mod pawns;
mod sliders;

use crate::position::Position;
use crate::types::{Color, MoveList};

/// Pseudo-legal moves for `position.turn`: a duck placement/relocation list
/// during a duck sub-turn, or the full piece move list (pawns, leapers,
/// sliders, castling) otherwise. The duck counts as a real blocker — this is
/// the generator the root and the host-facing API use.
#[must_use]
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    if position.turn.is_duck_turn() {
        duck::generate(position, &mut moves);
        return moves;
    }

    let color: Color = position.turn.color();
    let blockers = position.blockers(color);
    let enemies = position.enemies(color);
    let occupied = position.occupied;

    pawns::generate(position, color, enemies, occupied, &mut moves);
    leapers::generate_knights(position, color, blockers, enemies, &mut moves);
    leapers::generate_king(position, color, blockers, enemies, &mut moves);
    sliders::generate(position, color, blockers, enemies, occupied, &mut moves);
    castling::generate(position, color, occupied, &mut moves);

    moves
}

/// Pseudo-legal piece moves for `color`, regardless of whose turn it
/// actually is. Used by the mobility term of the reference evaluator, which
/// needs both sides' move counts from the same position.
#[must_use]
pub fn generate_piece_moves_for(position: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    let blockers = position.blockers(color);
    let enemies = position.enemies(color);
    let occupied = position.occupied;

    pawns::generate(position, color, enemies, occupied, &mut moves);
    leapers::generate_knights(position, color, blockers, enemies, &mut moves);
    leapers::generate_king(position, color, blockers, enemies, &mut moves);
    sliders::generate(position, color, blockers, enemies, occupied, &mut moves);
    castling::generate(position, color, occupied, &mut moves);

    moves
}

/// Pseudo-legal piece moves for `color`, as seen from inside the search
/// recursion: the duck is excluded as a blocker entirely, both as a landing
/// square and as a ray-stop. `skip_move` never relocates the duck to where a
/// deeper ply's move will actually place it, so its current square is stale
/// for the purposes of this recursion — treating it as a blocker would
/// incorrectly forbid moves through/onto a square the duck won't occupy by
/// the time the real move is played. The root's [`generate_moves`] must
/// still use the duck as a real blocker; only the recursion calls this.
#[must_use]
pub fn generate_moves_for_search(position: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    let blockers = position.allies(color);
    let enemies = position.allies(color.opponent());
    let occupied = position.occupied & !position.duck;

    pawns::generate(position, color, enemies, occupied, &mut moves);
    leapers::generate_knights(position, color, blockers, enemies, &mut moves);
    leapers::generate_king(position, color, blockers, enemies, &mut moves);
    sliders::generate(position, color, blockers, enemies, occupied, &mut moves);
    castling::generate(position, color, occupied, &mut moves);

    moves
}
