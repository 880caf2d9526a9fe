//! The evaluator contract search is built against, plus the material,
//! mobility, and king-safety reference implementation.
//!
//! This module intentionally stops at the reference scorer; a learned model
//! is an external collaborator that only needs to satisfy [`Evaluator`] to
//! plug into [`crate::search`].

use crate::bits;
use crate::movegen;
use crate::position::Position;
use crate::types::{Color, PIECE_TYPES};

/// Options passed through to an evaluator. Unknown keys a caller might have
/// meant for some other evaluator are simply ignored by whichever evaluator
/// receives them — there is no validation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalKwargs {
    /// Search depth the evaluator may use to decide how much work to do
    /// (e.g. a learned model batching deeper positions differently).
    pub depth: Option<u8>,
}

/// A position score, higher is better for White. The NN variant instead
/// reports a `(p_white, p_black)` pair summing to 1; the search picks its
/// negamax transform based on which variant it receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Classical(f64),
    /// `(p_white, p_black)`, `p_white + p_black == 1.0`.
    Pair(f64, f64),
}

impl Score {
    /// This score from White's perspective, regardless of variant.
    #[must_use]
    pub fn white_relative(self) -> f64 {
        match self {
            Score::Classical(s) => s,
            Score::Pair(p_white, _) => p_white,
        }
    }

    /// This score as `color` would see it: unchanged for White, negated (or
    /// complemented, for the NN pair) for Black.
    #[must_use]
    pub fn relative_to(self, color: Color) -> f64 {
        match (self, color) {
            (Score::Classical(s), Color::White) => s,
            (Score::Classical(s), Color::Black) => -s,
            (Score::Pair(p_white, _), Color::White) => p_white,
            (Score::Pair(_, p_black), Color::Black) => p_black,
        }
    }
}

/// Capability contract an evaluator must satisfy: score a position from a
/// read-only reference, without leaving it mutated. Implementers may
/// temporarily mutate via `skip_move` (e.g. to probe a quiet sub-position)
/// but must restore the position before returning.
pub trait Evaluator {
    fn evaluate(&self, position: &Position, kwargs: &EvalKwargs) -> Score;

    /// Whether this evaluator returns [`Score::Pair`]. The search uses this
    /// to choose its negamax transform: sign-negation for a classical
    /// scorer, "1 minus the opponent's share" for an NN pair.
    fn is_nn(&self) -> bool {
        false
    }
}

/// The reference scorer: material, mobility, and king-safety terms, summed.
/// Never mutates `position`; `kwargs` is accepted for contract conformance
/// and otherwise unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialMobilityEvaluator;

impl Evaluator for MaterialMobilityEvaluator {
    fn evaluate(&self, position: &Position, _kwargs: &EvalKwargs) -> Score {
        Score::Classical(material_term(position) + mobility_term(position) + king_safety_term(position))
    }
}

fn material_term(position: &Position) -> f64 {
    let mut total = 0.0;
    for &pt in &PIECE_TYPES {
        let white_count = f64::from(position.piece_bb(Color::White, pt).popcount());
        let black_count = f64::from(position.piece_bb(Color::Black, pt).popcount());
        total += (white_count - black_count) * pt.material_value();
    }
    total
}

fn mobility_term(position: &Position) -> f64 {
    let white = movegen::generate_piece_moves_for(position, Color::White).len() as f64;
    let black = movegen::generate_piece_moves_for(position, Color::Black).len() as f64;
    0.01 * (white - black)
}

fn king_safety_term(position: &Position) -> f64 {
    let defenders = |color: Color| {
        position
            .king_square(color)
            .map_or(0.0, |sq| f64::from((bits::KING_ATTACKS[sq.index() as usize] & position.allies(color)).popcount()))
    };
    defenders(Color::White) - defenders(Color::Black)
}
