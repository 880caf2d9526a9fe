//! `Side`: the four-phase turn cycle unique to Duck Chess.

use std::fmt;

use crate::types::Color;

/// One of the four half-turns that make up a full move: a side moves a
/// piece, then places or relocates the duck, before the opponent does the
/// same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    White,
    WhiteDuck,
    Black,
    BlackDuck,
}

impl Side {
    /// Cycles White -> WhiteDuck -> Black -> BlackDuck -> White.
    #[must_use]
    pub const fn next(self) -> Side {
        match self {
            Side::White => Side::WhiteDuck,
            Side::WhiteDuck => Side::Black,
            Side::Black => Side::BlackDuck,
            Side::BlackDuck => Side::White,
        }
    }

    /// True during either side's duck sub-turn.
    #[must_use]
    pub const fn is_duck_turn(self) -> bool {
        matches!(self, Side::WhiteDuck | Side::BlackDuck)
    }

    /// The colour whose piece/duck is moving, regardless of sub-turn.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Side::White | Side::WhiteDuck => Color::White,
            Side::Black | Side::BlackDuck => Color::Black,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::WhiteDuck => 1,
            Side::Black => 2,
            Side::BlackDuck => 3,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::White => "white",
            Side::WhiteDuck => "white (duck)",
            Side::Black => "black",
            Side::BlackDuck => "black (duck)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_four_in_order() {
        let mut side = Side::White;
        let mut seen = vec![side];
        for _ in 0..3 {
            side = side.next();
            seen.push(side);
        }
        assert_eq!(
            seen,
            vec![Side::White, Side::WhiteDuck, Side::Black, Side::BlackDuck]
        );
        assert_eq!(side.next(), Side::White);
    }

    #[test]
    fn duck_turn_flag_matches_variant() {
        assert!(!Side::White.is_duck_turn());
        assert!(Side::WhiteDuck.is_duck_turn());
        assert!(!Side::Black.is_duck_turn());
        assert!(Side::BlackDuck.is_duck_turn());
    }

    #[test]
    fn color_ignores_duck_sub_turn() {
        assert_eq!(Side::White.color(), Color::White);
        assert_eq!(Side::WhiteDuck.color(), Color::White);
        assert_eq!(Side::Black.color(), Color::Black);
        assert_eq!(Side::BlackDuck.color(), Color::Black);
    }
}
