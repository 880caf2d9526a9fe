//! [`Agent`]: the host-facing adapter combining a [`Position`], a
//! persistent [`search::Tree`], and a pluggable [`Evaluator`] into the
//! `get_next_move`/`play_move` loop a game manager drives (§6).

use crate::error::IllegalManualMove;
use crate::eval::{EvalKwargs, Evaluator, MaterialMobilityEvaluator};
use crate::position::Position;
use crate::search::{SearchContext, SearchLimits, Tree};
use crate::types::Move;

#[cfg(feature = "logging")]
use log::info;

/// Plies searched when a caller doesn't specify its own [`SearchLimits`].
pub const DEFAULT_SEARCH_DEPTH: u8 = 4;

/// Host-facing wrapper around one side of a Duck Chess game: it owns the
/// position, the persistent search tree rooted at that position, and the
/// evaluator driving its own moves. A game manager holds one `Agent` per
/// side (possibly with different evaluators) and alternates
/// `get_next_move`/`play_move` calls between them, mirroring how the
/// original engine's two agents take turns.
pub struct Agent<E: Evaluator = MaterialMobilityEvaluator> {
    position: Position,
    tree: Tree,
    evaluator: E,
    limits: SearchLimits,
}

impl<E: Evaluator> Agent<E> {
    #[must_use]
    pub fn new(evaluator: E, limits: SearchLimits) -> Self {
        Agent {
            position: Position::starting(),
            tree: Tree::new(),
            evaluator,
            limits,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Discard the current game and start over from the standard opening
    /// position, with a fresh search tree.
    pub fn reset(&mut self) {
        self.position = Position::starting();
        self.tree = Tree::new();
        #[cfg(feature = "logging")]
        info!("agent reset to the starting position");
    }

    /// Search the current position to `limits.max_depth` and return
    /// `(score, piece_move, duck_move)`. Neither move is applied — the
    /// caller plays them back via [`Self::play_move`], once each, the same
    /// way a game manager relays one agent's choice to its opponent.
    pub fn get_next_move(&mut self) -> (f64, Move, Move) {
        let kwargs = EvalKwargs { depth: Some(self.limits.max_depth) };
        let mut ctx = SearchContext::new(&self.evaluator, &kwargs, &self.limits);
        let (score, piece_move, duck_move) = ctx.search_best_move(&mut self.position, &mut self.tree);
        #[cfg(feature = "logging")]
        info!("search chose {piece_move} / {duck_move} (score {score:.3}, {} nodes)", ctx.nodes_visited());
        (score, piece_move, duck_move)
    }

    /// Apply a move (from a search result, or a manually notated one
    /// resolved via [`Position::resolve_manual_move`]) to the agent's own
    /// position and tree. Re-roots the tree at the played move's child
    /// when that child exists and was already expanded under this
    /// agent's own search; otherwise starts a fresh single-node tree,
    /// which happens for every opponent-played move since this agent
    /// never expanded it itself.
    pub fn play_move(&mut self, m: Move) -> Result<(), IllegalManualMove> {
        let resolved = self.position.resolve_manual_move(&m)?;
        #[cfg(feature = "logging")]
        info!("playing {resolved}");

        self.tree = match self.tree.find_root_child(resolved) {
            Some(child) => self.tree.re_root(child),
            None => Tree::new(),
        };
        self.position.make_move(resolved);
        Ok(())
    }
}

impl Agent<MaterialMobilityEvaluator> {
    /// An agent using the reference material/mobility/king-safety
    /// evaluator at [`DEFAULT_SEARCH_DEPTH`].
    #[must_use]
    pub fn default_agent() -> Self {
        Agent::new(MaterialMobilityEvaluator, SearchLimits::new(DEFAULT_SEARCH_DEPTH))
    }
}
