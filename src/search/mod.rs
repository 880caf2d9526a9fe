//! Arena-based persistent search tree, negamax with alpha-beta pruning, a
//! plain (unpruned) negamax cross-check, and the zobrist-keyed
//! transposition table they may optionally share.
//!
//! Both search algorithms generate pseudo-legal moves inside the recursion
//! (the duck is excluded as a blocker there, see
//! [`crate::movegen::generate_moves_for_search`]) and full legal moves at
//! the root. The duck half-turn itself is never searched: `make_move` is
//! always paired with `skip_move` to swallow it, and the root samples a
//! uniformly random legal duck move only after the best piece move is
//! chosen.

pub mod tt;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::eval::{EvalKwargs, Evaluator};
use crate::movegen;
use crate::position::Position;
use crate::types::{Move, MoveList};

/// Host-controlled bounds on one search call: a hard depth, an optional
/// node budget, and a cooperative cancellation flag the host can flip from
/// outside the search (e.g. on a timeout timer on another thread).
/// Mirrors the teacher's `SearchClock`/`SearchLimits` pair, minus wall-clock
/// deadlines — this core has no timing source of its own.
#[derive(Clone)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub max_nodes: Option<u64>,
    pub cancel: Arc<AtomicBool>,
}

impl SearchLimits {
    #[must_use]
    pub fn new(max_depth: u8) -> Self {
        SearchLimits {
            max_depth,
            max_nodes: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Index into a [`Tree`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

struct Node {
    mv: Option<Move>,
    children: Vec<NodeId>,
    score: f64,
}

/// Lazily expanded search tree. An [`crate::agent::Agent`] keeps one of
/// these alive across successive searches so the subtree under whichever
/// move is actually played survives into the next search as its new root.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node {
                mv: None,
                children: Vec::new(),
                score: f64::NEG_INFINITY,
            }],
        }
    }

    /// The tree's root is always arena index 0, by construction: a fresh
    /// tree starts there, and [`Tree::re_root`] rebuilds a new arena whose
    /// root is again index 0.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn is_expanded(&self, id: NodeId) -> bool {
        !self.nodes[id.0].children.is_empty()
    }

    /// Create one child per move in `moves`. A no-op if `id` already has
    /// children, since the caller can't tell statically whether a reused
    /// node from a previous search was already expanded.
    fn expand(&mut self, id: NodeId, moves: &MoveList) {
        if self.is_expanded(id) {
            return;
        }
        for &mv in moves {
            let child_id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                mv: Some(mv),
                children: Vec::new(),
                score: f64::NEG_INFINITY,
            });
            self.nodes[id.0].children.push(child_id);
        }
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `id`'s children ordered by descending score, the move-ordering hint
    /// named in §4.6: a child searched to a useful score on some earlier
    /// call sorts first next time, tightening the alpha-beta window sooner.
    fn children_by_score_desc(&self, id: NodeId) -> Vec<NodeId> {
        let mut kids = self.nodes[id.0].children.clone();
        kids.sort_by(|a, b| {
            self.nodes[b.0]
                .score
                .partial_cmp(&self.nodes[a.0].score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        kids
    }

    fn mv(&self, id: NodeId) -> Move {
        self.nodes[id.0].mv.expect("only the root node has no move")
    }

    fn set_score(&mut self, id: NodeId, score: f64) {
        self.nodes[id.0].score = score;
    }

    /// The generated move matching `mv` among the root's children, if the
    /// root has been expanded and `mv` is among them.
    #[must_use]
    pub fn find_root_child(&self, mv: Move) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|&id| self.nodes[id.0].mv.is_some_and(|child_mv| child_mv.matches_squares(&mv)))
    }

    /// Re-root the tree at `new_root`, one of the current root's
    /// descendants. The new root's own children are **not** carried over:
    /// any node below the real root was expanded by the recursion using
    /// pseudo-legal, duck-excluded generation, which is invalid for a new
    /// root that must generate full legal moves with the duck included as
    /// a blocker. Only the node's score survives, as a move-ordering seed
    /// once it re-expands.
    #[must_use]
    pub fn re_root(&self, new_root: NodeId) -> Tree {
        Tree {
            nodes: vec![Node {
                mv: None,
                children: Vec::new(),
                score: self.nodes[new_root.0].score,
            }],
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// `-score` for the classical sign-negation transform, or `1 - score` for
/// the NN pair transform (§4.7); both are their own inverse, so the same
/// function negates a bound on the way down the recursion and a result on
/// the way back up.
fn negate(score: f64, is_nn: bool) -> f64 {
    if is_nn {
        1.0 - score
    } else {
        -score
    }
}

fn initial_window(is_nn: bool) -> (f64, f64) {
    if is_nn {
        (0.0, 1.0)
    } else {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

fn sample_duck_move(position: &mut Position, piece_move: Move) -> Move {
    position.make_move(piece_move);
    let duck_moves = position.generate_moves();
    let duck_move = *duck_moves
        .as_slice()
        .choose(&mut rand::thread_rng())
        .expect("a duck sub-turn always has at least one legal move (some square is empty)");
    position.unmake_move();
    duck_move
}

/// One search call's shared state: the evaluator and its kwargs, the host's
/// limits, an optional transposition table, and the running node counter.
/// Bundles the parameters every recursive call would otherwise need to
/// thread individually, the way the teacher's `SearchState`/`SearchTables`
/// bundle theirs.
pub struct SearchContext<'a> {
    evaluator: &'a dyn Evaluator,
    kwargs: &'a EvalKwargs,
    limits: &'a SearchLimits,
    tt: Option<&'a mut tt::TranspositionTable>,
    nodes_visited: u64,
}

impl<'a> SearchContext<'a> {
    #[must_use]
    pub fn new(evaluator: &'a dyn Evaluator, kwargs: &'a EvalKwargs, limits: &'a SearchLimits) -> Self {
        SearchContext {
            evaluator,
            kwargs,
            limits,
            tt: None,
            nodes_visited: 0,
        }
    }

    #[must_use]
    pub fn with_tt(mut self, tt: &'a mut tt::TranspositionTable) -> Self {
        self.tt = Some(tt);
        self
    }

    #[must_use]
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    fn is_nn(&self) -> bool {
        self.evaluator.is_nn()
    }

    fn budget_exhausted(&self) -> bool {
        self.limits.is_cancelled() || self.limits.max_nodes.is_some_and(|max| self.nodes_visited > max)
    }

    fn leaf_score(&self, position: &Position) -> f64 {
        self.evaluator.evaluate(position, self.kwargs).relative_to(position.turn.color())
    }

    /// Negamax with alpha-beta pruning (§4.7). Expands `node` lazily,
    /// orders its children by descending score, and recurses with the
    /// duck half-turn suppressed by a `skip_move`/double-`unmake_move`
    /// pair around each child. Returns `node`'s score from the point of
    /// view of the side to move when this call was entered.
    fn alpha_beta(&mut self, position: &mut Position, tree: &mut Tree, node: NodeId, mut alpha: f64, beta: f64, depth: u8) -> f64 {
        self.nodes_visited += 1;
        if depth == 0 || self.budget_exhausted() {
            let score = self.leaf_score(position);
            tree.set_score(node, score);
            return score;
        }

        let original_alpha = alpha;
        if let Some(tt) = self.tt.as_deref() {
            if let Some(entry) = tt.probe(position.zbr) {
                if u32::from(entry.depth) >= u32::from(depth) {
                    match entry.bound {
                        tt::Bound::Exact => return entry.score,
                        tt::Bound::Lower if entry.score >= beta => return entry.score,
                        tt::Bound::Upper if entry.score <= alpha => return entry.score,
                        _ => {}
                    }
                }
            }
        }

        if !tree.is_expanded(node) {
            let moves = movegen::generate_moves_for_search(position, position.turn.color());
            tree.expand(node, &moves);
        }

        let is_nn = self.is_nn();
        let mut best = alpha;
        let mut fail_high = false;

        for child in tree.children_by_score_desc(node) {
            let mv = tree.mv(child);
            position.make_move(mv);
            position.skip_move();
            let child_score = negate(
                self.alpha_beta(position, tree, child, negate(beta, is_nn), negate(best, is_nn), depth - 1),
                is_nn,
            );
            position.unmake_move();
            position.unmake_move();
            tree.set_score(child, child_score);

            if child_score >= beta {
                best = beta;
                fail_high = true;
                break;
            }
            if child_score > best {
                best = child_score;
            }
        }
        tree.set_score(node, best);

        if let Some(tt) = self.tt.as_deref_mut() {
            let bound = if fail_high {
                tt::Bound::Lower
            } else if best <= original_alpha {
                tt::Bound::Upper
            } else {
                tt::Bound::Exact
            };
            tt.store(position.zbr, depth, best, bound);
        }

        best
    }

    /// Depth-limited negamax without pruning, expanding every child
    /// unconditionally. Kept purely as a cross-check: at a fixed depth it
    /// must return the same score (and root move) as [`Self::alpha_beta`],
    /// having visited at least as many nodes.
    fn negamax_plain(&mut self, position: &mut Position, tree: &mut Tree, node: NodeId, depth: u8) -> f64 {
        self.nodes_visited += 1;
        if depth == 0 {
            let score = self.leaf_score(position);
            tree.set_score(node, score);
            return score;
        }

        if !tree.is_expanded(node) {
            let moves = movegen::generate_moves_for_search(position, position.turn.color());
            tree.expand(node, &moves);
        }

        let is_nn = self.is_nn();
        let mut best = f64::NEG_INFINITY;
        for child in tree.children(node).to_vec() {
            let mv = tree.mv(child);
            position.make_move(mv);
            position.skip_move();
            let child_score = negate(self.negamax_plain(position, tree, child, depth - 1), is_nn);
            position.unmake_move();
            position.unmake_move();
            tree.set_score(child, child_score);
            if child_score > best {
                best = child_score;
            }
        }
        tree.set_score(node, best);
        best
    }

    /// Root driver for the alpha-beta search: iterates the current
    /// position's full legal moves (duck included as a blocker), searches
    /// each to `limits.max_depth - 1` plies beyond the root ply, and picks
    /// the argmax. `position` is left exactly as it was found — the host
    /// applies the returned moves itself via `Agent::play_move`.
    pub fn search_best_move(&mut self, position: &mut Position, tree: &mut Tree) -> (f64, Move, Move) {
        let root = tree.root();
        let legal_moves = position.generate_moves();
        tree.expand(root, &legal_moves);

        let is_nn = self.is_nn();
        let (alpha0, beta0) = initial_window(is_nn);
        let mut alpha = alpha0;
        let mut best_score = alpha0;
        let mut best_move: Option<Move> = None;

        for child in tree.children_by_score_desc(root) {
            let mv = tree.mv(child);
            if !legal_moves.contains_squares(&mv) {
                continue;
            }
            position.make_move(mv);
            position.skip_move();
            let score = negate(
                self.alpha_beta(position, tree, child, negate(beta0, is_nn), negate(alpha, is_nn), self.limits.max_depth.saturating_sub(1)),
                is_nn,
            );
            position.unmake_move();
            position.unmake_move();
            tree.set_score(child, score);

            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
        }

        let best_move = best_move.expect("a position with any legal piece move reaches this point");
        let duck_move = sample_duck_move(position, best_move);
        (best_score, best_move, duck_move)
    }

    /// Root driver for [`Self::negamax_plain`], the cross-check search.
    pub fn search_best_move_plain(&mut self, position: &mut Position, tree: &mut Tree) -> (f64, Move, Move) {
        let root = tree.root();
        let legal_moves = position.generate_moves();
        tree.expand(root, &legal_moves);

        let is_nn = self.is_nn();
        let mut best_score = f64::NEG_INFINITY;
        let mut best_move: Option<Move> = None;

        for child in tree.children_by_score_desc(root) {
            let mv = tree.mv(child);
            if !legal_moves.contains_squares(&mv) {
                continue;
            }
            position.make_move(mv);
            position.skip_move();
            let score = negate(self.negamax_plain(position, tree, child, self.limits.max_depth.saturating_sub(1)), is_nn);
            position.unmake_move();
            position.unmake_move();
            tree.set_score(child, score);

            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        let best_move = best_move.expect("a position with any legal piece move reaches this point");
        let duck_move = sample_duck_move(position, best_move);
        (best_score, best_move, duck_move)
    }
}
