//! Move search: choosing a column with depth-bounded alpha-beta.
//!
//! [`SearchAgent`] looks `depth` plies ahead. Leaves (and finished games)
//! are scored by its [`PositionEvaluator`] from the agent's own point of view,
//! so the agent maximizes on its turns and minimizes on the opponent's.
//!
//! # Root Evaluation
//!
//! Each candidate column at the root is searched on its own scoped thread
//! with a full `(-∞, +∞)` window, at `depth - 1`. Full columns score `-∞`.
//! Results are joined before any comparison, so thread completion order
//! cannot change the choice.
//!
//! # Tie-Breaking
//!
//! Equal scores go to the column closest to `3.25`. The offset makes the
//! preference total: 3, then 4, then 2, then 5, and so on.
//!
//! # Move Ordering
//!
//! Inside the tree children are visited in [`ColumnOrder`], center first,
//! which lets alpha-beta cut more branches. Ordering never changes the
//! result.

use std::thread;

use oxifour_engine::{BoardState, COLUMNS, Piece, Player};

use crate::evaluator::PositionEvaluator;

/// Column the root tie-break measures distance from.
const TIE_BREAK_CENTER: f64 = 3.25;

/// Order in which children are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOrder([usize; COLUMNS]);

impl ColumnOrder {
    /// Center column first, then alternating left and right outward:
    /// `[3, 2, 4, 1, 5, 0, 6]`.
    #[must_use]
    pub fn center_out() -> Self {
        let center = COLUMNS / 2;
        let mut order = [center; COLUMNS];
        for (i, slot) in order.iter_mut().enumerate().skip(1) {
            let offset = i.div_ceil(2);
            *slot = if i % 2 == 1 {
                center - offset
            } else {
                center + offset
            };
        }
        Self(order)
    }

    #[must_use]
    pub const fn columns(&self) -> &[usize; COLUMNS] {
        &self.0
    }
}

impl Default for ColumnOrder {
    fn default() -> Self {
        Self::center_out()
    }
}

/// A [`Player`] that searches the game tree with alpha-beta pruning.
#[derive(Debug)]
pub struct SearchAgent<'a> {
    color: Piece,
    depth: usize,
    order: ColumnOrder,
    evaluator: Box<dyn PositionEvaluator + 'a>,
}

impl<'a> SearchAgent<'a> {
    /// Creates an agent playing `color` that searches `depth` plies.
    #[must_use]
    pub fn new(color: Piece, depth: usize, evaluator: Box<dyn PositionEvaluator + 'a>) -> Self {
        Self::with_order(color, depth, ColumnOrder::center_out(), evaluator)
    }

    #[must_use]
    pub fn with_order(
        color: Piece,
        depth: usize,
        order: ColumnOrder,
        evaluator: Box<dyn PositionEvaluator + 'a>,
    ) -> Self {
        Self {
            color,
            depth,
            order,
            evaluator,
        }
    }

    #[must_use]
    pub fn color(&self) -> Piece {
        self.color
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Fail-hard alpha-beta value of `state` for this agent.
    ///
    /// Returns the evaluator's score at depth 0 or at a finished game. A
    /// maximizing node returns `alpha` and a minimizing node returns `beta`.
    #[must_use]
    pub fn alpha_beta(
        &self,
        state: &BoardState,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        if depth == 0 || state.is_terminal() {
            return self.evaluator.evaluate(state, self.color);
        }

        if state.turn() == self.color {
            for child in self.children(state) {
                alpha = alpha.max(self.alpha_beta(&child, depth - 1, alpha, beta));
                if beta <= alpha {
                    break;
                }
            }
            alpha
        } else {
            for child in self.children(state) {
                beta = beta.min(self.alpha_beta(&child, depth - 1, alpha, beta));
                if beta <= alpha {
                    break;
                }
            }
            beta
        }
    }

    /// Unpruned minimax value of `state`; matches [`Self::alpha_beta`] with
    /// a full window.
    #[must_use]
    pub fn minimax(&self, state: &BoardState, depth: usize) -> f64 {
        if depth == 0 || state.is_terminal() {
            return self.evaluator.evaluate(state, self.color);
        }

        let values = self
            .children(state)
            .map(|child| self.minimax(&child, depth - 1));
        if state.turn() == self.color {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }

    /// Scores every root column in parallel; unplayable columns get `-∞`.
    #[must_use]
    pub fn root_scores(&self, state: &BoardState) -> [f64; COLUMNS] {
        let depth = self.depth.saturating_sub(1);
        let mut scores = [f64::NEG_INFINITY; COLUMNS];

        thread::scope(|s| {
            for (column, score) in scores.iter_mut().enumerate() {
                let Ok(child) = state.apply(self.color, column) else {
                    continue;
                };
                s.spawn(move || {
                    *score = self.alpha_beta(&child, depth, f64::NEG_INFINITY, f64::INFINITY);
                });
            }
        });

        scores
    }

    /// Picks the best-scoring playable column, or `None` if there is none.
    #[must_use]
    pub fn best_move(&self, state: &BoardState) -> Option<usize> {
        let scores = self.root_scores(state);
        let mut best: Option<(usize, f64)> = None;
        for column in state.legal_columns() {
            let score = scores[column];
            let better = match best {
                None => true,
                Some((best_column, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && center_distance(column) < center_distance(best_column))
                }
            };
            if better {
                best = Some((column, score));
            }
        }
        let column = best.map(|(column, _)| column);
        tracing::trace!(color = %self.color, ?scores, ?column, "search done");
        column
    }

    fn children<'s>(&'s self, state: &'s BoardState) -> impl Iterator<Item = BoardState> + 's {
        self.order
            .columns()
            .iter()
            .filter_map(|&column| state.apply(state.turn(), column).ok())
    }
}

impl Player for SearchAgent<'_> {
    fn next_move(&mut self, state: &BoardState) -> usize {
        self.best_move(state).unwrap_or(0)
    }
}

#[expect(clippy::cast_precision_loss)]
fn center_distance(column: usize) -> f64 {
    (column as f64 - TIE_BREAK_CENTER).abs()
}
