//! Position evaluation: scoring a single board.
//!
//! A [`PositionEvaluator`] assigns a number to a position from one player's
//! point of view. Higher is better for that player. The search agent calls
//! it at every leaf, from several threads at once, so implementations take
//! `&self` and must be `Send + Sync`.
//!
//! [`LinearEvaluator`] is the fixed model: the dot product of the
//! [`FeatureVector`] with a set of [`EvaluationWeights`]. The training crate
//! supplies a learning evaluator that records what it sees.

use std::fmt;

use oxifour_engine::{BoardState, Piece};

use crate::{feature::FeatureVector, weights::EvaluationWeights};

/// Scores positions for the search.
pub trait PositionEvaluator: fmt::Debug + Send + Sync {
    /// Scores `state` as seen by `perspective` (higher is better).
    fn evaluate(&self, state: &BoardState, perspective: Piece) -> f64;
}

impl<E> PositionEvaluator for &E
where
    E: PositionEvaluator + ?Sized,
{
    fn evaluate(&self, state: &BoardState, perspective: Piece) -> f64 {
        (**self).evaluate(state, perspective)
    }
}

impl<E> PositionEvaluator for Box<E>
where
    E: PositionEvaluator + ?Sized,
{
    fn evaluate(&self, state: &BoardState, perspective: Piece) -> f64 {
        (**self).evaluate(state, perspective)
    }
}

/// Weighted sum of the six board features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEvaluator {
    weights: EvaluationWeights,
}

impl LinearEvaluator {
    #[must_use]
    pub const fn new(weights: EvaluationWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &EvaluationWeights {
        &self.weights
    }
}

impl PositionEvaluator for LinearEvaluator {
    #[inline]
    fn evaluate(&self, state: &BoardState, perspective: Piece) -> f64 {
        self.weights.dot(&FeatureVector::extract(state, perspective))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_evaluator_scores_features() {
        // Red has two threats on even rows.
        let state = BoardState::from_moves(&[3, 3, 3, 2, 3, 1, 1, 2, 2, 4]).unwrap();
        let weights = EvaluationWeights::from_array([0.0, 0.0, 1.5, -2.0, 0.0, 0.0]);
        let evaluator = LinearEvaluator::new(weights);
        assert_eq!(evaluator.evaluate(&state, Piece::Red), 3.0);
        assert_eq!(evaluator.evaluate(&state, Piece::Black), -4.0);
    }

    #[test]
    fn test_won_position_uses_win_weight() {
        let state = BoardState::from_moves(&[3, 0, 3, 0, 3, 1, 3]).unwrap();
        let evaluator = LinearEvaluator::new(EvaluationWeights::from_array([
            1.0, -1.0, 0.0, 0.0, 0.0, 0.0,
        ]));
        assert_eq!(evaluator.evaluate(&state, Piece::Red), 1.0);
        assert_eq!(evaluator.evaluate(&state, Piece::Black), -1.0);
    }

    #[test]
    fn test_references_and_boxes_evaluate_the_same() {
        let state = BoardState::from_moves(&[3, 3, 3, 2, 3, 1, 1, 2, 2, 4]).unwrap();
        let evaluator = LinearEvaluator::new(EvaluationWeights::BASELINE);
        let direct = evaluator.evaluate(&state, Piece::Red);
        let boxed: Box<dyn PositionEvaluator> = Box::new(&evaluator);
        assert_eq!(boxed.evaluate(&state, Piece::Red), direct);
    }
}
