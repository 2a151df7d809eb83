//! Position evaluation and move search for Connect-Four.
//!
//! The crate has two levels:
//!
//! 1. **Position Evaluation** ([`evaluator`]) - scores a single board from one
//!    player's point of view as a weighted sum of six features
//!    ([`feature`]): win, loss and the "threat" counts on even and odd rows
//!    for both sides.
//!
//! 2. **Move Search** ([`search`]) - a depth-bounded alpha-beta agent that
//!    uses a position evaluator at its leaves and evaluates the candidate
//!    moves at the root in parallel.
//!
//! # Architecture
//!
//! ```text
//! SearchAgent (choose a column)
//!     ↓ uses
//! PositionEvaluator (score a leaf position)
//!     ↓ uses
//! FeatureVector (win / lose / threat counts)
//! ```
//!
//! # Linear Evaluation Model
//!
//! Scores are computed as `Σ wᵢ · fᵢ` over [`EvaluationWeights`]. The weights
//! are what the training crate tunes; the features and the search stay
//! fixed.
//!
//! # Example
//!
//! ```
//! use oxifour_engine::{BoardState, Piece};
//! use oxifour_evaluator::{
//!     evaluator::LinearEvaluator, search::SearchAgent, weights::EvaluationWeights,
//! };
//!
//! let evaluator = LinearEvaluator::new(EvaluationWeights::BASELINE);
//! let agent = SearchAgent::new(Piece::Red, 2, Box::new(evaluator));
//!
//! let column = agent.best_move(&BoardState::new()).unwrap();
//! assert!(column < 7);
//! ```

pub use self::weights::EvaluationWeights;

pub mod evaluator;
pub mod feature;
pub mod search;
pub mod weights;
