//! Training for the Connect-Four evaluation weights.
//!
//! Two independent learners tune [`EvaluationWeights`]:
//!
//! - **Genetic algorithm** ([`genetic`]) - a population of weight vectors plays
//!   round-robin style tournaments; win rates drive fitness-proportionate
//!   selection, uniform crossover and Gaussian mutation.
//! - **LMS / TD learner** ([`lms`]) - evaluators record every position they
//!   score during self-play, then nudge their coefficients toward the
//!   best-reply score of each recorded position (or toward the final game
//!   result).
//!
//! # Architecture
//!
//! ```text
//! GeneticTrainer / LmsTrainer
//!     ↓ plays games via
//! self_play::play_match (two SearchAgents)
//!     ↓ scored by
//! PositionEvaluator (LinearEvaluator / LmsEvaluator)
//!     ↓ produces
//! fitness / learning samples
//! ```
//!
//! Games are played one after another. Each move is still searched in
//! parallel at the root by [`oxifour_evaluator::search::SearchAgent`].
//!
//! [`EvaluationWeights`]: oxifour_evaluator::EvaluationWeights

pub use self::error::TrainingError;

mod error;
pub mod genetic;
pub mod lms;
pub mod self_play;
pub mod weights;
