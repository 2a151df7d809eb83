//! Genome operations shared by the learners.
//!
//! A genome is the plain array form of
//! [`EvaluationWeights`](oxifour_evaluator::EvaluationWeights), in feature
//! order.
//!
//! - [`random`] - uniform initialization in `[-1, 1)`
//! - [`uniform_crossover`] - each component from either parent with equal odds
//! - [`mutate`] - Gaussian noise on every component

use std::array;

use oxifour_evaluator::feature::FEATURE_COUNT;
use rand::Rng;
use rand_distr::Normal;

use crate::TrainingError;

pub type Genome = [f64; FEATURE_COUNT];

/// Lower bound of freshly drawn components.
pub const MIN_INITIAL_WEIGHT: f64 = -1.0;
/// Upper bound (exclusive) of freshly drawn components.
pub const MAX_INITIAL_WEIGHT: f64 = 1.0;

/// Draws every component uniformly from `[-1, 1)`.
pub fn random<R>(rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    array::from_fn(|_| rng.random_range(MIN_INITIAL_WEIGHT..MAX_INITIAL_WEIGHT))
}

/// Builds a child taking each component from `p1` or `p2` with probability
/// one half.
pub fn uniform_crossover<R>(p1: &Genome, p2: &Genome, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    array::from_fn(|i| if rng.random_bool(0.5) { p1[i] } else { p2[i] })
}

/// Returns the `N(0, sigma)` distribution used by [`mutate`].
///
/// `sigma` must be finite and non-negative.
pub fn gaussian(sigma: f64) -> Result<Normal<f64>, TrainingError> {
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(TrainingError::InvalidMutationSigma { sigma });
    }
    Normal::new(0.0, sigma).map_err(|_| TrainingError::InvalidMutationSigma { sigma })
}

/// Adds independent noise from `noise` to every component.
///
/// With a zero standard deviation the genome is left as it was.
pub fn mutate<R>(genome: &mut Genome, noise: &Normal<f64>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for w in genome {
        *w += rng.sample(noise);
    }
}
