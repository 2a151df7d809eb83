//! Least-mean-squares learning from self-play.
//!
//! An [`LmsEvaluator`] scores positions like a linear evaluator, but also
//! remembers every position it scores. After a batch of games,
//! [`LmsEvaluator::learn`] moves the coefficients toward a target value for
//! each remembered position:
//!
//! ```text
//! coeff[j] += mu · (target - approx) · feature[j]
//! ```
//!
//! where `approx` is the position's score under the current coefficients.
//!
//! # Targets
//!
//! - [`LearningTarget::Bootstrap`] (temporal difference) - the best score
//!   among the position's already scored successors: the maximum when the
//!   remembering player is to move, the minimum otherwise. Finished games use
//!   their result instead (+1 win, -1 loss, 0 draw). Positions without any
//!   scored successor are skipped.
//! - [`LearningTarget::Outcome`] - the result of the game the position was
//!   seen in, recorded by [`LmsEvaluator::end_game`].
//!
//! # Recording
//!
//! Search threads call [`PositionEvaluator::evaluate`] concurrently, so the
//! memory sits behind a [`Mutex`]. Positions are keyed by board contents and
//! perspective; a position already seen in the current batch is not recorded
//! again. `learn` takes `&mut self`, so it can only run after every search
//! borrowing the evaluator has finished.

use std::{
    collections::{HashMap, hash_map::Entry},
    iter, mem,
    sync::{Mutex, PoisonError},
};

use oxifour_engine::{BoardState, Cells, Piece};
use oxifour_evaluator::{
    EvaluationWeights, evaluator::PositionEvaluator, feature::FeatureVector,
};
use rand::Rng;

use crate::{
    TrainingError,
    self_play::{self, MatchResult, outcome_reward},
    weights::{self, Genome},
};

/// What a remembered position is regressed toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LearningTarget {
    /// Best score among scored successors.
    #[default]
    Bootstrap,
    /// Final result of the game.
    Outcome,
}

/// One remembered evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub state: BoardState,
    pub perspective: Piece,
    pub score: f64,
}

/// Positions scored since the last learning pass.
#[derive(Debug, Default)]
pub struct LearningMemory {
    samples: Vec<Sample>,
    memo: HashMap<(Cells, Piece), f64>,
    outcomes: Vec<f64>,
}

impl LearningMemory {
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Score recorded for `state` from `perspective`, if any.
    #[must_use]
    pub fn score_of(&self, state: &BoardState, perspective: Piece) -> Option<f64> {
        self.memo.get(&(*state.cells(), perspective)).copied()
    }

    fn record(&mut self, sample: Sample) {
        if let Entry::Vacant(entry) = self.memo.entry((*sample.state.cells(), sample.perspective)) {
            entry.insert(sample.score);
            self.samples.push(sample);
        }
    }

    fn end_game(&mut self, winner: Option<Piece>) {
        let recorded = self.outcomes.len();
        self.outcomes.extend(
            self.samples[recorded..]
                .iter()
                .map(|sample| outcome_reward(winner, sample.perspective)),
        );
    }

    fn bootstrap_target(&self, sample: &Sample) -> Option<f64> {
        let state = &sample.state;
        if state.is_terminal() {
            let winner = Some(state.winner()).filter(|piece| !piece.is_empty());
            return Some(outcome_reward(winner, sample.perspective));
        }
        let scores = state
            .successors()
            .filter_map(|(_, child)| self.score_of(&child, sample.perspective));
        if state.turn() == sample.perspective {
            scores.reduce(f64::max)
        } else {
            scores.reduce(f64::min)
        }
    }
}

/// Result of one learning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LearnReport {
    /// Samples that updated the coefficients.
    pub trained: usize,
    /// Samples without a target.
    pub skipped: usize,
    /// Mean `|target - approx|` over trained samples, measured after the
    /// update. `None` when nothing was trained.
    pub mean_abs_error: Option<f64>,
}

/// Linear evaluator that learns from the positions it scores.
#[derive(Debug)]
pub struct LmsEvaluator {
    coefficients: Genome,
    target: LearningTarget,
    memory: Mutex<LearningMemory>,
}

impl LmsEvaluator {
    #[must_use]
    pub fn new(coefficients: Genome) -> Self {
        Self::with_target(coefficients, LearningTarget::default())
    }

    #[must_use]
    pub fn with_target(coefficients: Genome, target: LearningTarget) -> Self {
        Self {
            coefficients,
            target,
            memory: Mutex::default(),
        }
    }

    #[must_use]
    pub fn coefficients(&self) -> &Genome {
        &self.coefficients
    }

    #[must_use]
    pub fn weights(&self) -> EvaluationWeights {
        EvaluationWeights::from_array(self.coefficients)
    }

    #[must_use]
    pub fn target(&self) -> LearningTarget {
        self.target
    }

    /// Number of positions remembered since the last learning pass.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Marks the end of a game, attaching its result to every position
    /// recorded since the previous game.
    pub fn end_game(&mut self, winner: Option<Piece>) {
        self.memory
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .end_game(winner);
    }

    /// Updates the coefficients from the remembered positions and clears
    /// the memory.
    ///
    /// In [`LearningTarget::Outcome`] mode every remembered position must
    /// have a game result; otherwise this fails with
    /// [`TrainingError::FeatureOutcomeMismatch`].
    pub fn learn(&mut self, mu: f64) -> Result<LearnReport, TrainingError> {
        let memory = mem::take(self.memory.get_mut().unwrap_or_else(PoisonError::into_inner));

        let targets: Vec<Option<f64>> = match self.target {
            LearningTarget::Bootstrap => memory
                .samples
                .iter()
                .map(|sample| memory.bootstrap_target(sample))
                .collect(),
            LearningTarget::Outcome => {
                if memory.outcomes.len() != memory.samples.len() {
                    return Err(TrainingError::FeatureOutcomeMismatch {
                        features: memory.samples.len(),
                        outcomes: memory.outcomes.len(),
                    });
                }
                memory.outcomes.iter().copied().map(Some).collect()
            }
        };

        let mut report = LearnReport::default();
        for (sample, target) in iter::zip(&memory.samples, &targets) {
            let Some(target) = *target else {
                report.skipped += 1;
                continue;
            };
            let approx = sample.features.dot(&self.coefficients);
            let step = mu * (target - approx);
            for (c, f) in iter::zip(&mut self.coefficients, sample.features.values()) {
                *c += step * f;
            }
            report.trained += 1;
        }

        let errors: Vec<f64> = iter::zip(&memory.samples, &targets)
            .filter_map(|(sample, target)| {
                target.map(|target| (target - sample.features.dot(&self.coefficients)).abs())
            })
            .collect();
        if !errors.is_empty() {
            report.mean_abs_error = Some(errors.iter().sum::<f64>() / count_as_f64(errors.len()));
        }

        tracing::debug!(
            trained = report.trained,
            skipped = report.skipped,
            error = ?report.mean_abs_error,
            "learning pass"
        );
        Ok(report)
    }
}

impl PositionEvaluator for LmsEvaluator {
    fn evaluate(&self, state: &BoardState, perspective: Piece) -> f64 {
        let features = FeatureVector::extract(state, perspective);
        let score = features.dot(&self.coefficients);
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(Sample {
                features,
                state: *state,
                perspective,
                score,
            });
        score
    }
}

#[expect(clippy::cast_precision_loss)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmsParams {
    pub population_size: usize,
    /// Search depth of the agents in training games.
    pub depth: usize,
    /// Learning rate.
    pub mu: f64,
    pub target: LearningTarget,
}

impl Default for LmsParams {
    fn default() -> Self {
        Self {
            population_size: 3,
            depth: 8,
            mu: 1e-5,
            target: LearningTarget::Bootstrap,
        }
    }
}

/// Summary of one training iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub iteration: usize,
    /// One report per evaluator, in population order.
    pub reports: Vec<LearnReport>,
    /// Evaluator with the least error in this iteration.
    pub best_index: Option<usize>,
    pub least_error: Option<f64>,
    /// Tally of the games played in this iteration.
    pub results: MatchResult,
}

/// Trains a small population of [`LmsEvaluator`]s against each other.
#[derive(Debug)]
pub struct LmsTrainer {
    params: LmsParams,
    evaluators: Vec<LmsEvaluator>,
    iteration: usize,
    best: Option<(Genome, f64)>,
}

impl LmsTrainer {
    /// Starts from random coefficients.
    pub fn random<R>(params: LmsParams, rng: &mut R) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        Self::resume(params, vec![], 0, None, rng)
    }

    /// Continues from stored coefficients, topped up with random ones.
    pub fn resume<R>(
        params: LmsParams,
        coefficients: Vec<Genome>,
        iteration: usize,
        best: Option<(Genome, f64)>,
        rng: &mut R,
    ) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let mut coefficients: Vec<_> = coefficients
            .into_iter()
            .take(params.population_size)
            .collect();
        while coefficients.len() < params.population_size {
            coefficients.push(weights::random(rng));
        }
        if coefficients.is_empty() {
            return Err(TrainingError::EmptyPopulation);
        }
        let evaluators = coefficients
            .into_iter()
            .map(|c| LmsEvaluator::with_target(c, params.target))
            .collect();
        Ok(Self {
            params,
            evaluators,
            iteration,
            best,
        })
    }

    #[must_use]
    pub fn params(&self) -> &LmsParams {
        &self.params
    }

    #[must_use]
    pub fn evaluators(&self) -> &[LmsEvaluator] {
        &self.evaluators
    }

    #[must_use]
    pub fn coefficients(&self) -> Vec<Genome> {
        self.evaluators.iter().map(|e| e.coefficients).collect()
    }

    /// Index of the next iteration.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Coefficients with the least error seen so far, and that error.
    #[must_use]
    pub fn best(&self) -> Option<(Genome, f64)> {
        self.best
    }

    /// Plays every ordered pair once (self-play included), then runs one
    /// learning pass per evaluator.
    pub fn step(&mut self) -> Result<IterationReport, TrainingError> {
        let count = self.evaluators.len();
        let mut results = MatchResult::default();
        for red in 0..count {
            for black in 0..count {
                let outcome = self_play::play_match(
                    &self.evaluators[red],
                    &self.evaluators[black],
                    self.params.depth,
                );
                results.record(outcome.winner);
                self.evaluators[red].end_game(outcome.winner);
                if black != red {
                    self.evaluators[black].end_game(outcome.winner);
                }
            }
        }

        let reports = self
            .evaluators
            .iter_mut()
            .map(|evaluator| evaluator.learn(self.params.mu))
            .collect::<Result<Vec<_>, _>>()?;

        let best = reports
            .iter()
            .enumerate()
            .filter_map(|(i, report)| report.mean_abs_error.map(|error| (i, error)))
            .reduce(|best, entry| if entry.1 < best.1 { entry } else { best });
        if let Some((index, error)) = best
            && self.best.is_none_or(|(_, least)| error < least)
        {
            self.best = Some((self.evaluators[index].coefficients, error));
        }

        let report = IterationReport {
            iteration: self.iteration,
            reports,
            best_index: best.map(|(i, _)| i),
            least_error: best.map(|(_, error)| error),
            results,
        };
        tracing::info!(
            iteration = report.iteration,
            least_error = ?report.least_error,
            best = ?self.best.map(|(c, _)| EvaluationWeights::from_array(c).to_string()),
            "iteration finished"
        );
        self.iteration += 1;
        Ok(report)
    }
}
