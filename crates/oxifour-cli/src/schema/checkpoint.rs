use chrono::{DateTime, Utc};
use oxifour_training::weights::Genome;
use serde::{Deserialize, Serialize};

/// Genetic training state, written after every generation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GaCheckpoint {
    /// Next generation to evaluate.
    pub generation: usize,
    pub population: Vec<Genome>,
    /// Champion of the last evaluated generation.
    pub best_genome: Genome,
    pub best_fitness: f64,
    pub saved_at: DateTime<Utc>,
}

/// LMS training state, written after every iteration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LmsCheckpoint {
    /// Next iteration to run.
    pub iteration: usize,
    pub coefficients: Vec<Genome>,
    pub best_coefficients: Option<Genome>,
    pub least_error: Option<f64>,
    pub saved_at: DateTime<Utc>,
}

impl LmsCheckpoint {
    pub fn best(&self) -> Option<(Genome, f64)> {
        self.best_coefficients.zip(self.least_error)
    }
}
