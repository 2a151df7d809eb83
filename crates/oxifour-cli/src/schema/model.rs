use chrono::{DateTime, Utc};
use oxifour_evaluator::EvaluationWeights;
use serde::{Deserialize, Serialize};

/// Trained weights used by `play` and `auto-play`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaluatorModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub weights: EvaluationWeights,
}

impl EvaluatorModel {
    pub const BASELINE_NAME: &'static str = "baseline";

    /// The built-in weights.
    pub fn baseline() -> Self {
        Self {
            name: Self::BASELINE_NAME.to_owned(),
            trained_at: DateTime::UNIX_EPOCH,
            weights: EvaluationWeights::BASELINE,
        }
    }
}
