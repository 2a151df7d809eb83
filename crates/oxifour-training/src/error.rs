/// Errors that abort a training run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("{features} recorded positions but {outcomes} game outcomes")]
    FeatureOutcomeMismatch { features: usize, outcomes: usize },
    #[display("population is empty")]
    EmptyPopulation,
    #[display("invalid mutation sigma: {sigma}")]
    InvalidMutationSigma { sigma: f64 },
}
