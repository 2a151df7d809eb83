use std::path::{Path, PathBuf};

use chrono::Utc;
use oxifour_evaluator::EvaluationWeights;
use oxifour_training::lms::{LearningTarget, LmsParams, LmsTrainer};

use crate::{
    schema::{checkpoint::LmsCheckpoint, model::EvaluatorModel},
    util,
};

const DEFAULT_ITERATIONS: usize = 100;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum Target {
    #[default]
    Bootstrap,
    Outcome,
}

impl From<Target> for LearningTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Bootstrap => LearningTarget::Bootstrap,
            Target::Outcome => LearningTarget::Outcome,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainLmsArg {
    /// Checkpoint file to resume from and save to after every iteration
    #[arg(long)]
    state: Option<PathBuf>,
    /// Number of iterations to run
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    /// Number of learning evaluators
    #[arg(long, default_value_t = LmsParams::default().population_size)]
    population: usize,
    /// Search depth of the agents in training games
    #[arg(long, default_value_t = LmsParams::default().depth)]
    depth: usize,
    /// Learning rate
    #[arg(long, default_value_t = LmsParams::default().mu)]
    mu: f64,
    /// What positions are regressed toward (bootstrap or outcome)
    #[arg(long, default_value = "bootstrap")]
    target: Target,
    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainLmsArg) -> anyhow::Result<()> {
    let TrainLmsArg {
        state,
        iterations,
        population,
        depth,
        mu,
        target,
        seed,
        output,
    } = arg;
    let params = LmsParams {
        population_size: *population,
        depth: *depth,
        mu: *mu,
        target: (*target).into(),
    };
    let mut rng = super::training_rng(*seed);

    let checkpoint = state
        .as_ref()
        .and_then(|path| util::load_checkpoint::<LmsCheckpoint, _>("LMS checkpoint", path));
    let mut trainer = match checkpoint {
        Some(checkpoint) => {
            tracing::info!(
                iteration = checkpoint.iteration,
                evaluators = checkpoint.coefficients.len(),
                "resuming LMS training"
            );
            let best = checkpoint.best();
            LmsTrainer::resume(
                params,
                checkpoint.coefficients,
                checkpoint.iteration,
                best,
                &mut rng,
            )?
        }
        None => LmsTrainer::random(params, &mut rng)?,
    };

    for _ in 0..*iterations {
        trainer.step()?;
        if let Some(path) = state {
            save_checkpoint(&trainer, path)?;
        }
    }

    let Some((coefficients, least_error)) = trainer.best() else {
        tracing::warn!("no coefficients were trained, nothing to save");
        return Ok(());
    };
    let model = EvaluatorModel {
        name: format!("lms-iteration-{}", trainer.iteration()),
        trained_at: Utc::now(),
        weights: EvaluationWeights::from_array(coefficients),
    };
    util::save_model(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Least error: {least_error:.6}");
    eprintln!("  Weights: {}", model.weights);

    Ok(())
}

fn save_checkpoint(trainer: &LmsTrainer, path: &Path) -> anyhow::Result<()> {
    let best = trainer.best();
    let checkpoint = LmsCheckpoint {
        iteration: trainer.iteration(),
        coefficients: trainer.coefficients(),
        best_coefficients: best.map(|(coefficients, _)| coefficients),
        least_error: best.map(|(_, error)| error),
        saved_at: Utc::now(),
    };
    util::save_checkpoint("LMS checkpoint", &checkpoint, path)
}
