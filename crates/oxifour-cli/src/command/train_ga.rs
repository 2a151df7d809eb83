use std::path::{Path, PathBuf};

use chrono::Utc;
use oxifour_evaluator::EvaluationWeights;
use oxifour_training::genetic::{GenerationReport, GeneticParams, GeneticTrainer};

use crate::{
    schema::{checkpoint::GaCheckpoint, model::EvaluatorModel},
    util,
};

const DEFAULT_GENERATIONS: usize = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainGaArg {
    /// Checkpoint file to resume from and save to after every generation
    #[arg(long)]
    state: Option<PathBuf>,
    /// Number of generations to run
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Number of individuals
    #[arg(long, default_value_t = GeneticParams::default().population_size)]
    population: usize,
    /// Tournament rounds per generation
    #[arg(long, default_value_t = GeneticParams::default().rounds)]
    rounds: usize,
    /// Search depth of the agents in tournament games
    #[arg(long, default_value_t = GeneticParams::default().depth)]
    depth: usize,
    /// Standard deviation of the Gaussian mutation
    #[arg(long, default_value_t = GeneticParams::default().mutation_sigma)]
    sigma: f64,
    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainGaArg) -> anyhow::Result<()> {
    let TrainGaArg {
        state,
        generations,
        population,
        rounds,
        depth,
        sigma,
        seed,
        output,
    } = arg;
    let params = GeneticParams {
        population_size: *population,
        rounds: *rounds,
        depth: *depth,
        mutation_sigma: *sigma,
    };
    let mut rng = super::training_rng(*seed);

    let checkpoint = state
        .as_ref()
        .and_then(|path| util::load_checkpoint::<GaCheckpoint, _>("GA checkpoint", path));
    let mut trainer = match checkpoint {
        Some(checkpoint) => {
            tracing::info!(
                generation = checkpoint.generation,
                individuals = checkpoint.population.len(),
                "resuming genetic training"
            );
            GeneticTrainer::resume(
                params,
                checkpoint.population,
                checkpoint.generation,
                &mut rng,
            )?
        }
        None => GeneticTrainer::random(params, &mut rng)?,
    };

    let mut last_report = None;
    for _ in 0..*generations {
        let report = trainer.step(&mut rng)?;
        if let Some(path) = state {
            save_checkpoint(&trainer, &report, path)?;
        }
        last_report = Some(report);
    }

    let Some(report) = last_report else {
        tracing::warn!("no generation was run, nothing to save");
        return Ok(());
    };
    let model = EvaluatorModel {
        name: format!("ga-generation-{}", report.generation),
        trained_at: Utc::now(),
        weights: EvaluationWeights::from_array(report.best_genome),
    };
    util::save_model(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Best fitness: {:.3}", report.best_fitness);
    eprintln!("  Weights: {}", model.weights);

    Ok(())
}

fn save_checkpoint(
    trainer: &GeneticTrainer,
    report: &GenerationReport,
    path: &Path,
) -> anyhow::Result<()> {
    let checkpoint = GaCheckpoint {
        generation: trainer.generation(),
        population: trainer.population().genomes(),
        best_genome: report.best_genome,
        best_fitness: report.best_fitness,
        saved_at: Utc::now(),
    };
    util::save_checkpoint("GA checkpoint", &checkpoint, path)
}
