use clap::{Parser, Subcommand};

use self::{
    play::{AutoPlayArg, PlayArg},
    train_ga::TrainGaArg,
    train_lms::TrainLmsArg,
};

mod play;
mod train_ga;
mod train_lms;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play against the search agent in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Watch two search agents play each other
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Train evaluation weights with the genetic algorithm
    TrainGa(#[clap(flatten)] TrainGaArg),
    /// Train evaluation weights with LMS self-play learning
    TrainLms(#[clap(flatten)] TrainLmsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run_manual(&arg)?,
        Mode::AutoPlay(arg) => play::run_auto(&arg)?,
        Mode::TrainGa(arg) => train_ga::run(&arg)?,
        Mode::TrainLms(arg) => train_lms::run(&arg)?,
    }
    Ok(())
}

/// Seeds the training RNG from `--seed`, or from the thread RNG.
fn training_rng(seed: Option<u64>) -> rand_pcg::Pcg64Mcg {
    use rand::SeedableRng as _;

    match seed {
        Some(seed) => rand_pcg::Pcg64Mcg::seed_from_u64(seed),
        None => rand_pcg::Pcg64Mcg::from_rng(&mut rand::rng()),
    }
}
