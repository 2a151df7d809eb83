use std::path::PathBuf;

use oxifour_engine::{GameHooks, Piece, Player, run_game};
use oxifour_evaluator::{evaluator::LinearEvaluator, search::SearchAgent};

use crate::{
    human::HumanPrompt,
    render::{render_board, render_result},
    util,
};

const DEFAULT_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum Color {
    Red,
    Black,
}

impl From<Color> for Piece {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => Piece::Red,
            Color::Black => Piece::Black,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Path to the evaluator model file (JSON format); built-in weights if omitted
    #[clap(long)]
    model: Option<PathBuf>,
    /// Search depth of the computer player
    #[clap(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,
    /// Color played by the human (red moves first)
    #[clap(long, default_value = "red")]
    human_color: Color,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            model: None,
            depth: DEFAULT_DEPTH,
            human_color: Color::Red,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Model file for Red; built-in weights if omitted
    #[clap(long)]
    red: Option<PathBuf>,
    /// Model file for Black; built-in weights if omitted
    #[clap(long)]
    black: Option<PathBuf>,
    /// Search depth of both players
    #[clap(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,
}

pub(crate) fn run_manual(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        model,
        depth,
        human_color,
    } = arg;

    let model = util::read_model_file(model.as_ref())?;
    tracing::info!(model = %model.name, depth, "loaded evaluator model");
    let computer_color = Piece::from(*human_color).other();
    let mut computer = SearchAgent::new(
        computer_color,
        *depth,
        Box::new(LinearEvaluator::new(model.weights)),
    );
    let mut human = HumanPrompt::stdio();

    let (red, black): (&mut dyn Player, &mut dyn Player) = match human_color {
        Color::Red => (&mut human, &mut computer),
        Color::Black => (&mut computer, &mut human),
    };
    run_game(red, black, &mut console_hooks());
    Ok(())
}

pub(crate) fn run_auto(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg { red, black, depth } = arg;

    let red_model = util::read_model_file(red.as_ref())?;
    let black_model = util::read_model_file(black.as_ref())?;
    tracing::info!(
        red = %red_model.name,
        black = %black_model.name,
        depth,
        "starting auto play"
    );
    let mut red = SearchAgent::new(
        Piece::Red,
        *depth,
        Box::new(LinearEvaluator::new(red_model.weights)),
    );
    let mut black = SearchAgent::new(
        Piece::Black,
        *depth,
        Box::new(LinearEvaluator::new(black_model.weights)),
    );
    let outcome = run_game(&mut red, &mut black, &mut console_hooks());
    tracing::info!(moves = ?outcome.moves, "game over");
    Ok(())
}

fn console_hooks() -> GameHooks<'static> {
    GameHooks::default()
        .on_state(|state| print!("{}", render_board(state)))
        .on_error(|err| println!("{err}"))
        .on_end(|winner| println!("{}", render_result(winner)))
}
