use serde::{Deserialize, Serialize};

use crate::{
    MoveError,
    core::{board::BoardState, piece::Piece},
};

use super::player::Player;

/// Observer callbacks invoked while a game is played.
///
/// - `on_state` sees the initial board and then every accepted move,
///   including the final one
/// - `on_error` sees every rejected move attempt
/// - `on_end` is called exactly once with the winner (`None` for a draw)
pub struct GameHooks<'a> {
    on_state: Box<dyn FnMut(&BoardState) + 'a>,
    on_error: Box<dyn FnMut(&MoveError) + 'a>,
    on_end: Box<dyn FnMut(Option<Piece>) + 'a>,
}

impl Default for GameHooks<'_> {
    fn default() -> Self {
        Self {
            on_state: Box::new(|_| {}),
            on_error: Box::new(|_| {}),
            on_end: Box::new(|_| {}),
        }
    }
}

impl<'a> GameHooks<'a> {
    #[must_use]
    pub fn on_state<F>(mut self, f: F) -> Self
    where
        F: FnMut(&BoardState) + 'a,
    {
        self.on_state = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(&MoveError) + 'a,
    {
        self.on_error = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_end<F>(mut self, f: F) -> Self
    where
        F: FnMut(Option<Piece>) + 'a,
    {
        self.on_end = Box::new(f);
        self
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// The winning color, `None` for a draw.
    pub winner: Option<Piece>,
    pub final_state: BoardState,
    /// Accepted moves in play order.
    pub moves: Vec<usize>,
}

/// Plays one game from the empty board until it ends.
///
/// A rejected move does not advance the turn: the error is logged, passed to
/// the error hook and the same player is asked again.
pub fn run_game<R, B>(red: &mut R, black: &mut B, hooks: &mut GameHooks<'_>) -> GameOutcome
where
    R: Player + ?Sized,
    B: Player + ?Sized,
{
    let mut state = BoardState::new();
    let mut moves = vec![];
    (hooks.on_state)(&state);

    while !state.is_terminal() {
        let color = state.turn();
        let column = match color {
            Piece::Red => red.next_move(&state),
            Piece::Black | Piece::Empty => black.next_move(&state),
        };
        match state.apply_mut(color, column) {
            Ok(()) => {
                moves.push(column);
                (hooks.on_state)(&state);
            }
            Err(err) => {
                tracing::warn!(%color, column, "move rejected: {err}");
                (hooks.on_error)(&err);
            }
        }
    }

    let winner = Some(state.winner()).filter(|piece| !piece.is_empty());
    (hooks.on_end)(winner);
    GameOutcome {
        winner,
        final_state: state,
        moves,
    }
}

/// Plays one game without any hooks.
pub fn run_game_silent<R, B>(red: &mut R, black: &mut B) -> GameOutcome
where
    R: Player + ?Sized,
    B: Player + ?Sized,
{
    run_game(red, black, &mut GameHooks::default())
}
