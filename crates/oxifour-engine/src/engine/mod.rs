//! Turn-taking game driver.
//!
//! - [`Player`] - anything that can pick a column for a position
//! - [`ScriptedPlayer`] - replays a fixed list of moves
//! - [`run_game`] - plays one game between two players, reporting progress
//!   through [`GameHooks`]
//!
//! # Example
//!
//! ```
//! use oxifour_engine::{GameHooks, Piece, ScriptedPlayer, run_game};
//!
//! let mut red = ScriptedPlayer::new([3, 3, 3, 3]);
//! let mut black = ScriptedPlayer::new([0, 1, 0]);
//! let outcome = run_game(&mut red, &mut black, &mut GameHooks::default());
//!
//! assert_eq!(outcome.winner, Some(Piece::Red));
//! assert_eq!(outcome.moves, vec![3, 0, 3, 1, 3, 0, 3]);
//! ```

pub use self::{game_runner::*, player::*};

mod game_runner;
mod player;
