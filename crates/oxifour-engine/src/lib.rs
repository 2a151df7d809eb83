//! Connect-Four game engine: board state, win detection and the turn-taking
//! game runner.
//!
//! - [`core`] - [`Piece`], [`BoardState`] and the last-move [`win`] detector
//! - [`engine`] - the [`Player`] capability and [`run_game`] driver
//!
//! Board states are small `Copy` values. Search and training code copy them
//! freely; the only way to produce a new state is [`BoardState::apply`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reasons a move attempt is rejected by [`BoardState::apply`].
///
/// A rejected move never changes the state it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("{player} cannot move on {turn}'s turn")]
    WrongTurn { player: Piece, turn: Piece },
    #[display("column {column} is out of range")]
    ColumnOutOfRange { column: usize },
    #[display("column {column} is full")]
    ColumnFull { column: usize },
}
