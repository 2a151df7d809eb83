use std::collections::VecDeque;

use crate::core::board::BoardState;

/// Chooses moves for one side of a game.
///
/// Human input, search agents and replays all implement this one method, so
/// any of them can play Red or Black. Returning an illegal column is allowed;
/// the game runner reports it and asks again.
pub trait Player {
    fn next_move(&mut self, state: &BoardState) -> usize;
}

impl<P> Player for Box<P>
where
    P: Player + ?Sized,
{
    fn next_move(&mut self, state: &BoardState) -> usize {
        (**self).next_move(state)
    }
}

/// Replays a recorded move list.
///
/// Once the script runs out the leftmost open column is played, so a
/// truncated recording still finishes the game.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    moves: VecDeque<usize>,
}

impl ScriptedPlayer {
    #[must_use]
    pub fn new<I>(moves: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Moves not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Player for ScriptedPlayer {
    fn next_move(&mut self, state: &BoardState) -> usize {
        self.moves
            .pop_front()
            .or_else(|| state.legal_columns().first().copied())
            .unwrap_or(0)
    }
}
