//! Evaluator-versus-evaluator games.

use oxifour_engine::{GameOutcome, Piece, run_game_silent};
use oxifour_evaluator::{evaluator::PositionEvaluator, search::SearchAgent};

/// Win/draw tally over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub red_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
}

impl MatchResult {
    pub fn record(&mut self, winner: Option<Piece>) {
        match winner {
            Some(Piece::Red) => self.red_wins += 1,
            Some(Piece::Black) => self.black_wins += 1,
            Some(Piece::Empty) | None => self.draws += 1,
        }
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.red_wins + self.black_wins + self.draws
    }
}

/// Plays one game between two search agents of the given depth.
pub fn play_match<R, B>(red: &R, black: &B, depth: usize) -> GameOutcome
where
    R: PositionEvaluator + ?Sized,
    B: PositionEvaluator + ?Sized,
{
    let mut red_agent = SearchAgent::new(Piece::Red, depth, Box::new(red));
    let mut black_agent = SearchAgent::new(Piece::Black, depth, Box::new(black));
    let outcome = run_game_silent(&mut red_agent, &mut black_agent);
    tracing::debug!(
        winner = ?outcome.winner,
        moves = outcome.moves.len(),
        "game finished"
    );
    outcome
}

/// Reward of a finished game for `perspective`: 1 for a win, -1 for a loss
/// and 0 for a draw.
#[must_use]
pub fn outcome_reward(winner: Option<Piece>, perspective: Piece) -> f64 {
    match winner {
        Some(piece) if piece == perspective => 1.0,
        Some(piece) if piece == perspective.other() => -1.0,
        _ => 0.0,
    }
}
