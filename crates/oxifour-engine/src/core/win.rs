//! Last-move win detection.
//!
//! Any four-in-a-row must contain the piece that was placed last, so only
//! the four lines through that cell are examined. Each line is scanned over
//! a window of `2 * WIN_LENGTH - 1` cells centered on the last piece, which
//! makes the check constant-time regardless of how full the board is.

use crate::core::{
    board::{BoardState, WIN_LENGTH},
    piece::Piece,
};

/// Column/row steps of the four line directions: vertical, horizontal and
/// both diagonals.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Returns the owner of a four-in-a-row through the last placed piece, or
/// [`Piece::Empty`] when there is none (including on the empty board).
#[must_use]
pub fn winner(state: &BoardState) -> Piece {
    let column = state.last_move();
    let height = state.column_height(column);
    let (Ok(column), Ok(row)) = (isize::try_from(column), isize::try_from(height)) else {
        return Piece::Empty;
    };
    let row = row - 1;
    if state.piece_at(column, row).is_empty() {
        return Piece::Empty;
    }

    DIRECTIONS
        .into_iter()
        .map(|direction| scan_line(state, column, row, direction))
        .find(|piece| !piece.is_empty())
        .unwrap_or(Piece::Empty)
}

#[expect(clippy::cast_possible_wrap)]
fn scan_line(
    state: &BoardState,
    column: isize,
    row: isize,
    (dc, dr): (isize, isize),
) -> Piece {
    let reach = WIN_LENGTH as isize - 1;
    let mut counter = RunCounter::default();
    for step in -reach..=reach {
        let piece = state.piece_at(column + dc * step, row + dr * step);
        if counter.push(piece) {
            return piece;
        }
    }
    Piece::Empty
}

/// Length of the current run of identical non-empty pieces.
#[derive(Debug, Default)]
struct RunCounter {
    piece: Piece,
    count: usize,
}

impl RunCounter {
    /// Feeds the next cell of a line; returns `true` once the run reaches
    /// [`WIN_LENGTH`].
    fn push(&mut self, piece: Piece) -> bool {
        if piece.is_empty() {
            *self = Self::default();
            return false;
        }
        if piece == self.piece {
            self.count += 1;
        } else {
            self.piece = piece;
            self.count = 1;
        }
        self.count >= WIN_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use crate::core::board::COLUMNS;

    use super::*;

    fn play(moves: &[usize]) -> BoardState {
        BoardState::from_moves(moves).unwrap()
    }

    fn mirror(moves: &[usize]) -> Vec<usize> {
        moves.iter().map(|&column| COLUMNS - 1 - column).collect()
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        assert_eq!(winner(&BoardState::new()), Piece::Empty);
    }

    #[test]
    fn test_vertical() {
        let state = play(&[2, 3, 2, 3, 2, 3, 2]);
        assert_eq!(winner(&state), Piece::Red);
    }

    #[test]
    fn test_horizontal_completed_in_the_middle() {
        // Red: 0, 1, 3 then 2 fills the gap.
        let state = play(&[0, 0, 1, 1, 3, 3, 2]);
        assert_eq!(winner(&state), Piece::Red);
    }

    #[test]
    fn test_rising_diagonal() {
        // Red ends on (3, 3) completing (0,0) (1,1) (2,2) (3,3).
        let moves = [0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3];
        let state = play(&moves);
        assert_eq!(state.piece_at(3, 3), Piece::Red);
        assert_eq!(winner(&state), Piece::Red);
    }

    #[test]
    fn test_falling_diagonal() {
        let moves = [6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3];
        let state = play(&moves);
        assert_eq!(winner(&state), Piece::Red);
    }

    #[test]
    fn test_black_can_win() {
        let state = play(&[0, 3, 1, 3, 0, 3, 1, 3]);
        assert_eq!(winner(&state), Piece::Black);
    }

    #[test]
    fn test_three_is_not_enough() {
        let state = play(&[0, 0, 1, 1, 2]);
        assert_eq!(winner(&state), Piece::Empty);
        let state = play(&[4, 5, 4, 5, 4]);
        assert_eq!(winner(&state), Piece::Empty);
    }

    #[test]
    fn test_broken_line_is_not_a_win() {
        // R R B R R on the bottom row.
        let state = play(&[0, 2, 1, 6, 3, 6, 4]);
        assert_eq!(state.piece_at(2, 0), Piece::Black);
        assert_eq!(winner(&state), Piece::Empty);
    }

    #[test]
    fn test_symmetric_under_reflection() {
        let games: [&[usize]; 5] = [
            &[2, 3, 2, 3, 2, 3, 2],
            &[0, 0, 1, 1, 3, 3, 2],
            &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3],
            &[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3],
            &[0, 0, 1, 1, 2],
        ];
        for moves in games {
            let state = play(moves);
            let mirrored = play(&mirror(moves));
            assert_eq!(winner(&state), winner(&mirrored), "{moves:?}");
        }
    }

    #[test]
    fn test_only_lines_through_last_move_count() {
        // Red connects four, then Black moves elsewhere: the win is no longer
        // reported because the last piece is not on the line.
        let state = play(&[2, 3, 2, 3, 2, 3, 2]);
        assert_eq!(winner(&state), Piece::Red);
        let state = state.apply(Piece::Black, 6).unwrap();
        assert_eq!(winner(&state), Piece::Empty);
    }
}
