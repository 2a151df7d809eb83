use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{MoveError, core::piece::Piece, core::win};

/// Number of columns on the board.
pub const COLUMNS: usize = 7;
/// Number of rows on the board.
pub const ROWS: usize = 6;
/// Number of pieces in a line needed to win.
pub const WIN_LENGTH: usize = 4;

/// Board contents indexed as `cells[column][row]`, row 0 at the bottom.
pub type Cells = [[Piece; ROWS]; COLUMNS];

/// A Connect-Four position.
///
/// Holds the grid, the fill height of every column, whose turn it is and the
/// column that was played last (win detection only looks at lines through
/// the last placed piece).
///
/// `cells[c][r] != Empty` holds exactly when `r < column_height[c]`, and
/// `turn` flips on every accepted move. States are only produced by
/// [`BoardState::apply`] starting from [`BoardState::INITIAL`], so both
/// invariants hold for every value observed outside this module.
///
/// # Example
///
/// ```
/// use oxifour_engine::{BoardState, Piece};
///
/// let state = BoardState::new();
/// let state = state.apply(Piece::Red, 3).unwrap();
///
/// assert_eq!(state.piece_at(3, 0), Piece::Red);
/// assert_eq!(state.turn(), Piece::Black);
/// assert!(state.apply(Piece::Red, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    cells: Cells,
    column_height: [usize; COLUMNS],
    turn: Piece,
    last_move: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// The empty board with Red to move.
    pub const INITIAL: Self = Self {
        cells: [[Piece::Empty; ROWS]; COLUMNS],
        column_height: [0; COLUMNS],
        turn: Piece::Red,
        last_move: 0,
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::INITIAL
    }

    /// Replays `moves` from the empty board, each played by whoever is to move.
    pub fn from_moves(moves: &[usize]) -> Result<Self, MoveError> {
        let mut state = Self::new();
        for &column in moves {
            state.apply_mut(state.turn, column)?;
        }
        Ok(state)
    }

    #[must_use]
    pub const fn cells(&self) -> &Cells {
        &self.cells
    }

    #[must_use]
    pub const fn turn(&self) -> Piece {
        self.turn
    }

    #[must_use]
    pub const fn last_move(&self) -> usize {
        self.last_move
    }

    /// Number of pieces in `column`, or 0 for a column outside the board.
    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        self.column_height.get(column).copied().unwrap_or(0)
    }

    /// Total number of pieces on the board.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.column_height.iter().sum()
    }

    /// Returns the piece at `(column, row)`.
    ///
    /// Coordinates outside the board read as [`Piece::Empty`], which lets line
    /// scans walk past the edges without bounds checks.
    #[must_use]
    pub fn piece_at(&self, column: isize, row: isize) -> Piece {
        let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
            return Piece::Empty;
        };
        self.cells
            .get(column)
            .and_then(|col| col.get(row))
            .copied()
            .unwrap_or(Piece::Empty)
    }

    #[must_use]
    pub fn is_column_full(&self, column: usize) -> bool {
        self.column_height
            .get(column)
            .is_none_or(|&height| height >= ROWS)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.column_height.iter().all(|&height| height >= ROWS)
    }

    /// Columns that still accept a piece, in ascending order.
    #[must_use]
    pub fn legal_columns(&self) -> ArrayVec<usize, COLUMNS> {
        (0..COLUMNS)
            .filter(|&column| !self.is_column_full(column))
            .collect()
    }

    /// Every state reachable by one move of the player to move, paired with
    /// the column played.
    pub fn successors(&self) -> impl Iterator<Item = (usize, BoardState)> + '_ {
        (0..COLUMNS).filter_map(|column| {
            self.apply(self.turn, column)
                .ok()
                .map(|state| (column, state))
        })
    }

    /// Checks whether `player` may drop a piece into `column`.
    pub fn check_move(&self, player: Piece, column: usize) -> Result<(), MoveError> {
        if player != self.turn || player.is_empty() {
            return Err(MoveError::WrongTurn {
                player,
                turn: self.turn,
            });
        }
        if column >= COLUMNS {
            return Err(MoveError::ColumnOutOfRange { column });
        }
        if self.column_height[column] >= ROWS {
            return Err(MoveError::ColumnFull { column });
        }
        Ok(())
    }

    /// Returns the state after `player` drops a piece into `column`.
    pub fn apply(&self, player: Piece, column: usize) -> Result<Self, MoveError> {
        let mut next = *self;
        next.apply_mut(player, column)?;
        Ok(next)
    }

    /// Drops a piece in place. On error `self` is left untouched.
    pub fn apply_mut(&mut self, player: Piece, column: usize) -> Result<(), MoveError> {
        self.check_move(player, column)?;
        let row = self.column_height[column];
        self.cells[column][row] = player;
        self.column_height[column] += 1;
        self.turn = self.turn.other();
        self.last_move = column;
        Ok(())
    }

    /// The owner of a four-in-a-row through the last placed piece, or
    /// [`Piece::Empty`].
    #[must_use]
    pub fn winner(&self) -> Piece {
        win::winner(self)
    }

    /// True when someone has won or the board is full.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.winner().is_empty() || self.is_full()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for column in 0..COLUMNS {
                write!(f, "{}", self.cells[column][row].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the board completely without anyone connecting four.
    const DRAW_MOVES: [usize; 42] = [
        0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 6, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4,
        4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6,
    ];

    fn assert_invariants(state: &BoardState, moves: &[usize]) {
        for column in 0..COLUMNS {
            let played = moves.iter().filter(|&&c| c == column).count();
            assert_eq!(state.column_height(column), played);
            for row in 0..ROWS {
                let occupied = !state.cells()[column][row].is_empty();
                assert_eq!(occupied, row < played, "column {column}, row {row}");
            }
        }
    }

    #[test]
    fn test_initial_board() {
        let state = BoardState::new();
        assert_eq!(state.turn(), Piece::Red);
        assert_eq!(state.last_move(), 0);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.winner(), Piece::Empty);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_columns().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_apply_places_piece_and_flips_turn() {
        let state = BoardState::new().apply(Piece::Red, 3).unwrap();
        assert_eq!(state.piece_at(3, 0), Piece::Red);
        assert_eq!(state.column_height(3), 1);
        assert_eq!(state.turn(), Piece::Black);
        assert_eq!(state.last_move(), 3);

        let state = state.apply(Piece::Black, 3).unwrap();
        assert_eq!(state.piece_at(3, 1), Piece::Black);
        assert_eq!(state.column_height(3), 2);
        assert_eq!(state.turn(), Piece::Red);
    }

    #[test]
    fn test_column_heights_follow_moves() {
        let moves = [3, 3, 2, 4, 4, 0, 6, 6, 6, 1, 3, 5, 5, 2];
        let mut state = BoardState::new();
        for (i, &column) in moves.iter().enumerate() {
            state.apply_mut(state.turn(), column).unwrap();
            assert_invariants(&state, &moves[..=i]);
        }
    }

    #[test]
    fn test_wrong_turn_is_rejected() {
        let state = BoardState::new();
        assert_eq!(
            state.apply(Piece::Black, 0),
            Err(MoveError::WrongTurn {
                player: Piece::Black,
                turn: Piece::Red
            })
        );
        assert!(matches!(
            state.apply(Piece::Empty, 0),
            Err(MoveError::WrongTurn { .. })
        ));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut state = BoardState::new();
        let before = state;
        assert_eq!(
            state.apply_mut(Piece::Red, COLUMNS),
            Err(MoveError::ColumnOutOfRange { column: COLUMNS })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_full_column_is_rejected_without_mutation() {
        let mut state = BoardState::from_moves(&[0, 0, 0, 0, 0, 0]).unwrap();
        assert!(state.is_column_full(0));
        let before = state;
        assert_eq!(
            state.apply_mut(Piece::Red, 0),
            Err(MoveError::ColumnFull { column: 0 })
        );
        assert_eq!(state, before);
        assert_eq!(state.column_height(0), ROWS);
        assert_eq!(state.turn(), Piece::Red);
        assert!(!state.legal_columns().contains(&0));
    }

    #[test]
    fn test_piece_at_out_of_bounds() {
        let state = BoardState::from_moves(&[0, 6]).unwrap();
        assert_eq!(state.piece_at(-1, 0), Piece::Empty);
        assert_eq!(state.piece_at(0, -1), Piece::Empty);
        assert_eq!(state.piece_at(7, 0), Piece::Empty);
        assert_eq!(state.piece_at(6, 6), Piece::Empty);
        assert_eq!(state.piece_at(6, 0), Piece::Black);
    }

    #[test]
    fn test_vertical_win_scenario() {
        let mut state = BoardState::new();
        for (red, black) in [(3, 0), (3, 0), (3, 1)] {
            state.apply_mut(Piece::Red, red).unwrap();
            state.apply_mut(Piece::Black, black).unwrap();
            assert_eq!(state.winner(), Piece::Empty);
            assert!(!state.is_terminal());
        }
        state.apply_mut(Piece::Red, 3).unwrap();
        assert_eq!(state.winner(), Piece::Red);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_full_board_draw_scenario() {
        let mut state = BoardState::new();
        for (i, &column) in DRAW_MOVES.iter().enumerate() {
            assert!(!state.is_terminal(), "terminal before move {i}");
            state.apply_mut(state.turn(), column).unwrap();
            assert_eq!(state.winner(), Piece::Empty, "winner after move {i}");
        }
        assert!(state.is_full());
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Piece::Empty);
        assert!(state.legal_columns().is_empty());
        assert_eq!(state.successors().count(), 0);
        assert_invariants(&state, &DRAW_MOVES);
    }

    #[test]
    fn test_successors() {
        let state = BoardState::from_moves(&[0, 0, 0, 0, 0, 0, 1]).unwrap();
        let successors = state.successors().collect::<Vec<_>>();
        assert_eq!(successors.len(), COLUMNS - 1);
        for (column, next) in successors {
            assert_ne!(column, 0);
            assert_eq!(next.last_move(), column);
            assert_eq!(next.move_count(), state.move_count() + 1);
            assert_eq!(next.turn(), state.turn().other());
        }
    }

    #[test]
    fn test_display() {
        let state = BoardState::from_moves(&[3, 3, 4]).unwrap();
        let expected = "\
.......
.......
.......
.......
...B...
...RR..
";
        assert_eq!(state.to_string(), expected);
    }

    #[test]
    fn test_serialization_round_trip() {
        let state = BoardState::from_moves(&[3, 2, 3, 2]).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
