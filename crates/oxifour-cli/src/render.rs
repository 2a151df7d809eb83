use std::fmt::Write as _;

use oxifour_engine::{BoardState, COLUMNS, Piece};

/// Draws the board with column numbers underneath and whose turn it is.
pub fn render_board(state: &BoardState) -> String {
    let mut out = state.to_string();
    for column in 0..COLUMNS {
        let _ = write!(out, "{column}");
    }
    out.push_str("\n\n");
    if !state.is_terminal() {
        let _ = writeln!(out, "It is {}'s turn.", state.turn());
    }
    out
}

pub fn render_result(winner: Option<Piece>) -> &'static str {
    match winner {
        Some(Piece::Red) => "Red wins!",
        Some(Piece::Black) => "Black wins!",
        Some(Piece::Empty) | None => "It's a tie.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board() {
        let state = BoardState::from_moves(&[3, 3, 2]).unwrap();
        let expected = "\
.......
.......
.......
.......
...B...
..RR...
0123456

It is black's turn.
";
        assert_eq!(render_board(&state), expected);
    }

    #[test]
    fn test_render_result() {
        assert_eq!(render_result(Some(Piece::Red)), "Red wins!");
        assert_eq!(render_result(Some(Piece::Black)), "Black wins!");
        assert_eq!(render_result(None), "It's a tie.");
    }
}
