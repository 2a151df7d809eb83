use serde::{Deserialize, Serialize};

/// Content of a board cell, and the color of a player.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    #[default]
    #[display("empty")]
    Empty,
    #[display("red")]
    Red,
    #[display("black")]
    Black,
}

impl Piece {
    /// Returns the opposing color. `Empty` has no opponent and maps to itself.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Piece::Empty => Piece::Empty,
            Piece::Red => Piece::Black,
            Piece::Black => Piece::Red,
        }
    }

    /// Single-character symbol used by text renderings.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::Red => 'R',
            Piece::Black => 'B',
        }
    }
}
