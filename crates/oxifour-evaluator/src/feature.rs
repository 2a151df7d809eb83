//! Board features used by the linear evaluator.
//!
//! Six features are extracted from a position, always relative to one
//! player (the *perspective*):
//!
//! | index | feature              | value                                       |
//! |-------|----------------------|---------------------------------------------|
//! | 0     | `win`                | 1 if the perspective player has won        |
//! | 1     | `lose`               | 1 if the opponent has won                   |
//! | 2     | `my_even_threats`    | own threats on rows 0, 2, 4                 |
//! | 3     | `their_even_threats` | opponent threats on rows 0, 2, 4            |
//! | 4     | `my_odd_threats`     | own threats on rows 1, 3, 5                 |
//! | 5     | `their_odd_threats`  | opponent threats on rows 1, 3, 5            |
//!
//! # Threats
//!
//! A threat is an empty cell that would complete a diagonal four for a
//! player: looking past the cell along one of the four diagonal directions,
//! the next three cells all hold that player's pieces. A cell can carry
//! several threats at once, which is how double threats show up in the
//! score. Row parity matters because in Connect-Four the first player
//! usually profits from threats on one parity and the second player from the
//! other; the evaluator learns how much each is worth.

use std::iter;

use oxifour_engine::{BoardState, COLUMNS, Piece, ROWS, WIN_LENGTH};
use serde::{Deserialize, Serialize};

/// Number of features (and of evaluation weights).
pub const FEATURE_COUNT: usize = 6;

/// Directions looked along from a candidate cell when counting threats.
pub const THREAT_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Identifies one entry of a [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Win,
    Lose,
    MyEvenThreats,
    TheirEvenThreats,
    MyOddThreats,
    TheirOddThreats,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Win,
        Feature::Lose,
        Feature::MyEvenThreats,
        Feature::TheirEvenThreats,
        Feature::MyOddThreats,
        Feature::TheirOddThreats,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Feature::Win => "win",
            Feature::Lose => "lose",
            Feature::MyEvenThreats => "my_even_threats",
            Feature::TheirEvenThreats => "their_even_threats",
            Feature::MyOddThreats => "my_odd_threats",
            Feature::TheirOddThreats => "their_odd_threats",
        }
    }
}

/// Counts the threats `piece` would have at the empty cell `(column, row)`.
///
/// Returns 0 for an occupied cell. Otherwise returns how many of the four
/// [`THREAT_DIRECTIONS`] have `WIN_LENGTH - 1` consecutive `piece`s right
/// past the cell. The cell does not need to be playable yet.
#[must_use]
#[expect(clippy::cast_possible_wrap)]
pub fn threats(state: &BoardState, piece: Piece, column: isize, row: isize) -> u32 {
    if piece.is_empty() || !state.piece_at(column, row).is_empty() {
        return 0;
    }
    let reach = WIN_LENGTH as isize;
    THREAT_DIRECTIONS
        .into_iter()
        .filter(|(dc, dr)| {
            (1..reach).all(|step| state.piece_at(column + dc * step, row + dr * step) == piece)
        })
        .map(|_| 1)
        .sum()
}

/// Feature values of one position from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Extracts the features of `state` as seen by `perspective`.
    #[must_use]
    pub fn extract(state: &BoardState, perspective: Piece) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        let opponent = perspective.other();

        let winner = state.winner();
        if !winner.is_empty() {
            if winner == perspective {
                values[Feature::Win.index()] = 1.0;
            } else {
                values[Feature::Lose.index()] = 1.0;
            }
        }

        for (column, row) in cells() {
            let (mine, theirs) = if row % 2 == 0 {
                (Feature::MyEvenThreats, Feature::TheirEvenThreats)
            } else {
                (Feature::MyOddThreats, Feature::TheirOddThreats)
            };
            values[mine.index()] += f64::from(threats(state, perspective, column, row));
            values[theirs.index()] += f64::from(threats(state, opponent, column, row));
        }

        Self(values)
    }

    #[must_use]
    pub const fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Weighted sum of the features.
    #[must_use]
    pub fn dot(&self, coefficients: &[f64; FEATURE_COUNT]) -> f64 {
        iter::zip(&self.0, coefficients).map(|(f, w)| f * w).sum()
    }
}

#[expect(clippy::cast_possible_wrap)]
fn cells() -> impl Iterator<Item = (isize, isize)> {
    (0..ROWS as isize).flat_map(|row| (0..COLUMNS as isize).map(move |column| (column, row)))
}
