pub use self::{bot::*, bot_match::*};

mod bot;
mod bot_match;
mod heuristics;

/// Strength tier of the computer opponent.
///
/// The tier sets the minimax depth and the number of ordered candidates
/// explored per node; the candidate search radius is the same everywhere.
/// Easy additionally plays a random candidate 40% of the time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Fixed minimax lookahead depth.
    #[must_use]
    pub const fn search_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// How many of the best-ordered candidates each node expands.
    #[must_use]
    pub const fn move_cap(self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }
}
