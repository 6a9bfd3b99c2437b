pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reasons a move attempt is rejected without changing any game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("the game is already over")]
    GameOver,
    #[display("cell is already occupied")]
    Occupied,
    #[display("it is not this player's turn")]
    NotYourTurn,
    #[display("no legal move is available")]
    NoMoveAvailable,
}

/// Invalid session configuration, reported at construction or reset time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("winning length must be positive, got {_0}")]
    WinningLength(#[error(not(source))] i32),
    #[display("target score must be positive, got {_0}")]
    TargetScore(#[error(not(source))] i32),
    #[display("time limit must be a positive duration")]
    TimeLimit,
}
