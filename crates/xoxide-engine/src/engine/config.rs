use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Rule variant a session is played under.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum GameMode {
    /// First completed line wins.
    #[default]
    Classic,
    /// Classic plus a per-player move clock; an exhausted clock loses.
    Timed,
    /// No line win; first player to reach the target score wins.
    Scoring,
    /// Scoring plus a random per-turn modifier.
    RandomEvents,
}

impl GameMode {
    /// True for the modes decided by score rather than by a completed line.
    #[must_use]
    pub const fn is_score_driven(self) -> bool {
        matches!(self, GameMode::Scoring | GameMode::RandomEvents)
    }
}

/// Session parameters, validated at construction and reset time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    /// Marks in a row needed to win (Classic/Timed).
    pub winning_length: i32,
    /// Total score ending the game (Scoring/RandomEvents).
    pub target_score: i32,
    /// Per-player time budget (Timed).
    pub time_limit: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            winning_length: 5,
            target_score: 300,
            time_limit: Duration::from_secs(10),
        }
    }
}

impl SessionConfig {
    /// Creates a config for `mode` with the default parameters.
    #[must_use]
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Rejects degenerate parameters.
    ///
    /// A non-positive winning length would make every line check vacuous,
    /// a non-positive target score would end score-driven games before the
    /// first move, and a zero time limit makes the timed mode immediately
    /// terminal.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.winning_length <= 0 {
            return Err(ConfigError::WinningLength(self.winning_length));
        }
        if self.target_score <= 0 {
            return Err(ConfigError::TargetScore(self.target_score));
        }
        if self.time_limit.is_zero() {
            return Err(ConfigError::TimeLimit);
        }
        Ok(self)
    }
}
