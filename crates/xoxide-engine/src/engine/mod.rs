//! Game logic and state management.
//!
//! This module layers the rules of the game on top of the core data
//! structures:
//!
//! - [`GameSession`] - one match: board, turn order, win state, scores,
//!   clocks and queued events
//! - [`SessionConfig`] / [`GameMode`] - validated match parameters
//! - [`EventGenerator`] - seeded random-event rolls for the random-events
//!   mode
//! - [`TurnClock`] - lazily reconciled per-player move clock for the timed
//!   mode
//! - [`Scoreboard`] - base/bonus score ledger for the score-driven modes
//!
//! # Game flow
//!
//! 1. Build a [`SessionConfig`] and construct a [`GameSession`]
//! 2. Apply moves with [`GameSession::play`]; inspect the returned
//!    [`MoveOutcome`]
//! 3. In timed mode, poll [`GameSession::check_time`] between moves
//! 4. When [`GameSession::state`] turns [`SessionState::Won`], read the
//!    winner, reason and (for line wins) the highlighted line
//! 5. [`GameSession::reset`] starts the next match
//!
//! # Example
//!
//! ```
//! use xoxide_engine::{GameSession, Position, SessionConfig};
//!
//! let config = SessionConfig {
//!     winning_length: 3,
//!     ..SessionConfig::default()
//! };
//! let mut game = GameSession::new(config)?;
//!
//! game.play(Position::new(0, 0))?; // X
//! game.play(Position::new(0, 1))?; // O
//!
//! assert!(!game.is_over());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{clock::*, config::*, event::*, scoreboard::*, session::*};

mod clock;
mod config;
mod event;
mod scoreboard;
mod session;
