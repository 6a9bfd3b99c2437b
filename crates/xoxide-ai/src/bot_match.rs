use tracing::debug;
use xoxide_engine::{
    ConfigError, GameSeed, GameSession, MoveError, MoveOutcome, Player, Position, SessionConfig,
};

use crate::{Bot, Difficulty};

/// A match of one human against the bot.
///
/// Wraps a [`GameSession`] and a [`Bot`] and enforces turn ownership on
/// top of the session's own rules: human moves are rejected while the bot
/// is to move, and the bot's moves are applied through the exact same
/// session path as human ones, so win, score and event handling never
/// depend on who moved. The bot plays X and opens the match.
#[derive(Debug, Clone)]
pub struct BotMatch {
    session: GameSession,
    bot: Bot,
    bot_turn: bool,
}

impl BotMatch {
    /// Creates a match with OS-seeded randomness.
    pub fn new(config: SessionConfig, difficulty: Difficulty) -> Result<Self, ConfigError> {
        let session = GameSession::new(config)?;
        let bot = Bot::new(difficulty, session.current_player());
        Ok(Self {
            session,
            bot,
            bot_turn: true,
        })
    }

    /// Like [`Self::new`], but seeding both the event generator and the
    /// bot for reproducible matches.
    pub fn with_seed(
        config: SessionConfig,
        difficulty: Difficulty,
        seed: GameSeed,
    ) -> Result<Self, ConfigError> {
        let session = GameSession::with_event_seed(config, seed)?;
        let bot = Bot::with_seed(difficulty, session.current_player(), seed);
        Ok(Self {
            session,
            bot,
            bot_turn: true,
        })
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access for timed-mode polling and queries that reconcile
    /// the clock.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.bot.difficulty()
    }

    #[must_use]
    pub fn bot_player(&self) -> Player {
        self.bot.player()
    }

    /// True while the bot is expected to move next.
    #[must_use]
    pub fn is_bot_turn(&self) -> bool {
        self.bot_turn && !self.session.is_over()
    }

    /// Applies the human's move; rejected while the bot is to move.
    pub fn play(&mut self, pos: Position) -> Result<MoveOutcome, MoveError> {
        if self.is_bot_turn() {
            return Err(MoveError::NotYourTurn);
        }
        let outcome = self.session.play(pos)?;
        if outcome.is_turn_passed() {
            self.bot_turn = true;
        }
        Ok(outcome)
    }

    /// Asks the bot for its move without applying it.
    pub fn request_bot_move(&mut self) -> Result<Position, MoveError> {
        if self.session.is_over() {
            return Err(MoveError::GameOver);
        }
        if !self.bot_turn {
            return Err(MoveError::NotYourTurn);
        }
        let winning_length = self.session.config().winning_length;
        self.bot
            .choose_move(self.session.board(), winning_length)
            .ok_or(MoveError::NoMoveAvailable)
    }

    /// Lets the bot take its turn: choose a move and apply it through the
    /// normal session path.
    pub fn bot_move(&mut self) -> Result<(Position, MoveOutcome), MoveError> {
        let pos = self.request_bot_move()?;
        let outcome = self.session.play(pos)?;
        debug!(%pos, ?outcome, "bot moved");
        if outcome.is_turn_passed() {
            self.bot_turn = false;
        }
        Ok((pos, outcome))
    }

    /// Polls the clock in timed mode; see [`GameSession::check_time`].
    pub fn check_time(&mut self) -> bool {
        self.session.check_time()
    }

    /// Restarts the match; the bot is re-bound to the starting player and
    /// opens again.
    pub fn reset(&mut self) {
        self.session.reset();
        self.bot.set_player(self.session.current_player());
        self.bot_turn = true;
    }

    /// Restarts under a new configuration and difficulty.
    pub fn reset_with(
        &mut self,
        config: SessionConfig,
        difficulty: Difficulty,
    ) -> Result<(), ConfigError> {
        self.session.reset_with(config)?;
        self.bot.set_difficulty(difficulty);
        self.bot.set_player(self.session.current_player());
        self.bot_turn = true;
        Ok(())
    }
}
