use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    ConfigError, MoveError,
    core::{Board, Cell, PerPlayer, Player, Position, lines},
};

use super::{
    clock::TurnClock,
    config::{GameMode, SessionConfig},
    event::{EventGenerator, GameSeed, RandomEvent},
    scoreboard::Scoreboard,
};

/// Why a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// A completed line of `winning_length` marks.
    Line,
    /// A total score reaching the target.
    Score,
    /// The opponent's clock ran out.
    Time,
}

/// Whether the session is still accepting moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Won { winner: Player, reason: WinReason },
}

/// What an accepted move did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The move stands and the opponent is now to move.
    TurnPassed,
    /// A bonus-move event fired: the same player moves again.
    BonusMove,
    /// The move ended the game; see [`GameSession::state`].
    GameEnded,
}

/// One match of unbounded-board tic-tac-toe.
///
/// The session owns the live board exclusively and is the only writer to
/// it. Moves are applied through [`GameSession::play`], which runs the
/// whole per-move pipeline: placement, win check, board growth, score
/// recomputation, queued-event application and turn hand-off. The session
/// has no notion of who supplies the moves; turn ownership between a human
/// and a bot is layered on top by the caller.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    config: SessionConfig,
    current_player: Player,
    state: SessionState,
    move_history: Vec<Position>,
    win_line: Vec<Position>,
    last_win_check: Option<Position>,
    scoreboard: Scoreboard,
    clock: TurnClock,
    events: EventGenerator,
    pending_event: Option<RandomEvent>,
}

impl GameSession {
    /// Creates a session with a validated config and an OS-seeded event
    /// generator.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_events(config, EventGenerator::new())
    }

    /// Like [`Self::new`], but with a seeded event generator for
    /// deterministic event sequences.
    pub fn with_event_seed(config: SessionConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        Self::with_events(config, EventGenerator::with_seed(seed))
    }

    fn with_events(config: SessionConfig, events: EventGenerator) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let mut session = Self {
            board: Board::new(),
            config,
            current_player: Player::X,
            state: SessionState::Playing,
            move_history: Vec::new(),
            win_line: Vec::new(),
            last_win_check: None,
            scoreboard: Scoreboard::default(),
            clock: TurnClock::new(config.time_limit),
            events,
            pending_event: None,
        };
        if config.mode == GameMode::Timed {
            session.clock.start(session.current_player);
        }
        Ok(session)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    #[must_use]
    pub fn target_score(&self) -> i32 {
        self.config.target_score
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_won()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self.state {
            SessionState::Playing => None,
            SessionState::Won { winner, .. } => Some(winner),
        }
    }

    /// The highlighted winning line; empty unless the game ended by line.
    #[must_use]
    pub fn winning_line(&self) -> &[Position] {
        &self.win_line
    }

    /// Every accepted move in order of play.
    #[must_use]
    pub fn move_history(&self) -> &[Position] {
        &self.move_history
    }

    /// Displayed totals (base + bonus, floored at zero).
    #[must_use]
    pub fn scores(&self) -> PerPlayer<i32> {
        self.scoreboard.totals()
    }

    #[must_use]
    pub fn base_scores(&self) -> PerPlayer<i32> {
        self.scoreboard.base()
    }

    #[must_use]
    pub fn bonus_scores(&self) -> PerPlayer<i32> {
        self.scoreboard.bonus()
    }

    /// The event queued for the upcoming move, if any.
    #[must_use]
    pub fn pending_event(&self) -> Option<RandomEvent> {
        self.pending_event
    }

    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.config.time_limit
    }

    /// Up-to-date remaining budget for `player`.
    ///
    /// Reconciles the running clock first, which is why this takes
    /// `&mut self`.
    pub fn time_remaining(&mut self, player: Player) -> Duration {
        self.clock.remaining(player)
    }

    /// Applies the current player's move at `pos`.
    ///
    /// Rejections ([`MoveError::GameOver`], [`MoveError::Occupied`]) leave
    /// the session untouched.
    pub fn play(&mut self, pos: Position) -> Result<MoveOutcome, MoveError> {
        self.play_at(pos, Instant::now())
    }

    pub(crate) fn play_at(&mut self, pos: Position, now: Instant) -> Result<MoveOutcome, MoveError> {
        if self.state.is_won() {
            return Err(MoveError::GameOver);
        }
        if self.board.get(pos) != Cell::Empty {
            return Err(MoveError::Occupied);
        }

        let mover = self.current_player;
        self.board.set(pos, mover.mark());
        self.move_history.push(pos);
        debug!(player = %mover, %pos, "move placed");

        if !self.config.mode.is_score_driven() {
            self.check_line_win(pos);
        }
        if self.board.should_expand(pos) {
            self.board.expand();
        }
        if self.config.mode.is_score_driven() {
            self.recalculate_scores();
        }
        if self.state.is_won() {
            if self.config.mode == GameMode::Timed {
                self.clock.stop_at(now);
            }
            return Ok(MoveOutcome::GameEnded);
        }

        if self.config.mode == GameMode::RandomEvents {
            if let Some(event) = self.pending_event.take() {
                self.apply_event(event, mover);
                if self.state.is_won() {
                    return Ok(MoveOutcome::GameEnded);
                }
                if event == RandomEvent::BonusMove {
                    return Ok(MoveOutcome::BonusMove);
                }
            }
        }

        if self.config.mode == GameMode::Timed {
            self.clock.stop_at(now);
        }
        self.current_player = mover.opponent();
        if self.config.mode == GameMode::RandomEvents {
            let event = self.events.roll();
            self.pending_event = (event != RandomEvent::Nothing).then_some(event);
        }
        if self.config.mode == GameMode::Timed {
            self.clock.start_at(self.current_player, now);
        }
        Ok(MoveOutcome::TurnPassed)
    }

    /// Checks whether a player's clock has run out, ending the game in the
    /// opponent's favour when it has.
    ///
    /// This is a read with a side effect: reconciling the running clock is
    /// the only way timeouts are detected, so timed-mode callers poll this
    /// between moves.
    pub fn check_time(&mut self) -> bool {
        self.check_time_at(Instant::now())
    }

    pub(crate) fn check_time_at(&mut self, now: Instant) -> bool {
        if self.config.mode != GameMode::Timed {
            return false;
        }
        if let SessionState::Won { reason, .. } = self.state {
            return reason == WinReason::Time;
        }
        if let Some(loser) = self.clock.expired_player_at(now) {
            self.state = SessionState::Won {
                winner: loser.opponent(),
                reason: WinReason::Time,
            };
            self.clock.stop_at(now);
            debug!(loser = %loser, "clock expired");
            return true;
        }
        false
    }

    /// Restarts the match with the current configuration.
    pub fn reset(&mut self) {
        self.board.clear();
        self.move_history.clear();
        self.win_line.clear();
        self.last_win_check = None;
        self.scoreboard.reset();
        self.pending_event = None;
        self.current_player = Player::X;
        self.state = SessionState::Playing;
        self.clock.reset(self.config.time_limit);
        if self.config.mode == GameMode::Timed {
            self.clock.start(self.current_player);
        }
    }

    /// Restarts the match under a new configuration.
    pub fn reset_with(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        self.config = config.validate()?;
        self.reset();
        Ok(())
    }

    fn check_line_win(&mut self, last_move: Position) {
        // The line through the just-played move is asked for repeatedly
        // (state queries, rendering); memoize per position.
        if self.last_win_check == Some(last_move) && !self.win_line.is_empty() {
            return;
        }
        self.last_win_check = Some(last_move);
        if let Some(line) =
            lines::winning_line_through(&self.board, last_move, self.config.winning_length)
        {
            let winner = self
                .board
                .get(last_move)
                .player()
                .unwrap_or(self.current_player);
            debug!(winner = %winner, "winning line completed");
            self.win_line = line;
            self.state = SessionState::Won {
                winner,
                reason: WinReason::Line,
            };
        }
    }

    fn recalculate_scores(&mut self) {
        self.scoreboard.set_base(lines::base_scores(&self.board));
        self.check_score_win();
    }

    fn check_score_win(&mut self) {
        if self.state.is_won() {
            return;
        }
        if let Some(winner) = self.scoreboard.leader_reaching(self.config.target_score) {
            self.state = SessionState::Won {
                winner,
                reason: WinReason::Score,
            };
        }
    }

    /// Applies a queued event on behalf of `mover`, the player whose move
    /// triggered it.
    fn apply_event(&mut self, event: RandomEvent, mover: Player) {
        debug!(%event, player = %mover, "applying queued event");
        match event {
            // Turn retention is handled by the caller; the board and
            // scores are untouched.
            RandomEvent::BonusMove => return,
            RandomEvent::Nothing => {}
            RandomEvent::ScorePlus10
            | RandomEvent::ScoreMinus10
            | RandomEvent::ScorePlus25
            | RandomEvent::ScoreMinus25 => {
                self.scoreboard.add_bonus(mover, event.score_delta());
            }
            RandomEvent::SwapPlayers => {
                self.swap_all_marks();
                self.scoreboard.set_base(lines::base_scores(&self.board));
            }
            RandomEvent::ClearArea => {
                if let Some(&last) = self.move_history.last() {
                    self.board.set(last, Cell::Empty);
                    for neighbor in last.neighbors() {
                        self.board.set(neighbor, Cell::Empty);
                    }
                    self.scoreboard.set_base(lines::base_scores(&self.board));
                }
            }
        }
        self.check_score_win();
    }

    /// Flips every mark on the board. Line ownership changes wholesale, so
    /// callers recompute base scores afterwards.
    fn swap_all_marks(&mut self) {
        let marks: Vec<_> = self.board.occupied().collect();
        for (pos, player) in marks {
            self.board.set(pos, player.opponent().mark());
        }
    }

    #[cfg(test)]
    pub(crate) fn force_pending_event(&mut self, event: RandomEvent) {
        self.pending_event = Some(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bounds;

    fn session(mode: GameMode) -> GameSession {
        GameSession::new(SessionConfig::for_mode(mode)).unwrap()
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_classic_win_scenario() {
        let mut game = GameSession::new(SessionConfig {
            winning_length: 3,
            ..SessionConfig::default()
        })
        .unwrap();

        assert!(game.play(pos(0, 0)).unwrap().is_turn_passed()); // X
        assert!(game.play(pos(0, 1)).unwrap().is_turn_passed()); // O
        assert!(game.play(pos(1, 0)).unwrap().is_turn_passed()); // X
        assert!(game.play(pos(0, 2)).unwrap().is_turn_passed()); // O
        let outcome = game.play(pos(2, 0)).unwrap(); // X completes the row

        assert!(outcome.is_game_ended());
        assert_eq!(game.winner(), Some(Player::X));
        assert_eq!(
            game.state(),
            SessionState::Won {
                winner: Player::X,
                reason: WinReason::Line
            }
        );
        assert_eq!(game.winning_line(), &[pos(0, 0), pos(1, 0), pos(2, 0)]);
    }

    #[test]
    fn test_occupied_cell_rejected_without_state_change() {
        let mut game = session(GameMode::Classic);
        game.play(pos(0, 0)).unwrap();
        let history_before = game.move_history().to_vec();

        assert_eq!(game.play(pos(0, 0)), Err(MoveError::Occupied));
        assert_eq!(game.move_history(), history_before);
        assert_eq!(game.current_player(), Player::O);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut game = GameSession::new(SessionConfig {
            winning_length: 1,
            ..SessionConfig::default()
        })
        .unwrap();
        assert!(game.play(pos(0, 0)).unwrap().is_game_ended());
        assert_eq!(game.play(pos(1, 1)), Err(MoveError::GameOver));
    }

    #[test]
    fn test_turn_alternates() {
        let mut game = session(GameMode::Classic);
        assert_eq!(game.current_player(), Player::X);
        game.play(pos(0, 0)).unwrap();
        assert_eq!(game.current_player(), Player::O);
        game.play(pos(1, 0)).unwrap();
        assert_eq!(game.current_player(), Player::X);
    }

    #[test]
    fn test_boundary_placement_expands_every_edge() {
        let mut game = session(GameMode::Classic);
        let before = game.board().bounds();
        game.play(pos(before.max_x, 0)).unwrap();
        let after = game.board().bounds();
        assert_eq!(after.min_x, before.min_x - 1);
        assert_eq!(after.max_x, before.max_x + 1);
        assert_eq!(after.min_y, before.min_y - 1);
        assert_eq!(after.max_y, before.max_y + 1);
    }

    #[test]
    fn test_scoring_target_scenario() {
        let mut game = GameSession::new(SessionConfig {
            mode: GameMode::Scoring,
            target_score: 9,
            ..SessionConfig::default()
        })
        .unwrap();

        game.play(pos(0, 0)).unwrap(); // X
        game.play(pos(5, 5)).unwrap(); // O, far away
        game.play(pos(1, 0)).unwrap(); // X
        game.play(pos(5, 3)).unwrap(); // O, still isolated from X's run
        let outcome = game.play(pos(2, 0)).unwrap(); // X's run of 3 = 9 points

        assert!(outcome.is_game_ended());
        assert_eq!(game.scores()[Player::X], 9);
        assert_eq!(
            game.state(),
            SessionState::Won {
                winner: Player::X,
                reason: WinReason::Score
            }
        );
        // No line highlight for score wins.
        assert!(game.winning_line().is_empty());
    }

    #[test]
    fn test_scoring_mode_ignores_line_wins() {
        let mut game = GameSession::new(SessionConfig {
            mode: GameMode::Scoring,
            winning_length: 2,
            target_score: 300,
            ..SessionConfig::default()
        })
        .unwrap();
        game.play(pos(0, 0)).unwrap();
        game.play(pos(5, 5)).unwrap();
        // Completes a 2-line, which in scoring mode only means 4 points.
        assert!(game.play(pos(1, 0)).unwrap().is_turn_passed());
        assert_eq!(game.scores()[Player::X], 4);
        assert!(!game.is_over());
    }

    #[test]
    fn test_bonus_move_retains_turn() {
        let mut game = session(GameMode::RandomEvents);
        game.force_pending_event(RandomEvent::BonusMove);

        let outcome = game.play(pos(0, 0)).unwrap();
        assert_eq!(outcome, MoveOutcome::BonusMove);
        assert_eq!(game.current_player(), Player::X);
        assert!(game.board().occupied_by(Player::O).next().is_none());
        // The queued event is consumed, not re-rolled.
        assert_eq!(game.pending_event(), None);
    }

    #[test]
    fn test_score_event_credits_the_mover() {
        let mut game = session(GameMode::RandomEvents);
        game.force_pending_event(RandomEvent::ScorePlus25);

        game.play(pos(0, 0)).unwrap(); // X triggers the queued event
        assert_eq!(game.bonus_scores()[Player::X], 25);
        assert_eq!(game.bonus_scores()[Player::O], 0);
        // Base 1 for the single mark, plus the bonus.
        assert_eq!(game.scores()[Player::X], 26);
    }

    #[test]
    fn test_negative_events_floor_total_at_zero() {
        let mut game = session(GameMode::RandomEvents);
        game.force_pending_event(RandomEvent::ScoreMinus25);
        game.play(pos(0, 0)).unwrap(); // X: base 1, bonus -25
        assert_eq!(game.scores()[Player::X], 0);

        game.force_pending_event(RandomEvent::ScoreMinus10);
        game.play(pos(5, 5)).unwrap(); // O: base 1, bonus -10
        assert_eq!(game.scores()[Player::O], 0);
    }

    #[test]
    fn test_swap_event_flips_marks_and_rescores() {
        let mut game = session(GameMode::RandomEvents);
        // Pin the setup moves to a no-op so the OS-seeded generator can't
        // fire an event on them and perturb the board before the swap.
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(0, 0)).unwrap(); // X
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(5, 5)).unwrap(); // O
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(1, 0)).unwrap(); // X, run of 2

        game.force_pending_event(RandomEvent::SwapPlayers);
        game.play(pos(5, 0)).unwrap(); // O triggers the swap

        // X's run of 2 now belongs to O, and O's marks to X.
        assert_eq!(game.board().get(pos(0, 0)), Cell::O);
        assert_eq!(game.board().get(pos(1, 0)), Cell::O);
        assert_eq!(game.board().get(pos(5, 5)), Cell::X);
        assert_eq!(game.base_scores()[Player::O], 4);
        assert_eq!(game.base_scores()[Player::X], 2);
    }

    #[test]
    fn test_clear_area_erases_neighborhood_of_last_move() {
        let mut game = session(GameMode::RandomEvents);
        // Pin the setup moves to a no-op so the OS-seeded generator can't
        // fire an event on them and erase marks before the clear-area event.
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(0, 0)).unwrap(); // X
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(1, 1)).unwrap(); // O
        game.force_pending_event(RandomEvent::Nothing);
        game.play(pos(4, 4)).unwrap(); // X, outside the doomed area

        game.force_pending_event(RandomEvent::ClearArea);
        game.play(pos(0, 1)).unwrap(); // O; 3x3 around (0,1) is erased

        assert_eq!(game.board().get(pos(0, 1)), Cell::Empty);
        assert_eq!(game.board().get(pos(0, 0)), Cell::Empty);
        assert_eq!(game.board().get(pos(1, 1)), Cell::Empty);
        assert_eq!(game.board().get(pos(4, 4)), Cell::X);
        assert_eq!(game.base_scores()[Player::X], 1);
        assert_eq!(game.base_scores()[Player::O], 0);
    }

    #[test]
    fn test_events_only_roll_in_random_mode() {
        let mut game = session(GameMode::Scoring);
        for i in 0..6 {
            game.play(pos(i, i % 2)).unwrap();
            assert_eq!(game.pending_event(), None);
        }
    }

    #[test]
    fn test_event_sequence_is_deterministic_under_seed() {
        let seed = GameSeed::from_bytes([3; 16]);
        let config = SessionConfig::for_mode(GameMode::RandomEvents);
        let mut a = GameSession::with_event_seed(config, seed).unwrap();
        let mut b = GameSession::with_event_seed(config, seed).unwrap();

        for i in 0..10 {
            let target = pos(i, 0);
            // Bonus moves keep the same player's turn; both sessions stay in
            // lockstep either way.
            let oa = a.play(target).unwrap();
            let ob = b.play(target).unwrap();
            assert_eq!(oa, ob);
            assert_eq!(a.pending_event(), b.pending_event());
        }
    }

    #[test]
    fn test_timed_mode_expires_for_the_idle_player() {
        let start = Instant::now();
        let mut game = session(GameMode::Timed);

        // X's clock started at construction; let it run out.
        let past_limit = start + game.time_limit() + Duration::from_secs(1);
        assert!(game.check_time_at(past_limit));
        assert_eq!(
            game.state(),
            SessionState::Won {
                winner: Player::O,
                reason: WinReason::Time
            }
        );
        assert_eq!(game.play(pos(0, 0)), Err(MoveError::GameOver));
        // Repeated polls stay true without further state changes.
        assert!(game.check_time_at(past_limit + Duration::from_secs(5)));
    }

    #[test]
    fn test_timed_mode_charges_only_the_player_to_move() {
        let start = Instant::now();
        let mut game = session(GameMode::Timed);

        let t1 = start + Duration::from_secs(3);
        game.play_at(pos(0, 0), t1).unwrap(); // X spends ~3s

        let t2 = t1 + Duration::from_secs(2);
        assert!(!game.check_time_at(t2));
        assert!(game.time_remaining(Player::X) >= Duration::from_secs(6));

        let t3 = t1 + game.time_limit() + Duration::from_secs(1);
        assert!(game.check_time_at(t3));
        assert_eq!(game.winner(), Some(Player::X));
    }

    #[test]
    fn test_check_time_is_inert_outside_timed_mode() {
        let mut game = session(GameMode::Classic);
        assert!(!game.check_time());
        assert!(!game.is_over());
    }

    #[test]
    fn test_reset_restores_a_fresh_match() {
        let mut game = session(GameMode::RandomEvents);
        game.force_pending_event(RandomEvent::ScorePlus25);
        game.play(pos(0, 0)).unwrap();
        game.play(pos(5, 0)).unwrap();

        game.reset();
        assert!(game.board().is_empty());
        assert_eq!(game.board().bounds(), Bounds::INITIAL);
        assert!(game.move_history().is_empty());
        assert!(game.winning_line().is_empty());
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.pending_event(), None);
        assert_eq!(game.scores(), PerPlayer::new(0, 0));
        assert!(!game.is_over());
    }

    #[test]
    fn test_reset_with_applies_and_validates_new_config() {
        let mut game = session(GameMode::Classic);
        let next = SessionConfig {
            mode: GameMode::Scoring,
            target_score: 50,
            ..SessionConfig::default()
        };
        game.reset_with(next).unwrap();
        assert_eq!(game.mode(), GameMode::Scoring);
        assert_eq!(game.target_score(), 50);

        let bad = SessionConfig {
            winning_length: -1,
            ..SessionConfig::default()
        };
        assert_eq!(game.reset_with(bad), Err(ConfigError::WinningLength(-1)));
    }

    #[test]
    fn test_win_memo_survives_repeated_checks() {
        let mut game = GameSession::new(SessionConfig {
            winning_length: 2,
            ..SessionConfig::default()
        })
        .unwrap();
        game.play(pos(0, 0)).unwrap();
        game.play(pos(5, 5)).unwrap();
        assert!(game.play(pos(1, 0)).unwrap().is_game_ended());
        let line = game.winning_line().to_vec();
        assert_eq!(line, vec![pos(0, 0), pos(1, 0)]);
        // State queries after the fact keep reporting the same line.
        assert_eq!(game.winning_line(), line.as_slice());
        assert_eq!(game.winner(), Some(Player::X));
    }
}
