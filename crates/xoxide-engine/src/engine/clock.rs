use std::time::{Duration, Instant};

use crate::core::{PerPlayer, Player};

/// Per-player move clock for the timed mode.
///
/// There is no background ticking thread: the running player's budget is
/// reconciled against wall-clock time lazily, inside every query. Reading
/// a clock therefore takes `&mut self` - a query can be the moment a
/// budget hits zero.
#[derive(Debug, Clone)]
pub struct TurnClock {
    remaining: PerPlayer<Duration>,
    running: Option<(Player, Instant)>,
}

impl TurnClock {
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self {
            remaining: PerPlayer::new(limit, limit),
            running: None,
        }
    }

    /// Starts charging `player`'s budget from now on.
    ///
    /// Any previously running clock is reconciled and stopped first.
    pub fn start(&mut self, player: Player) {
        self.start_at(player, Instant::now());
    }

    pub(crate) fn start_at(&mut self, player: Player, now: Instant) {
        self.reconcile_at(now);
        self.running = Some((player, now));
    }

    /// Reconciles and stops the running clock, if any.
    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub(crate) fn stop_at(&mut self, now: Instant) {
        self.reconcile_at(now);
        self.running = None;
    }

    /// Charges the elapsed time to the running player, flooring at zero.
    fn reconcile_at(&mut self, now: Instant) {
        if let Some((player, started)) = self.running {
            let elapsed = now.saturating_duration_since(started);
            self.remaining[player] = self.remaining[player].saturating_sub(elapsed);
            self.running = Some((player, now));
        }
    }

    /// Up-to-date remaining budget for `player`.
    pub fn remaining(&mut self, player: Player) -> Duration {
        self.remaining_at(player, Instant::now())
    }

    pub(crate) fn remaining_at(&mut self, player: Player, now: Instant) -> Duration {
        self.reconcile_at(now);
        self.remaining[player]
    }

    /// The player whose budget is exhausted, if any.
    pub fn expired_player(&mut self) -> Option<Player> {
        self.expired_player_at(Instant::now())
    }

    pub(crate) fn expired_player_at(&mut self, now: Instant) -> Option<Player> {
        self.reconcile_at(now);
        if self.remaining[Player::X].is_zero() {
            Some(Player::X)
        } else if self.remaining[Player::O].is_zero() {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Restores both budgets to `limit` and stops the clock.
    pub fn reset(&mut self, limit: Duration) {
        self.remaining = PerPlayer::new(limit, limit);
        self.running = None;
    }
}
