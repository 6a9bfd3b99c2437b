use crate::core::{PerPlayer, Player};

/// Per-player score ledger for the score-driven modes.
///
/// Base scores come from isolated lines on the board and are recomputed
/// wholesale after every change; bonus scores accumulate from random
/// events. Displayed totals are `base + bonus`, floored at zero, so a
/// negative bonus can suppress a win but never award one to the opponent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    base: PerPlayer<i32>,
    bonus: PerPlayer<i32>,
}

impl Scoreboard {
    #[must_use]
    pub fn total(&self, player: Player) -> i32 {
        (self.base[player] + self.bonus[player]).max(0)
    }

    #[must_use]
    pub fn totals(&self) -> PerPlayer<i32> {
        PerPlayer::from_fn(|player| self.total(player))
    }

    #[must_use]
    pub fn base(&self) -> PerPlayer<i32> {
        self.base
    }

    #[must_use]
    pub fn bonus(&self) -> PerPlayer<i32> {
        self.bonus
    }

    pub fn set_base(&mut self, base: PerPlayer<i32>) {
        self.base = base;
    }

    pub fn add_bonus(&mut self, player: Player, delta: i32) {
        self.bonus[player] += delta;
    }

    /// The first player whose total reaches `target`, X checked before O.
    #[must_use]
    pub fn leader_reaching(&self, target: i32) -> Option<Player> {
        if self.total(Player::X) >= target {
            Some(Player::X)
        } else if self.total(Player::O) >= target {
            Some(Player::O)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
