use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A per-turn modifier drawn in the random-events mode.
///
/// The event rolled after a completed move is queued and applied to the
/// *next* completed move, so the UI can announce what the upcoming move
/// will trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RandomEvent {
    #[display("nothing")]
    Nothing,
    #[display("+10 points")]
    ScorePlus10,
    #[display("-10 points")]
    ScoreMinus10,
    #[display("+25 points")]
    ScorePlus25,
    #[display("-25 points")]
    ScoreMinus25,
    #[display("bonus move")]
    BonusMove,
    #[display("clear area")]
    ClearArea,
    #[display("swap players")]
    SwapPlayers,
}

impl RandomEvent {
    /// The bonus-score change this event applies, 0 for non-score events.
    #[must_use]
    pub const fn score_delta(self) -> i32 {
        match self {
            RandomEvent::ScorePlus10 => 10,
            RandomEvent::ScoreMinus10 => -10,
            RandomEvent::ScorePlus25 => 25,
            RandomEvent::ScoreMinus25 => -25,
            _ => 0,
        }
    }
}

/// Seed for deterministic random rolls.
///
/// A 128-bit seed initializing the engine's random number generators.
/// Reusing a seed reproduces the same sequence of events (and, when passed
/// to the bot, the same easy-tier move picks), which is what match replays
/// and deterministic tests are built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed(pub(crate) [u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex = String::with_capacity(2 * self.0.len());
        write!(&mut hex, "{num:032x}").unwrap();
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex.len()
            )));
        }
        let num = u128::from_str_radix(&hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

/// Draws per-turn random events with fixed cumulative probabilities.
#[derive(Debug, Clone)]
pub struct EventGenerator {
    rng: Pcg32,
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventGenerator {
    /// Creates a generator seeded from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic rolls.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws the next event.
    ///
    /// A uniform roll in `[0, 100)` maps onto: nothing 35%, ±10 points 15%
    /// each, ±25 points 5% each, bonus move 15%, clear area 5%, swap
    /// players 5%.
    pub fn roll(&mut self) -> RandomEvent {
        match self.rng.random_range(0..100) {
            0..35 => RandomEvent::Nothing,
            35..50 => RandomEvent::ScorePlus10,
            50..65 => RandomEvent::ScoreMinus10,
            65..70 => RandomEvent::ScorePlus25,
            70..75 => RandomEvent::ScoreMinus25,
            75..90 => RandomEvent::BonusMove,
            90..95 => RandomEvent::ClearArea,
            _ => RandomEvent::SwapPlayers,
        }
    }
}
