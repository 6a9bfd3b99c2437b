use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A cell coordinate on the unbounded integer grid.
///
/// Positions are plain values: equality and ordering are by `x`, then `y`,
/// so they can key both hash maps and ordered sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The position `steps` cells away along a direction vector.
    #[must_use]
    pub const fn step(self, (dx, dy): (i32, i32), steps: i32) -> Self {
        Self::new(self.x + dx * steps, self.y + dy * steps)
    }

    /// Manhattan distance from the grid origin.
    #[must_use]
    pub const fn manhattan_from_origin(self) -> i32 {
        self.x.abs() + self.y.abs()
    }

    /// The 8 surrounding cells, excluding `self`.
    #[must_use]
    pub fn neighbors(self) -> ArrayVec<Self, 8> {
        let mut out = ArrayVec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    out.push(self.offset(dx, dy));
                }
            }
        }
        out
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: "x,y" (e.g. "-3,12")
        serializer.collect_str(&format_args!("{},{}", self.x, self.y))
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let (x_str, y_str) = s
            .split_once(',')
            .ok_or_else(|| serde::de::Error::custom(format!("expected format 'x,y', got '{s}'")))?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x coordinate: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y coordinate: {y_str} ({e})")))?;
        Ok(Self::new(x, y))
    }
}
