//! Actions: the five moves an agent can make on the grid.
//!
//! A `Direction` is both the action an agent chooses and the way it is
//! facing. `Stop` is a legal action that leaves the facing unchanged.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Legal actions for one agent. Never more than five, so no heap allocation.
pub type LegalActions = SmallVec<[Direction; 5]>;

/// A move on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// Every action, in the order legal actions are reported.
    pub const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Stop,
    ];

    /// Integer cell offset `(dx, dy)`; north is +y.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    /// Displacement for one move at the given speed.
    #[must_use]
    pub fn vector(self, speed: f64) -> (f64, f64) {
        let (dx, dy) = self.delta();
        (dx as f64 * speed, dy as f64 * speed)
    }

    /// Direction of a displacement. A zero vector maps to `Stop`.
    #[must_use]
    pub fn from_vector((dx, dy): (f64, f64)) -> Self {
        if dy > 0.0 {
            Direction::North
        } else if dy < 0.0 {
            Direction::South
        } else if dx < 0.0 {
            Direction::West
        } else if dx > 0.0 {
            Direction::East
        } else {
            Direction::Stop
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Quarter turn counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
            Direction::West => Direction::South,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Quarter turn clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::South => Direction::West,
            Direction::East => Direction::South,
            Direction::West => Direction::North,
            Direction::Stop => Direction::Stop,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Stop => "Stop",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
