//! Board coordinates.
//!
//! ## Coord
//!
//! An integer grid cell. Walls, food and capsules live on cells.
//!
//! ## Position
//!
//! A continuous agent coordinate. Agents are cell-aligned at the start and
//! end of a full move, but a half-speed agent spends a turn between cells.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Distance under which a position counts as sitting on a cell.
pub const TOLERANCE: f64 = 0.001;

/// Integer grid cell. `(0, 0)` is the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn manhattan(self, other: Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cell offset by a signed delta, `None` when it leaves the first quadrant.
    #[must_use]
    pub fn offset(self, dx: i64, dy: i64) -> Option<Coord> {
        let x = usize::try_from(self.x as i64 + dx).ok()?;
        let y = usize::try_from(self.y as i64 + dy).ok()?;
        Some(Coord { x, y })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Continuous agent coordinate.
///
/// Coordinates are always finite, so `Eq` and `Hash` are sound; `-0.0`
/// hashes like `0.0`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position shifted by a displacement vector.
    #[must_use]
    pub fn offset(self, (dx, dy): (f64, f64)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Nearest grid cell, rounding halves up.
    #[must_use]
    pub fn nearest_cell(self) -> Coord {
        Coord::new(
            (self.x + 0.5).floor().max(0.0) as usize,
            (self.y + 0.5).floor().max(0.0) as usize,
        )
    }

    /// True when the position sits on a cell (within [`TOLERANCE`]).
    #[must_use]
    pub fn is_grid_aligned(self) -> bool {
        self.manhattan(self.nearest_cell().into()) <= TOLERANCE
    }

    #[must_use]
    pub fn manhattan(self, other: Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<Coord> for Position {
    fn from(cell: Coord) -> Self {
        Self::new(cell.x as f64, cell.y as f64)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x + 0.0).to_bits().hash(state);
        (self.y + 0.0).to_bits().hash(state);
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
