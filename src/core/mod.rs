//! Core board types: directions, coordinates, grids, RNG.
//!
//! These are the building blocks shared by layouts, game states and the
//! rules. None of them know which game variant is being played.

pub mod direction;
pub mod grid;
pub mod position;
pub mod rng;

pub use direction::{Direction, LegalActions};
pub use grid::Grid;
pub use position::{Coord, Position, TOLERANCE};
pub use rng::GameRng;
