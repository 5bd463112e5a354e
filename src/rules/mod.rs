//! Rules for the two game variants.
//!
//! - `actions`: wall-based movement legality shared by both variants
//! - `classic`: one pacman against ghosts
//! - `capture`: two teams raiding each other's half of the board
//! - `engine`: the `RulesEngine` policy trait the game loop drives
//!
//! Per-move rules are free functions called by
//! [`GameState::generate_successor`](crate::state::GameState::generate_successor);
//! the `RulesEngine` implementations add termination, crash and timing policy.

pub mod actions;
pub mod capture;
pub mod classic;
pub mod engine;

pub use actions::possible_actions;
pub use capture::{CaptureConfig, CaptureData, CaptureRules, Team};
pub use classic::{ClassicConfig, ClassicRules};
pub use engine::{GameResult, RulesEngine};
