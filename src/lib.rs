//! # pacman-engine
//!
//! A turn-based Pacman engine for search and learning agents.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: A [`GameState`] is never advanced in
//!    place. `generate_successor` returns a new state and leaves its parent
//!    intact, so agents can explore freely.
//!
//! 2. **Cheap successors**: Layouts are shared behind `Arc`, food grids are
//!    copy-on-write and agent lists use `im-rs`.
//!
//! 3. **Explicit randomness**: Everything random takes a [`GameRng`]. Same
//!    seed, same maze, same game.
//!
//! ## Variants
//!
//! - **Classic**: one pacman clears the board while ghosts hunt it.
//! - **Capture**: two teams defend their half and raid the other.
//!
//! ## Modules
//!
//! - `core`: directions, coordinates, grids, RNG
//! - `layout`: board parsing, loading and the random maze generator
//! - `state`: agent records and the game snapshot
//! - `rules`: per-move rules for both variants and the `RulesEngine` policy
//! - `game`: the timed game loop, agent and display traits
//! - `agents`: built-in agents and the name registry
//! - `replay`: move logs that rebuild a game

pub mod agents;
pub mod core;
pub mod error;
pub mod game;
pub mod layout;
pub mod replay;
pub mod rules;
pub mod state;

pub use crate::core::{Coord, Direction, GameRng, Grid, LegalActions, Position};

pub use crate::error::{AgentError, GameError, LayoutError, RegistryError, ReplayError, RuleError};

pub use crate::layout::{generate_maze, AgentStart, Layout, MazeConfig};

pub use crate::state::{AgentState, Configuration, GameState, Mode, Variant};

pub use crate::rules::{
    CaptureConfig, CaptureRules, ClassicConfig, ClassicRules, GameResult, RulesEngine, Team,
};

pub use crate::game::{
    Agent, CrashReason, CrashReport, FrameRecorder, Game, GameDisplay, GameOptions, GameOutcome, NullDisplay,
};

pub use crate::agents::{AgentRegistry, GreedyAgent, LeftTurnAgent, RandomAgent};

pub use crate::replay::{MoveRecord, Replay};
