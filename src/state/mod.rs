//! Game state: per-agent records and the copy-on-write board snapshot.

pub mod agent_state;
pub mod game_state;

pub use agent_state::{AgentState, Configuration};
pub use game_state::{GameState, Mode, Variant};
