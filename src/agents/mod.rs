//! Built-in agents and the name registry used to build them.

pub mod builtin;
pub mod registry;

pub use builtin::{GreedyAgent, LeftTurnAgent, RandomAgent};
pub use registry::{AgentFactory, AgentRegistry};
