//! Agent decision interface.

use crate::core::Direction;
use crate::error::AgentError;
use crate::state::GameState;

/// A player controlled by code outside the engine.
///
/// Agents only ever see a shared reference to the current state. They can
/// explore successors with [`GameState::generate_successor`] freely; the
/// loop's copy is never affected.
///
/// Calls are timed with the wall clock but never interrupted, so an agent
/// that blocks forever blocks the game.
pub trait Agent {
    /// Called once before the first move, under the startup time budget.
    fn register_initial_state(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    /// Choose a move for the current state.
    fn get_action(&mut self, state: &GameState) -> Result<Direction, AgentError>;

    /// Called with the terminal state once the game ends normally.
    fn final_state(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }
}
