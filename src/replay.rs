//! Replay logs.
//!
//! A replay is the layout text, the variant parameters and the move list.
//! Games are deterministic given those, so states are rebuilt by replaying
//! the moves rather than stored.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Direction;
use crate::error::ReplayError;
use crate::layout::Layout;
use crate::state::{GameState, Variant};

/// One applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub agent: usize,
    pub action: Direction,
}

/// Everything needed to rebuild a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub layout: String,
    pub variant: Variant,
    pub num_agents: usize,
    pub moves: Vec<MoveRecord>,
}

impl Replay {
    /// Empty replay starting at `initial`.
    #[must_use]
    pub fn new(initial: &GameState) -> Self {
        Self {
            layout: initial.layout().text().join("\n"),
            variant: initial.variant(),
            num_agents: initial.num_agents(),
            moves: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Rebuild the root state.
    pub fn initial_state(&self) -> Result<GameState, ReplayError> {
        let layout = Arc::new(Layout::parse(&self.layout)?);
        Ok(self.variant.initial_state(layout, self.num_agents))
    }

    /// Every state of the game, the root first.
    pub fn states(&self) -> Result<Vec<GameState>, ReplayError> {
        let mut state = self.initial_state()?;
        let mut states = Vec::with_capacity(self.moves.len() + 1);
        for (step, record) in self.moves.iter().enumerate() {
            let next = state
                .generate_successor(record.agent, record.action)
                .map_err(|source| ReplayError::Rule { step, source })?;
            states.push(std::mem::replace(&mut state, next));
        }
        states.push(state);
        Ok(states)
    }

    /// State after the last move.
    pub fn final_state(&self) -> Result<GameState, ReplayError> {
        let mut state = self.initial_state()?;
        for (step, record) in self.moves.iter().enumerate() {
            state = state
                .generate_successor(record.agent, record.action)
                .map_err(|source| ReplayError::Rule { step, source })?;
        }
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rules::ClassicConfig;

    fn replay() -> Replay {
        let layout = Arc::new(Layout::parse("%%%%%\n%P..%\n%%%%%").unwrap());
        let root = GameState::new_classic(layout, ClassicConfig::default(), 0);
        let mut replay = Replay::new(&root);
        replay.push(MoveRecord { agent: 0, action: Direction::East });
        replay.push(MoveRecord { agent: 0, action: Direction::East });
        replay
    }

    #[test]
    fn test_states() {
        let states = replay().states().unwrap();
        assert_eq!(states.len(), 3);
        assert_eq!(states[1].score(), 9);
        assert!(states[2].is_win());
        assert_eq!(states[2], replay().final_state().unwrap());
    }

    #[test]
    fn test_rejected_move() {
        let mut replay = replay();
        replay.push(MoveRecord { agent: 0, action: Direction::West });
        let err = replay.states().unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Rule {
                step: 2,
                source: RuleError::TerminalState
            }
        ));
    }

    #[test]
    fn test_bad_layout() {
        let mut replay = replay();
        replay.layout = "%%%\n%P".to_string();
        assert!(matches!(replay.initial_state(), Err(ReplayError::Layout(_))));
    }
}
