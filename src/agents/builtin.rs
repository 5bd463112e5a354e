//! Reference agents.
//!
//! None of these search. They exist to drive games in tests and as
//! opponents for agents that do.

use crate::core::{Direction, GameRng};
use crate::error::AgentError;
use crate::game::Agent;
use crate::state::GameState;

/// Uniformly random legal action.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    index: usize,
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(index: usize, rng: GameRng) -> Self {
        Self { index, rng }
    }
}

impl Agent for RandomAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Direction, AgentError> {
        let legal = state.legal_actions(self.index);
        self.rng.choose(&legal).copied().ok_or(AgentError::NoLegalActions)
    }
}

/// One-ply lookahead on the score, ties broken at random.
///
/// Stop is only chosen when nothing else is legal.
#[derive(Clone, Debug)]
pub struct GreedyAgent {
    index: usize,
    rng: GameRng,
}

impl GreedyAgent {
    #[must_use]
    pub fn new(index: usize, rng: GameRng) -> Self {
        Self { index, rng }
    }

    /// +1 when a higher score is good for this agent, -1 otherwise.
    fn sign(&self, state: &GameState) -> i64 {
        match state.team_of(self.index) {
            Some(team) => team.sign(),
            None if self.index == 0 => 1,
            None => -1,
        }
    }
}

impl Agent for GreedyAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Direction, AgentError> {
        let mut legal = state.legal_actions(self.index);
        if legal.is_empty() {
            return Err(AgentError::NoLegalActions);
        }
        if legal.len() > 1 {
            legal.retain(|action| *action != Direction::Stop);
        }

        let sign = self.sign(state);
        let mut best = Vec::with_capacity(legal.len());
        let mut best_value = i64::MIN;
        for action in legal {
            let next = state
                .generate_successor(self.index, action)
                .map_err(|err| AgentError::failed(err.to_string()))?;
            let value = next.score() * sign;
            if value > best_value {
                best_value = value;
                best.clear();
            }
            if value == best_value {
                best.push(action);
            }
        }
        self.rng.choose(&best).copied().ok_or(AgentError::NoLegalActions)
    }
}

/// Turns left whenever it can.
///
/// Preference: left, straight on, right, back, stop.
#[derive(Clone, Debug)]
pub struct LeftTurnAgent {
    index: usize,
}

impl LeftTurnAgent {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Agent for LeftTurnAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Direction, AgentError> {
        let legal = state.legal_actions(self.index);
        if legal.is_empty() {
            return Err(AgentError::NoLegalActions);
        }
        let heading = state
            .agent_state(self.index)
            .map_or(Direction::Stop, |agent| agent.direction());
        let heading = if heading == Direction::Stop { Direction::North } else { heading };

        let preferences = [heading.left(), heading, heading.right(), heading.reverse(), Direction::Stop];
        preferences
            .into_iter()
            .find(|action| legal.contains(action))
            .or_else(|| legal.first().copied())
            .ok_or(AgentError::NoLegalActions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::Layout;
    use crate::rules::{ClassicRules, RulesEngine};

    fn state(text: &str) -> GameState {
        let layout = Arc::new(Layout::parse(text).unwrap());
        ClassicRules::default().initial_state(layout, 5)
    }

    #[test]
    fn test_random_agent_is_legal() {
        let s = state("%%%%%\n%   %\n% P %\n%   %\n%%%%%");
        let mut agent = RandomAgent::new(0, GameRng::new(3));
        for _ in 0..20 {
            let action = agent.get_action(&s).unwrap();
            assert!(s.legal_actions(0).contains(&action));
        }
    }

    #[test]
    fn test_no_legal_actions_after_game_over() {
        let mut s = state("%%%%%\n%P.G%\n%%%%%");
        s.end_game(true);
        let mut agent = RandomAgent::new(0, GameRng::new(3));
        assert_eq!(agent.get_action(&s), Err(AgentError::NoLegalActions));
        assert_eq!(LeftTurnAgent::new(0).get_action(&s), Err(AgentError::NoLegalActions));
    }

    #[test]
    fn test_greedy_goes_for_food() {
        let s = state("%%%%%%\n%.P  %\n%%%%%%");
        let mut agent = GreedyAgent::new(0, GameRng::new(5));
        assert_eq!(agent.get_action(&s).unwrap(), Direction::West);
    }

    #[test]
    fn test_greedy_ghost_prefers_catching() {
        let s = state("%%%%%\n%PG %\n%% %%\n%%%%%");
        let mut ghost = GreedyAgent::new(1, GameRng::new(5));
        assert_eq!(ghost.get_action(&s).unwrap(), Direction::West);
    }

    #[test]
    fn test_left_turn_preference() {
        // Facing north at a T junction: left is west.
        let s = state("%%%%%\n%   %\n%%P%%\n%%%%%");
        let s = s.generate_successor(0, Direction::North).unwrap();
        let mut agent = LeftTurnAgent::new(0);
        assert_eq!(agent.get_action(&s).unwrap(), Direction::West);

        let s = s.generate_successor(0, Direction::West).unwrap();
        // Facing west against a wall: left is south (wall), straight is wall,
        // right is north (wall), so it turns back.
        assert_eq!(agent.get_action(&s).unwrap(), Direction::East);
    }
}
