//! Agent lookup by name.
//!
//! Names are resolved once, at game setup. Each created agent gets its own
//! RNG stream forked from the caller's, so a seeded run builds the same
//! agents every time.

use rustc_hash::FxHashMap;

use super::builtin::{GreedyAgent, LeftTurnAgent, RandomAgent};
use crate::core::GameRng;
use crate::error::RegistryError;
use crate::game::Agent;

/// Builds an agent for a given agent index.
pub type AgentFactory = fn(usize, GameRng) -> Box<dyn Agent>;

/// Registry of agent factories.
///
/// ## Example
///
/// ```
/// use pacman_engine::agents::AgentRegistry;
/// use pacman_engine::GameRng;
///
/// let registry = AgentRegistry::default();
/// let mut rng = GameRng::new(7);
///
/// assert!(registry.create("random", 0, &mut rng).is_ok());
/// assert!(registry.create("minimax", 0, &mut rng).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AgentRegistry {
    factories: FxHashMap<&'static str, AgentFactory>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a factory under `name`.
    ///
    /// Panics if the name is already taken.
    pub fn register(&mut self, name: &'static str, factory: AgentFactory) {
        if self.factories.contains_key(name) {
            panic!("Agent '{name}' already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Build the agent registered as `name` to play agent `index`.
    pub fn create(&self, name: &str, index: usize, rng: &mut GameRng) -> Result<Box<dyn Agent>, RegistryError> {
        let factory = self.factories.get(name).ok_or_else(|| RegistryError::UnknownAgent {
            name: name.to_string(),
            known: self.names().join(", "),
        })?;
        Ok(factory(index, rng.fork()))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for AgentRegistry {
    /// Registry with the built-in agents.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("random", |index, rng| Box::new(RandomAgent::new(index, rng)));
        registry.register("greedy", |index, rng| Box::new(GreedyAgent::new(index, rng)));
        registry.register("left_turn", |index, _| Box::new(LeftTurnAgent::new(index)));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = AgentRegistry::default();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["greedy", "left_turn", "random"]);
        assert!(registry.contains("greedy"));
        assert!(!AgentRegistry::new().contains("greedy"));
    }

    #[test]
    fn test_unknown_agent_lists_known_names() {
        let registry = AgentRegistry::default();
        let mut rng = GameRng::new(1);
        let err = registry.create("expectimax", 0, &mut rng).err();
        assert_eq!(
            err,
            Some(RegistryError::UnknownAgent {
                name: "expectimax".to_string(),
                known: "greedy, left_turn, random".to_string(),
            })
        );
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = AgentRegistry::default();
        registry.register("random", |index, _| Box::new(LeftTurnAgent::new(index)));
    }
}
