//! Error types.
//!
//! One enum per failure class:
//! - [`LayoutError`], [`RegistryError`]: configuration errors, fatal at startup
//! - [`RuleError`]: a caller asked for something the rules forbid
//! - [`AgentError`]: an agent's own failure, forfeited or propagated by the loop
//! - [`GameError`]: what aborts [`crate::game::Game::run`]
//! - [`ReplayError`]: a replay log that cannot be decoded or replayed

use std::path::PathBuf;

use crate::core::Direction;

/// A request the rules refuse. Always a bug in the caller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("cannot generate a successor of a terminal state")]
    TerminalState,

    #[error("illegal action {action} for agent {agent}")]
    IllegalAction { agent: usize, action: Direction },

    #[error("no agent with index {0}")]
    InvalidAgent(usize),
}

/// A layout that cannot be found or parsed.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout text is empty")]
    Empty,

    #[error("layout row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout '{0}' not found")]
    NotFound(String),

    #[error("invalid maze seed in layout name '{0}'")]
    InvalidSeed(String),

    #[error("failed to read layout {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by agent code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent has no legal actions")]
    NoLegalActions,

    #[error("{0}")]
    Failed(String),
}

impl AgentError {
    /// Shorthand for [`AgentError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        AgentError::Failed(message.into())
    }
}

/// Agent name lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown agent '{name}' (known agents: {known})")]
    UnknownAgent { name: String, known: String },
}

/// Errors that abort a game run instead of forfeiting it.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game has no agents")]
    NoAgents,

    #[error("game has {agents} agents but the state has {states} agent slots")]
    AgentCount { agents: usize, states: usize },

    #[error("agent {agent} failed: {source}")]
    Agent {
        agent: usize,
        #[source]
        source: AgentError,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Errors decoding or replaying a [`crate::replay::Replay`].
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("replay layout is invalid: {0}")]
    Layout(#[from] LayoutError),

    #[error("replay move {step} was rejected: {source}")]
    Rule {
        step: usize,
        #[source]
        source: RuleError,
    },

    #[error("replay JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("replay encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_messages() {
        let err = RuleError::IllegalAction {
            agent: 2,
            action: Direction::West,
        };
        assert_eq!(err.to_string(), "illegal action West for agent 2");
        assert_eq!(
            RuleError::TerminalState.to_string(),
            "cannot generate a successor of a terminal state"
        );
    }

    #[test]
    fn test_game_error_from_rule_error() {
        let err: GameError = RuleError::InvalidAgent(7).into();
        assert!(matches!(err, GameError::Rule(RuleError::InvalidAgent(7))));
        assert_eq!(err.to_string(), "no agent with index 7");
    }

    #[test]
    fn test_agent_error_failed() {
        let err = AgentError::failed("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
