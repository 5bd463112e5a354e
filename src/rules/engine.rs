//! Rules engine trait shared by the game variants.
//!
//! A `RulesEngine` owns everything the game loop needs to know about a
//! variant beyond single moves:
//! - How to build the root state
//! - When the game has ended and who won
//! - What happens to an agent that crashes
//! - How much wall-clock time agents get
//!
//! Move legality and application live on [`GameState`] itself so that
//! agents can search over successors without a rules object.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::state::GameState;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(usize),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (a ghost side or a capture team).
    Winners(Vec<usize>),
}

impl GameResult {
    /// Check if an agent won.
    #[must_use]
    pub fn is_winner(&self, agent: usize) -> bool {
        match self {
            GameResult::Winner(a) => *a == agent,
            GameResult::Winners(agents) => agents.contains(&agent),
            GameResult::Draw => false,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `process`: called after every move; returns true once the game is over
/// - `result`: `None` while the game continues
/// - `agent_crash`: must leave the state terminal
/// - Timing budgets are wall-clock and enforced cooperatively by the loop
pub trait RulesEngine {
    /// Short variant name for logs.
    fn name(&self) -> &'static str;

    /// Root state for `num_agents` agents on `layout`.
    fn initial_state(&self, layout: Arc<Layout>, num_agents: usize) -> GameState;

    /// Check for the end of the game, logging how it ended.
    fn process(&self, state: &GameState) -> bool;

    /// Outcome of a finished game.
    fn result(&self, state: &GameState) -> Option<GameResult>;

    /// Forfeit the game on behalf of `agent`.
    fn agent_crash(&self, state: &mut GameState, agent: usize);

    // === Timing Policy ===

    /// Budget for `register_initial_state`, checked once.
    fn max_startup_time(&self) -> Duration;

    /// Cap on an agent's accumulated decision time over the game.
    fn max_total_time(&self) -> Duration;

    /// Soft per-move threshold; exceeding it earns a warning.
    fn move_warning_time(&self) -> Duration;

    /// Hard per-move threshold; exceeding it forfeits.
    fn move_timeout(&self) -> Duration;

    /// Warnings tolerated before the next slow move forfeits.
    fn max_time_warnings(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(0);
        assert!(result.is_winner(0));
        assert!(!result.is_winner(1));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(0));

        let team = GameResult::Winners(vec![1, 3]);
        assert!(team.is_winner(1));
        assert!(!team.is_winner(2));
        assert!(team.is_winner(3));
    }
}
