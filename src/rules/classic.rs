//! Classic rules: one pacman (agent 0) against every ghost on the board.
//!
//! ## Scoring
//!
//! | event                     | default |
//! |---------------------------|---------|
//! | pacman move               | -1      |
//! | food                      | +10     |
//! | last food (win)           | +500    |
//! | eat a scared ghost        | +200    |
//! | caught by a ghost (loss)  | -500    |
//!
//! Ghosts may not stop and only reverse in a dead end. A capsule scares
//! every ghost; scared ghosts move at half speed until the timer runs out.

use std::sync::Arc;
use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::actions::possible_actions;
use super::engine::{GameResult, RulesEngine};
use crate::core::{Coord, Direction, Grid, LegalActions, Position};
use crate::game::{Agent, Game};
use crate::layout::Layout;
use crate::state::{AgentState, GameState, Mode};

/// Classic rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassicConfig {
    /// Moves a ghost stays scared after a capsule.
    pub scared_time: u32,

    /// Manhattan distance at which pacman and a ghost collide.
    pub collision_tolerance: f64,

    /// Points lost on every pacman move.
    pub time_penalty: i64,

    pub food_points: i64,

    /// Bonus for clearing the board.
    pub win_points: i64,

    pub ghost_points: i64,

    /// Points lost when caught.
    pub death_penalty: i64,

    pub pacman_speed: f64,

    /// Ghost speed when not scared; halved while scared.
    pub ghost_speed: f64,
}

impl Default for ClassicConfig {
    fn default() -> Self {
        Self {
            scared_time: 40,
            collision_tolerance: 0.7,
            time_penalty: 1,
            food_points: 10,
            win_points: 500,
            ghost_points: 200,
            death_penalty: 500,
            pacman_speed: 1.0,
            ghost_speed: 1.0,
        }
    }
}

impl ClassicConfig {
    #[must_use]
    pub fn with_scared_time(mut self, ticks: u32) -> Self {
        self.scared_time = ticks;
        self
    }

    #[must_use]
    pub fn with_time_penalty(mut self, penalty: i64) -> Self {
        self.time_penalty = penalty;
        self
    }

    #[must_use]
    pub fn with_collision_tolerance(mut self, tolerance: f64) -> Self {
        self.collision_tolerance = tolerance;
        self
    }
}

// === Per-move rules ===

pub(crate) fn initial_state(layout: Arc<Layout>, config: ClassicConfig, max_ghosts: usize) -> GameState {
    let agents: Vector<AgentState> = layout
        .agent_starts(max_ghosts)
        .into_iter()
        .map(|start| AgentState::new(start.cell, start.is_pacman))
        .collect();
    GameState::from_layout(layout, agents, Mode::Classic(config))
}

/// Pacman may do anything the walls allow; ghosts may not stop, and only
/// turn back when nothing else is open.
pub(crate) fn legal_actions(agent_state: &AgentState, agent: usize, walls: &Grid) -> LegalActions {
    let mut possible = possible_actions(agent_state.configuration(), walls);
    if agent == 0 {
        return possible;
    }

    possible.retain(|action| *action != Direction::Stop);
    let reverse = agent_state.direction().reverse();
    if possible.len() > 1 {
        possible.retain(|action| *action != reverse);
    }
    possible
}

pub(crate) fn apply_action(state: &mut GameState, config: &ClassicConfig, agent: usize, action: Direction) {
    if agent == 0 {
        move_pacman(state, config, action);
        state.add_score_change(-config.time_penalty);
    } else {
        move_ghost(state, config, agent, action);
    }
    check_death(state, config, agent);
}

fn move_pacman(state: &mut GameState, config: &ClassicConfig, action: Direction) {
    let Some(pacman) = state.agent_mut(0) else {
        return;
    };
    pacman.update_position(action.vector(config.pacman_speed));

    let position = pacman.position();
    let cell = position.nearest_cell();
    if position.manhattan(cell.into()) <= 0.5 {
        consume(state, config, cell);
    }
}

fn consume(state: &mut GameState, config: &ClassicConfig, cell: Coord) {
    if state.eat_food(cell.x, cell.y) {
        state.add_score_change(config.food_points);
        if state.num_food() == 0 && !state.is_lose() {
            state.add_score_change(config.win_points);
            state.end_game(true);
        }
    }

    if state.eat_capsule(cell.x, cell.y) {
        for ghost in 1..state.num_agents() {
            if let Some(ghost_state) = state.agent_mut(ghost) {
                ghost_state.set_scared_timer(config.scared_time);
            }
        }
    }
}

fn move_ghost(state: &mut GameState, config: &ClassicConfig, agent: usize, action: Direction) {
    let Some(ghost) = state.agent_mut(agent) else {
        return;
    };
    let speed = if ghost.is_scared() {
        config.ghost_speed / 2.0
    } else {
        config.ghost_speed
    };
    ghost.update_position(action.vector(speed));
    ghost.decrement_scared_timer();
}

/// Resolve collisions after `agent` moved.
fn check_death(state: &mut GameState, config: &ClassicConfig, agent: usize) {
    let Some(pacman) = state.pacman_position() else {
        return;
    };

    let ghosts: Vec<usize> = if agent == 0 {
        (1..state.num_agents()).collect()
    } else {
        vec![agent]
    };
    for ghost in ghosts {
        let touching = state
            .agent_state(ghost)
            .is_some_and(|g| can_kill(pacman, g.position(), config.collision_tolerance));
        if touching {
            collide(state, config, ghost);
        }
    }
}

fn can_kill(pacman: Position, ghost: Position, tolerance: f64) -> bool {
    pacman.manhattan(ghost) <= tolerance
}

fn collide(state: &mut GameState, config: &ClassicConfig, ghost: usize) {
    let scared = state.agent_state(ghost).is_some_and(AgentState::is_scared);
    if scared {
        state.add_score_change(config.ghost_points);
        if let Some(ghost_state) = state.agent_mut(ghost) {
            ghost_state.respawn();
        }
    } else if !state.is_win() {
        state.add_score_change(-config.death_penalty);
        state.end_game(false);
    }
}

// === Engine ===

/// Classic game policy: termination, crashes and a single time budget.
#[derive(Clone, Debug)]
pub struct ClassicRules {
    config: ClassicConfig,
    timeout: Duration,
}

impl Default for ClassicRules {
    fn default() -> Self {
        Self {
            config: ClassicConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClassicRules {
    #[must_use]
    pub fn new(config: ClassicConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Use `timeout` for every time budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClassicConfig {
        &self.config
    }

    /// Set up a game with one pacman and at most as many ghosts as the
    /// layout has starts for. Surplus ghost agents are dropped.
    pub fn new_game(&self, layout: Arc<Layout>, pacman: Box<dyn Agent>, ghosts: Vec<Box<dyn Agent>>) -> Game<ClassicRules> {
        let mut ghosts = ghosts;
        ghosts.truncate(layout.num_ghosts());

        let state = self.initial_state(layout, 1 + ghosts.len());
        let mut agents = Vec::with_capacity(state.num_agents());
        agents.push(pacman);
        agents.extend(ghosts);
        Game::new(self.clone(), state, agents)
    }
}

impl RulesEngine for ClassicRules {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn initial_state(&self, layout: Arc<Layout>, num_agents: usize) -> GameState {
        initial_state(layout, self.config, num_agents.saturating_sub(1))
    }

    fn process(&self, state: &GameState) -> bool {
        if state.is_win() {
            info!(score = state.score(), "Pacman emerges victorious");
        } else if state.is_lose() {
            info!(score = state.score(), "Pacman died");
        }
        state.is_over()
    }

    fn result(&self, state: &GameState) -> Option<GameResult> {
        if state.is_win() {
            Some(GameResult::Winner(0))
        } else if state.is_lose() {
            Some(GameResult::Winners((1..state.num_agents()).collect()))
        } else {
            None
        }
    }

    fn agent_crash(&self, state: &mut GameState, agent: usize) {
        if agent == 0 {
            info!("Pacman crashed");
            state.end_game(false);
        } else {
            info!(agent, "A ghost crashed");
            state.end_game(true);
        }
    }

    fn max_startup_time(&self) -> Duration {
        self.timeout
    }

    fn max_total_time(&self) -> Duration {
        self.timeout
    }

    fn move_warning_time(&self) -> Duration {
        self.timeout
    }

    fn move_timeout(&self) -> Duration {
        self.timeout
    }

    fn max_time_warnings(&self) -> u32 {
        0
    }
}
