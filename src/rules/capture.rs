//! Capture rules: two teams, each defending its own half of the board.
//!
//! An agent is a ghost (defender) on its home half and a pacman (invader)
//! on the enemy half; the role is recomputed every time it lands on a cell.
//! Invaders eat the enemy's food and capsules. Score is kept from red's
//! point of view: red points are positive, blue points negative.
//!
//! The game ends when either side has at most `min_food` dots left to
//! defend, or when the shared move clock runs out.

use std::sync::Arc;
use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::actions::possible_actions;
use super::engine::{GameResult, RulesEngine};
use crate::core::{Coord, Direction, GameRng, Grid, LegalActions};
use crate::game::{Agent, Game, GameOptions};
use crate::layout::Layout;
use crate::state::{AgentState, GameState, Mode};

/// Capture rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub scared_time: u32,
    pub collision_tolerance: f64,

    /// Points for sending an enemy home, signed for the scoring team.
    pub kill_points: i64,

    /// The game ends once a side has this many dots or fewer left.
    pub min_food: usize,

    /// Invaders eat a dot within this Manhattan distance of its cell.
    pub eat_distance: f64,

    pub agent_speed: f64,

    /// Total moves (all agents) before the clock runs out.
    pub max_moves: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scared_time: 40,
            collision_tolerance: 0.7,
            kill_points: 0,
            min_food: 2,
            eat_distance: 0.9,
            agent_speed: 1.0,
            max_moves: 1200,
        }
    }
}

impl CaptureConfig {
    #[must_use]
    pub fn with_max_moves(mut self, moves: u32) -> Self {
        self.max_moves = moves;
        self
    }

    #[must_use]
    pub fn with_kill_points(mut self, points: i64) -> Self {
        self.kill_points = points;
        self
    }

    #[must_use]
    pub fn with_min_food(mut self, min_food: usize) -> Self {
        self.min_food = min_food;
        self
    }
}

/// Capture team. Red starts on the left half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Score multiplier: red scores up, blue scores down.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Team::Red => 1,
            Team::Blue => -1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Team::Red)
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Team::Red => "Red",
            Team::Blue => "Blue",
        })
    }
}

/// Capture-only state carried by a [`GameState`].
///
/// Team membership is fixed when the root state is built. The food and
/// capsule partitions follow every eat so they always match the board.
#[derive(Clone, Debug)]
pub struct CaptureData {
    config: CaptureConfig,
    teams: Arc<[Team]>,
    half_width: usize,
    red_food: Arc<Grid>,
    blue_food: Arc<Grid>,
    red_capsules: Vector<Coord>,
    blue_capsules: Vector<Coord>,
    time_left: u32,
}

impl CaptureData {
    fn new(layout: &Layout, teams: Arc<[Team]>, config: CaptureConfig) -> Self {
        let half_width = layout.width() / 2;
        let mut red_food = layout.food().clone();
        let mut blue_food = layout.food().clone();
        for cell in layout.food().as_list(true) {
            if cell.x < half_width {
                blue_food.set(cell.x, cell.y, false);
            } else {
                red_food.set(cell.x, cell.y, false);
            }
        }
        let (red_capsules, blue_capsules) = layout
            .capsules()
            .iter()
            .copied()
            .partition(|cell| cell.x < half_width);

        Self {
            config,
            teams,
            half_width,
            red_food: Arc::new(red_food),
            blue_food: Arc::new(blue_food),
            red_capsules,
            blue_capsules,
            time_left: config.max_moves,
        }
    }

    #[must_use]
    pub fn config(&self) -> CaptureConfig {
        self.config
    }

    /// Moves left on the shared clock.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn team_of(&self, agent: usize) -> Option<Team> {
        self.teams.get(agent).copied()
    }

    /// Agent indices on `team`, ascending.
    #[must_use]
    pub fn team_indices(&self, team: Team) -> Vec<usize> {
        self.teams
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == team)
            .map(|(i, _)| i)
            .collect()
    }

    /// Which half `x` lies in.
    #[must_use]
    pub fn side_of(&self, x: usize) -> Team {
        if x < self.half_width {
            Team::Red
        } else {
            Team::Blue
        }
    }

    /// Food on `team`'s half, i.e. the dots that team defends.
    #[must_use]
    pub fn food_of(&self, team: Team) -> &Grid {
        match team {
            Team::Red => &self.red_food,
            Team::Blue => &self.blue_food,
        }
    }

    /// Capsules on `team`'s half.
    #[must_use]
    pub fn capsules_of(&self, team: Team) -> &Vector<Coord> {
        match team {
            Team::Red => &self.red_capsules,
            Team::Blue => &self.blue_capsules,
        }
    }

    pub(crate) fn remove_food(&mut self, x: usize, y: usize) {
        let grid = match self.side_of(x) {
            Team::Red => &mut self.red_food,
            Team::Blue => &mut self.blue_food,
        };
        Arc::make_mut(grid).set(x, y, false);
    }

    pub(crate) fn remove_capsule(&mut self, cell: Coord) {
        let capsules = match self.side_of(cell.x) {
            Team::Red => &mut self.red_capsules,
            Team::Blue => &mut self.blue_capsules,
        };
        if let Some(index) = capsules.index_of(&cell) {
            capsules.remove(index);
        }
    }
}

// === Per-move rules ===

pub(crate) fn initial_state(layout: Arc<Layout>, config: CaptureConfig, num_agents: usize) -> GameState {
    let half_width = layout.width() / 2;
    let starts: Vec<_> = layout.all_agent_starts().iter().take(num_agents).copied().collect();
    let teams: Arc<[Team]> = starts
        .iter()
        .map(|start| if start.cell.x < half_width { Team::Red } else { Team::Blue })
        .collect();
    // Everyone starts at home, so as a defender.
    let agents: Vector<AgentState> = starts.iter().map(|start| AgentState::new(start.cell, false)).collect();

    let data = CaptureData::new(&layout, teams, config);
    GameState::from_layout(layout, agents, Mode::Capture(data))
}

/// Every agent may stop or turn back.
pub(crate) fn legal_actions(agent_state: &AgentState, walls: &Grid) -> LegalActions {
    possible_actions(agent_state.configuration(), walls)
}

pub(crate) fn apply_action(state: &mut GameState, config: &CaptureConfig, agent: usize, action: Direction) {
    let Some(data) = state.capture() else {
        return;
    };
    let Some(team) = data.team_of(agent) else {
        return;
    };
    let half_width = data.half_width;

    let Some(agent_state) = state.agent_mut(agent) else {
        return;
    };
    agent_state.update_position(action.vector(config.agent_speed));
    let position = agent_state.position();
    let cell = position.nearest_cell();
    if position.is_grid_aligned() {
        let on_red_side = cell.x < half_width;
        agent_state.set_pacman(team.is_red() != on_red_side);
    }

    if agent_state.is_pacman() && position.manhattan(cell.into()) <= config.eat_distance {
        consume(state, config, cell, team);
    }

    check_death(state, config, agent, team);

    if let Some(agent_state) = state.agent_mut(agent) {
        agent_state.decrement_scared_timer();
    }
    if let Some(data) = state.capture_mut() {
        data.time_left = data.time_left.saturating_sub(1);
    }
}

fn consume(state: &mut GameState, config: &CaptureConfig, cell: Coord, team: Team) {
    if state.eat_food(cell.x, cell.y) {
        state.add_score_change(team.sign());
        let remaining = state
            .capture()
            .map_or(0, |data| data.food_of(team.opponent()).count(true));
        if remaining <= config.min_food {
            state.end_game(true);
        }
    }

    let enemy_capsule = state
        .capture()
        .is_some_and(|data| data.capsules_of(team.opponent()).contains(&cell));
    if enemy_capsule && state.eat_capsule(cell.x, cell.y) {
        let enemies = state
            .capture()
            .map(|data| data.team_indices(team.opponent()))
            .unwrap_or_default();
        for enemy in enemies {
            if let Some(enemy_state) = state.agent_mut(enemy) {
                enemy_state.set_scared_timer(config.scared_time);
            }
        }
    }
}

/// Resolve collisions between `agent` and enemies in the opposite role.
///
/// An unscared defender sends the invader home; a scared defender is sent
/// home itself.
fn check_death(state: &mut GameState, config: &CaptureConfig, agent: usize, team: Team) {
    let enemies = state
        .capture()
        .map(|data| data.team_indices(team.opponent()))
        .unwrap_or_default();

    for enemy in enemies {
        let (Some(me), Some(them)) = (state.agent_state(agent), state.agent_state(enemy)) else {
            continue;
        };
        if me.is_pacman() == them.is_pacman()
            || me.position().manhattan(them.position()) > config.collision_tolerance
        {
            continue;
        }

        let (invader, defender, invading_team) = if me.is_pacman() {
            (agent, enemy, team)
        } else {
            (enemy, agent, team.opponent())
        };
        let defender_scared = state.agent_state(defender).is_some_and(AgentState::is_scared);
        let (victim, scoring_team) = if defender_scared {
            (defender, invading_team)
        } else {
            (invader, invading_team.opponent())
        };

        state.add_score_change(config.kill_points * scoring_team.sign());
        if let Some(victim_state) = state.agent_mut(victim) {
            victim_state.respawn();
        }
    }
}

// === Engine ===

/// Capture game policy.
#[derive(Clone, Debug)]
pub struct CaptureRules {
    config: CaptureConfig,
    max_startup_time: Duration,
    max_total_time: Duration,
    move_warning_time: Duration,
    move_timeout: Duration,
    max_time_warnings: u32,
}

impl Default for CaptureRules {
    fn default() -> Self {
        Self {
            config: CaptureConfig::default(),
            max_startup_time: Duration::from_secs(15),
            max_total_time: Duration::from_secs(900),
            move_warning_time: Duration::from_secs(1),
            move_timeout: Duration::from_secs(3),
            max_time_warnings: 2,
        }
    }
}

impl CaptureRules {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_startup_time(mut self, budget: Duration) -> Self {
        self.max_startup_time = budget;
        self
    }

    #[must_use]
    pub fn with_max_total_time(mut self, budget: Duration) -> Self {
        self.max_total_time = budget;
        self
    }

    #[must_use]
    pub fn with_move_warning_time(mut self, budget: Duration) -> Self {
        self.move_warning_time = budget;
        self
    }

    #[must_use]
    pub fn with_move_timeout(mut self, budget: Duration) -> Self {
        self.move_timeout = budget;
        self
    }

    #[must_use]
    pub fn with_max_time_warnings(mut self, warnings: u32) -> Self {
        self.max_time_warnings = warnings;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Set up a game for `agents`, in layout start order. A coin flip from
    /// `rng` picks which of the first two agents moves first.
    pub fn new_game(&self, layout: Arc<Layout>, agents: Vec<Box<dyn Agent>>, rng: &mut GameRng) -> Game<CaptureRules> {
        let state = self.initial_state(layout, agents.len());
        let mut agents = agents;
        agents.truncate(state.num_agents());

        let starting_index = rng.gen_range_usize(0..2) % state.num_agents().max(1);
        Game::new(self.clone(), state, agents)
            .with_options(GameOptions::default().with_starting_index(starting_index))
    }
}

impl RulesEngine for CaptureRules {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn initial_state(&self, layout: Arc<Layout>, num_agents: usize) -> GameState {
        initial_state(layout, self.config, num_agents)
    }

    fn process(&self, state: &GameState) -> bool {
        if !state.is_over() {
            return false;
        }
        let Some(data) = state.capture() else {
            return true;
        };

        if data.time_left() == 0 {
            info!(score = state.score(), "Time is up");
        } else {
            for team in [Team::Red, Team::Blue] {
                let remaining = data.food_of(team.opponent()).count(true);
                if remaining <= self.config.min_food {
                    info!(%team, remaining, "Team has eaten all but the last dots");
                }
            }
        }
        match state.score() {
            0 => info!("Tie game"),
            s if s > 0 => info!(score = s, "The Red team wins"),
            s => info!(score = -s, "The Blue team wins"),
        }
        true
    }

    fn result(&self, state: &GameState) -> Option<GameResult> {
        if !state.is_over() {
            return None;
        }
        let data = state.capture()?;
        Some(match state.score() {
            0 => GameResult::Draw,
            s if s > 0 => GameResult::Winners(data.team_indices(Team::Red)),
            _ => GameResult::Winners(data.team_indices(Team::Blue)),
        })
    }

    fn agent_crash(&self, state: &mut GameState, agent: usize) {
        let Some(team) = state.team_of(agent) else {
            warn!(agent, "crash reported for an agent without a team");
            state.end_game(false);
            return;
        };
        info!(agent, %team, "agent crashed");
        state.set_score(-team.sign());
        state.end_game(true);
    }

    fn max_startup_time(&self) -> Duration {
        self.max_startup_time
    }

    fn max_total_time(&self) -> Duration {
        self.max_total_time
    }

    fn move_warning_time(&self) -> Duration {
        self.move_warning_time
    }

    fn move_timeout(&self) -> Duration {
        self.move_timeout
    }

    fn max_time_warnings(&self) -> u32 {
        self.max_time_warnings
    }
}
