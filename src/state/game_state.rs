//! Copy-on-write game snapshot.
//!
//! ## Sharing
//!
//! A successor starts as a clone of its parent. Every clone is cheap:
//! - the layout is an `Arc` and is never written
//! - food grids are `Arc<Grid>`, copied by `Arc::make_mut` on the first eat
//! - agent and capsule lists are `im` vectors with structural sharing
//!
//! So mutating a successor never shows through to its parent.
//!
//! ## Modes
//!
//! The board, score and terminal flags are shared by both game variants.
//! Variant-specific data and rules hang off [`Mode`]; the rule functions
//! themselves live in [`crate::rules`].

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use im::Vector;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::agent_state::AgentState;
use crate::core::{Coord, Direction, Grid, LegalActions, Position};
use crate::error::RuleError;
use crate::layout::Layout;
use crate::rules::capture::{self, CaptureConfig, CaptureData, Team};
use crate::rules::classic::{self, ClassicConfig};

/// Variant-specific state.
#[derive(Clone, Debug)]
pub enum Mode {
    Classic(ClassicConfig),
    Capture(CaptureData),
}

/// Game variant plus its rule parameters. Enough to rebuild an initial state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    Classic(ClassicConfig),
    Capture(CaptureConfig),
}

impl Variant {
    /// Root state for this variant on `layout`.
    #[must_use]
    pub fn initial_state(&self, layout: Arc<Layout>, num_agents: usize) -> GameState {
        match *self {
            Variant::Classic(config) => classic::initial_state(layout, config, num_agents.saturating_sub(1)),
            Variant::Capture(config) => capture::initial_state(layout, config, num_agents),
        }
    }
}

/// One snapshot of a game.
///
/// Only [`GameState::generate_successor`] advances the game; the parent is
/// left untouched. Equality and hashing are structural and ignore how the
/// state was reached, but always tell terminal states from live ones.
#[derive(Clone, Debug)]
pub struct GameState {
    layout: Arc<Layout>,
    food: Arc<Grid>,
    capsules: Vector<Coord>,
    agents: Vector<AgentState>,

    score: i64,
    score_change: i64,
    win: bool,
    lose: bool,

    // Last move, for incremental displays.
    agent_moved: Option<usize>,
    food_eaten: Option<Coord>,
    capsule_eaten: Option<Coord>,

    mode: Mode,
    hash: OnceLock<u64>,
}

impl GameState {
    /// Root state: food and capsules from the layout, one agent per start.
    pub(crate) fn from_layout(layout: Arc<Layout>, agents: Vector<AgentState>, mode: Mode) -> Self {
        Self {
            food: Arc::new(layout.food().clone()),
            capsules: layout.capsules().iter().copied().collect(),
            layout,
            agents,
            score: 0,
            score_change: 0,
            win: false,
            lose: false,
            agent_moved: None,
            food_eaten: None,
            capsule_eaten: None,
            mode,
            hash: OnceLock::new(),
        }
    }

    /// Classic root state with at most `max_ghosts` ghosts.
    #[must_use]
    pub fn new_classic(layout: Arc<Layout>, config: ClassicConfig, max_ghosts: usize) -> Self {
        classic::initial_state(layout, config, max_ghosts)
    }

    /// Capture root state with the first `num_agents` layout starts.
    #[must_use]
    pub fn new_capture(layout: Arc<Layout>, config: CaptureConfig, num_agents: usize) -> Self {
        capture::initial_state(layout, config, num_agents)
    }

    // === Transitions ===

    /// Apply `action` for agent `agent` to a copy of this state.
    pub fn generate_successor(&self, agent: usize, action: Direction) -> Result<GameState, RuleError> {
        if self.is_over() {
            return Err(RuleError::TerminalState);
        }
        if agent >= self.agents.len() {
            return Err(RuleError::InvalidAgent(agent));
        }
        if !self.legal_actions(agent).contains(&action) {
            return Err(RuleError::IllegalAction { agent, action });
        }

        let mut next = self.child();
        match &self.mode {
            Mode::Classic(config) => classic::apply_action(&mut next, config, agent, action),
            Mode::Capture(data) => capture::apply_action(&mut next, &data.config(), agent, action),
        }
        next.agent_moved = Some(agent);
        next.score += next.score_change;
        Ok(next)
    }

    /// Legal actions for `agent`; empty once the game is over.
    #[must_use]
    pub fn legal_actions(&self, agent: usize) -> LegalActions {
        if self.is_over() {
            return LegalActions::new();
        }
        let Some(state) = self.agents.get(agent) else {
            return LegalActions::new();
        };
        match &self.mode {
            Mode::Classic(_) => classic::legal_actions(state, agent, self.layout.walls()),
            Mode::Capture(_) => capture::legal_actions(state, self.layout.walls()),
        }
    }

    /// Shallow copy with the per-move markers cleared.
    fn child(&self) -> Self {
        let mut next = self.clone();
        next.score_change = 0;
        next.food_eaten = None;
        next.capsule_eaten = None;
        next.hash = OnceLock::new();
        next
    }

    fn invalidate(&mut self) {
        self.hash = OnceLock::new();
    }

    // === Board ===

    /// Remove the food at `(x, y)`. Returns false when there was none.
    pub fn eat_food(&mut self, x: usize, y: usize) -> bool {
        if !self.food.get(x, y) {
            return false;
        }
        Arc::make_mut(&mut self.food).set(x, y, false);
        if let Mode::Capture(data) = &mut self.mode {
            data.remove_food(x, y);
        }
        self.food_eaten = Some(Coord::new(x, y));
        self.invalidate();
        true
    }

    /// Remove the capsule at `(x, y)`. Returns false when there was none.
    pub fn eat_capsule(&mut self, x: usize, y: usize) -> bool {
        let cell = Coord::new(x, y);
        let Some(index) = self.capsules.index_of(&cell) else {
            return false;
        };
        self.capsules.remove(index);
        if let Mode::Capture(data) = &mut self.mode {
            data.remove_capsule(cell);
        }
        self.capsule_eaten = Some(cell);
        self.invalidate();
        true
    }

    #[must_use]
    pub fn food(&self) -> &Grid {
        &self.food
    }

    #[must_use]
    pub fn num_food(&self) -> usize {
        self.food.count(true)
    }

    #[must_use]
    pub fn has_food(&self, x: usize, y: usize) -> bool {
        self.food.get(x, y)
    }

    #[must_use]
    pub fn walls(&self) -> &Grid {
        self.layout.walls()
    }

    #[must_use]
    pub fn has_wall(&self, x: usize, y: usize) -> bool {
        self.layout.walls().get(x, y)
    }

    #[must_use]
    pub fn capsules(&self) -> &Vector<Coord> {
        &self.capsules
    }

    #[must_use]
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    // === Agents ===

    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn agent_state(&self, agent: usize) -> Option<&AgentState> {
        self.agents.get(agent)
    }

    pub fn agent_states(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.iter()
    }

    pub(crate) fn agent_mut(&mut self, agent: usize) -> Option<&mut AgentState> {
        self.hash = OnceLock::new();
        self.agents.get_mut(agent)
    }

    /// Position of agent 0.
    #[must_use]
    pub fn pacman_position(&self) -> Option<Position> {
        self.agents.front().map(AgentState::position)
    }

    /// State of a ghost. Index 0 is the pacman and is rejected.
    pub fn ghost_state(&self, agent: usize) -> Result<&AgentState, RuleError> {
        match agent {
            0 => Err(RuleError::InvalidAgent(agent)),
            _ => self.agents.get(agent).ok_or(RuleError::InvalidAgent(agent)),
        }
    }

    /// Positions of agents 1.., in index order.
    #[must_use]
    pub fn ghost_positions(&self) -> Vec<Position> {
        self.agents.iter().skip(1).map(AgentState::position).collect()
    }

    // === Score and termination ===

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Score delta of the move that produced this state.
    #[must_use]
    pub fn score_change(&self) -> i64 {
        self.score_change
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
        self.invalidate();
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
        self.invalidate();
    }

    /// Queue a delta for the move being applied; committed after the move.
    pub(crate) fn add_score_change(&mut self, delta: i64) {
        self.score_change += delta;
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.win
    }

    #[must_use]
    pub fn is_lose(&self) -> bool {
        self.lose
    }

    /// True once the game has ended, by win, loss or the capture clock.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.win || self.lose || self.capture().is_some_and(|data| data.time_left() == 0)
    }

    /// End the game. Has no effect on a state that is already over.
    pub fn end_game(&mut self, win: bool) {
        if self.is_over() {
            return;
        }
        if win {
            self.win = true;
        } else {
            self.lose = true;
        }
        self.invalidate();
    }

    // === Last move ===

    #[must_use]
    pub fn agent_moved(&self) -> Option<usize> {
        self.agent_moved
    }

    #[must_use]
    pub fn food_eaten(&self) -> Option<Coord> {
        self.food_eaten
    }

    #[must_use]
    pub fn capsule_eaten(&self) -> Option<Coord> {
        self.capsule_eaten
    }

    // === Mode ===

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        match &self.mode {
            Mode::Classic(config) => Variant::Classic(*config),
            Mode::Capture(data) => Variant::Capture(data.config()),
        }
    }

    /// Capture data, `None` in a classic game.
    #[must_use]
    pub fn capture(&self) -> Option<&CaptureData> {
        match &self.mode {
            Mode::Capture(data) => Some(data),
            Mode::Classic(_) => None,
        }
    }

    pub(crate) fn capture_mut(&mut self) -> Option<&mut CaptureData> {
        self.hash = OnceLock::new();
        match &mut self.mode {
            Mode::Capture(data) => Some(data),
            Mode::Classic(_) => None,
        }
    }

    /// Team of `agent` in a capture game.
    #[must_use]
    pub fn team_of(&self, agent: usize) -> Option<Team> {
        self.capture().and_then(|data| data.team_of(agent))
    }

    // === Hashing ===

    /// Structural hash, computed once per state.
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = FxHasher::default();
            self.score.hash(&mut hasher);
            self.win.hash(&mut hasher);
            self.lose.hash(&mut hasher);
            self.is_over().hash(&mut hasher);
            self.capsules.hash(&mut hasher);
            self.food.hash(&mut hasher);
            self.agents.hash(&mut hasher);
            self.layout.text().hash(&mut hasher);
            std::mem::discriminant(&self.mode).hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.structural_hash() == other.structural_hash()
            && self.score == other.score
            && self.win == other.win
            && self.lose == other.lose
            && self.is_over() == other.is_over()
            && std::mem::discriminant(&self.mode) == std::mem::discriminant(&other.mode)
            && self.capsules == other.capsules
            && self.food == other.food
            && self.agents == other.agents
            && (Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout)
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl std::fmt::Display for GameState {
    /// Board art in the layout alphabet plus the score line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = (self.layout.width(), self.layout.height());
        let mut board: Vec<Vec<char>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if self.food.get(x, y) {
                            '.'
                        } else if self.has_wall(x, y) {
                            '%'
                        } else {
                            ' '
                        }
                    })
                    .collect()
            })
            .collect();

        for agent in &self.agents {
            let cell = agent.position().nearest_cell();
            let glyph = if agent.is_pacman() {
                match agent.direction() {
                    Direction::North => 'v',
                    Direction::South => '^',
                    Direction::West => '>',
                    _ => '<',
                }
            } else {
                'G'
            };
            if let Some(slot) = board.get_mut(cell.y).and_then(|row| row.get_mut(cell.x)) {
                *slot = glyph;
            }
        }
        for cell in &self.capsules {
            board[cell.y][cell.x] = 'o';
        }

        for row in board.iter().rev() {
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }
        write!(f, "Score: {}", self.score)
    }
}
