//! Per-agent runtime record.

use serde::{Deserialize, Serialize};

use crate::core::{Coord, Direction, Position};

/// Where an agent is and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub position: Position,
    pub direction: Direction,
}

impl Configuration {
    #[must_use]
    pub const fn new(position: Position, direction: Direction) -> Self {
        Self { position, direction }
    }

    /// Configuration after moving by `vector`.
    ///
    /// A zero vector keeps the current facing.
    #[must_use]
    pub fn successor(self, vector: (f64, f64)) -> Self {
        let direction = match Direction::from_vector(vector) {
            Direction::Stop => self.direction,
            moved => moved,
        };
        Self::new(self.position.offset(vector), direction)
    }

    #[must_use]
    pub fn is_grid_aligned(self) -> bool {
        self.position.is_grid_aligned()
    }
}

/// Mutable state of one agent inside a [`GameState`](super::GameState).
///
/// `is_pacman` is the vulnerable-to-capture flag: fixed in the classic
/// game, recomputed from the board half in capture.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentState {
    start: Configuration,
    start_is_pacman: bool,
    configuration: Configuration,
    is_pacman: bool,
    scared_timer: u32,
}

impl AgentState {
    /// Agent standing on `cell`, facing `Stop`.
    #[must_use]
    pub fn new(cell: Coord, is_pacman: bool) -> Self {
        let start = Configuration::new(cell.into(), Direction::Stop);
        Self {
            start,
            start_is_pacman: is_pacman,
            configuration: start,
            is_pacman,
            scared_timer: 0,
        }
    }

    #[must_use]
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    #[must_use]
    pub fn start(&self) -> Configuration {
        self.start
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.configuration.position
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.configuration.direction
    }

    #[must_use]
    pub fn is_pacman(&self) -> bool {
        self.is_pacman
    }

    pub fn set_pacman(&mut self, is_pacman: bool) {
        self.is_pacman = is_pacman;
    }

    #[must_use]
    pub fn scared_timer(&self) -> u32 {
        self.scared_timer
    }

    #[must_use]
    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }

    pub fn set_scared_timer(&mut self, ticks: u32) {
        self.scared_timer = ticks;
    }

    pub fn update_position(&mut self, vector: (f64, f64)) {
        self.configuration = self.configuration.successor(vector);
    }

    /// Back to the start configuration, unscared.
    pub fn respawn(&mut self) {
        self.configuration = self.start;
        self.is_pacman = self.start_is_pacman;
        self.scared_timer = 0;
    }

    /// Count the scared timer down by one tick.
    ///
    /// A scared agent moves at half speed, so on the tick the timer runs
    /// out it is snapped back onto the grid.
    pub fn decrement_scared_timer(&mut self) {
        if self.scared_timer == 1 {
            self.snap_to_nearest_point();
        }
        self.scared_timer = self.scared_timer.saturating_sub(1);
    }

    pub fn snap_to_nearest_point(&mut self) {
        self.configuration.position = self.configuration.position.nearest_cell().into();
    }
}

impl PartialEq for AgentState {
    fn eq(&self, other: &Self) -> bool {
        self.configuration == other.configuration
            && self.is_pacman == other.is_pacman
            && self.scared_timer == other.scared_timer
    }
}

impl Eq for AgentState {}

impl std::hash::Hash for AgentState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.configuration.hash(state);
        self.is_pacman.hash(state);
        self.scared_timer.hash(state);
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = if self.is_pacman { "Pacman" } else { "Ghost" };
        write!(f, "{role}: {} {}", self.position(), self.direction())
    }
}
