//! Game loop.
//!
//! ## Turn Order
//!
//! Agents move round-robin from `starting_index`. Each turn:
//! 1. Ask the agent for an action (timed)
//! 2. Apply it with [`GameState::generate_successor`]
//! 3. Update the display
//! 4. Let the rules decide whether the game is over
//!
//! ## Timing
//!
//! Every call into agent code is measured with the wall clock after it
//! returns. Nothing is preempted: a hung agent hangs the game. Budgets come
//! from the [`RulesEngine`]:
//! - startup: one check after `register_initial_state`
//! - per move: a soft warning threshold and a hard timeout
//! - per game: a cap on accumulated decision time
//!
//! Running over any hard budget forfeits the game for that agent.
//!
//! ## Failures
//!
//! Agent errors and illegal actions either forfeit the game
//! (`catch_errors = true`) or abort [`Game::run`] with a [`GameError`].

pub mod agent;
pub mod display;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AgentError, GameError};
use crate::replay::{MoveRecord, Replay};
use crate::rules::{GameResult, RulesEngine};
use crate::state::GameState;

pub use agent::Agent;
pub use display::{FrameRecorder, GameDisplay, NullDisplay};

/// Loop options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Agent that moves first.
    pub starting_index: usize,

    /// Turn agent errors and illegal actions into forfeits instead of
    /// returning them from [`Game::run`].
    pub catch_errors: bool,
}

impl GameOptions {
    #[must_use]
    pub fn with_starting_index(mut self, index: usize) -> Self {
        self.starting_index = index;
        self
    }

    #[must_use]
    pub fn with_catch_errors(mut self, catch: bool) -> Self {
        self.catch_errors = catch;
        self
    }
}

/// Why an agent forfeited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashReason {
    /// A single move ran over the hard timeout.
    Timeout,
    /// `register_initial_state` ran over the startup budget.
    StartupTimeout,
    /// Too many moves over the warning threshold.
    TooManyWarnings,
    /// Accumulated decision time ran over the game budget.
    OutOfTime,
    /// The agent returned an error.
    Error,
    /// The agent chose an action the rules refused.
    IllegalAction,
}

impl CrashReason {
    /// True for the time-budget reasons.
    #[must_use]
    pub const fn is_timeout(self) -> bool {
        matches!(
            self,
            CrashReason::Timeout | CrashReason::StartupTimeout | CrashReason::TooManyWarnings | CrashReason::OutOfTime
        )
    }
}

impl std::fmt::Display for CrashReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CrashReason::Timeout => "timed out on a single move",
            CrashReason::StartupTimeout => "ran out of time on startup",
            CrashReason::TooManyWarnings => "exceeded the maximum number of time warnings",
            CrashReason::OutOfTime => "ran out of total time",
            CrashReason::Error => "raised an error",
            CrashReason::IllegalAction => "chose an illegal action",
        })
    }
}

/// A forfeit, as logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashReport {
    pub agent: usize,
    pub reason: CrashReason,
    pub detail: String,
}

/// How a game ended.
#[derive(Clone, Debug)]
pub struct GameOutcome {
    pub result: GameResult,
    pub score: i64,
    pub final_state: GameState,
    pub agent_crashed: bool,
    pub agent_timeout: bool,
    pub crash: Option<CrashReport>,
    /// Moves actually applied, in order.
    pub move_history: Vec<MoveRecord>,
}

impl GameOutcome {
    #[must_use]
    pub fn num_moves(&self) -> usize {
        self.move_history.len()
    }
}

/// One game: rules, agents, the current state and a display.
pub struct Game<R: RulesEngine, D: GameDisplay = NullDisplay> {
    rules: R,
    agents: Vec<Box<dyn Agent>>,
    initial: GameState,
    state: GameState,
    display: D,
    options: GameOptions,

    total_time: Vec<Duration>,
    time_warnings: Vec<u32>,
    move_history: Vec<MoveRecord>,
    agent_crashed: bool,
    agent_timeout: bool,
}

impl<R: RulesEngine> Game<R> {
    /// Create a game. Agent `i` plays state agent `i`.
    pub fn new(rules: R, state: GameState, agents: Vec<Box<dyn Agent>>) -> Self {
        let num_agents = agents.len();
        Self {
            rules,
            agents,
            initial: state.clone(),
            state,
            display: NullDisplay,
            options: GameOptions::default(),
            total_time: vec![Duration::ZERO; num_agents],
            time_warnings: vec![0; num_agents],
            move_history: Vec::new(),
            agent_crashed: false,
            agent_timeout: false,
        }
    }
}

impl<R: RulesEngine, D: GameDisplay> Game<R, D> {
    /// Replace the display.
    pub fn with_display<D2: GameDisplay>(self, display: D2) -> Game<R, D2> {
        Game {
            rules: self.rules,
            agents: self.agents,
            initial: self.initial,
            state: self.state,
            display,
            options: self.options,
            total_time: self.total_time,
            time_warnings: self.time_warnings,
            move_history: self.move_history,
            agent_crashed: self.agent_crashed,
            agent_timeout: self.agent_timeout,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GameOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_starting_index(mut self, index: usize) -> Self {
        self.options.starting_index = index;
        self
    }

    #[must_use]
    pub fn catch_errors(mut self, catch: bool) -> Self {
        self.options.catch_errors = catch;
        self
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Accumulated decision time of `agent`.
    #[must_use]
    pub fn total_time(&self, agent: usize) -> Option<Duration> {
        self.total_time.get(agent).copied()
    }

    /// Replay log of the moves applied so far.
    #[must_use]
    pub fn replay_log(&self) -> Replay {
        let mut replay = Replay::new(&self.initial);
        for record in &self.move_history {
            replay.push(*record);
        }
        replay
    }

    /// Play until the rules end the game or an agent forfeits.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        let num_agents = self.agents.len();
        if num_agents == 0 {
            return Err(GameError::NoAgents);
        }
        if num_agents != self.state.num_agents() {
            return Err(GameError::AgentCount {
                agents: num_agents,
                states: self.state.num_agents(),
            });
        }

        info!(rules = self.rules.name(), agents = num_agents, "starting game");
        self.display.initialize(&self.state);

        let mut crash = self.register_agents()?;
        let mut game_over = crash.is_some() || self.state.is_over();
        let mut agent = self.options.starting_index % num_agents;

        while !game_over {
            match self.play_turn(agent)? {
                Some(report) => {
                    crash = Some(report);
                    game_over = true;
                }
                None => game_over = self.rules.process(&self.state),
            }
            agent = (agent + 1) % num_agents;
        }

        if crash.is_none() {
            self.notify_final()?;
        }
        self.display.finish();

        let result = self.rules.result(&self.state).unwrap_or(GameResult::Draw);
        info!(score = self.state.score(), moves = self.move_history.len(), ?result, "game over");

        Ok(GameOutcome {
            result,
            score: self.state.score(),
            final_state: self.state.clone(),
            agent_crashed: self.agent_crashed,
            agent_timeout: self.agent_timeout,
            crash,
            move_history: self.move_history.clone(),
        })
    }

    fn register_agents(&mut self) -> Result<Option<CrashReport>, GameError> {
        for agent in 0..self.agents.len() {
            let start = Instant::now();
            let registered = self.agents[agent].register_initial_state(&self.state);
            let elapsed = start.elapsed();
            self.total_time[agent] += elapsed;

            if let Err(source) = registered {
                return self.agent_failed(agent, source).map(Some);
            }
            if elapsed > self.rules.max_startup_time() {
                let detail = format!("startup took {elapsed:?}");
                return Ok(Some(self.forfeit(agent, CrashReason::StartupTimeout, detail)));
            }
        }
        Ok(None)
    }

    fn play_turn(&mut self, agent: usize) -> Result<Option<CrashReport>, GameError> {
        let start = Instant::now();
        let decision = self.agents[agent].get_action(&self.state);
        let elapsed = start.elapsed();

        let action = match decision {
            Ok(action) => action,
            Err(source) => return self.agent_failed(agent, source).map(Some),
        };
        if let Some(report) = self.check_move_time(agent, elapsed) {
            return Ok(Some(report));
        }

        match self.state.generate_successor(agent, action) {
            Ok(next) => self.state = next,
            Err(err) if self.options.catch_errors => {
                return Ok(Some(self.forfeit(agent, CrashReason::IllegalAction, err.to_string())));
            }
            Err(err) => return Err(err.into()),
        }
        debug!(agent, %action, score = self.state.score(), "applied move");
        self.move_history.push(MoveRecord { agent, action });
        self.display.update(&self.state);
        Ok(None)
    }

    /// Apply the per-move, warning and total-time budgets.
    fn check_move_time(&mut self, agent: usize, elapsed: Duration) -> Option<CrashReport> {
        if elapsed > self.rules.move_timeout() {
            let detail = format!("move took {elapsed:?}");
            return Some(self.forfeit(agent, CrashReason::Timeout, detail));
        }

        if elapsed > self.rules.move_warning_time() {
            self.time_warnings[agent] += 1;
            let warnings = self.time_warnings[agent];
            warn!(agent, warnings, elapsed_ms = elapsed.as_millis() as u64, "agent took too long to make a move");
            if warnings > self.rules.max_time_warnings() {
                let detail = format!("{warnings} time warnings");
                return Some(self.forfeit(agent, CrashReason::TooManyWarnings, detail));
            }
        }

        self.total_time[agent] += elapsed;
        if self.total_time[agent] > self.rules.max_total_time() {
            let detail = format!("total decision time {:?}", self.total_time[agent]);
            return Some(self.forfeit(agent, CrashReason::OutOfTime, detail));
        }
        None
    }

    fn agent_failed(&mut self, agent: usize, source: AgentError) -> Result<CrashReport, GameError> {
        if self.options.catch_errors {
            Ok(self.forfeit(agent, CrashReason::Error, source.to_string()))
        } else {
            Err(GameError::Agent { agent, source })
        }
    }

    /// End the game on behalf of `agent`.
    fn forfeit(&mut self, agent: usize, reason: CrashReason, detail: String) -> CrashReport {
        warn!(agent, %reason, detail = %detail, "agent forfeits the game");
        self.agent_crashed = true;
        self.agent_timeout |= reason.is_timeout();
        self.rules.agent_crash(&mut self.state, agent);
        CrashReport { agent, reason, detail }
    }

    fn notify_final(&mut self) -> Result<(), GameError> {
        for (agent, player) in self.agents.iter_mut().enumerate() {
            if let Err(source) = player.final_state(&self.state) {
                if !self.options.catch_errors {
                    return Err(GameError::Agent { agent, source });
                }
                warn!(agent, error = %source, "agent failed on the final state");
            }
        }
        Ok(())
    }
}
