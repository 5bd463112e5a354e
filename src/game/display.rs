//! Display callbacks.
//!
//! The loop calls these synchronously, in move order, and waits for each
//! call to return before the next turn.

use crate::state::GameState;

/// Observer of a running game.
pub trait GameDisplay {
    /// Called once with the root state.
    fn initialize(&mut self, state: &GameState);

    /// Called after every applied move.
    fn update(&mut self, state: &GameState);

    /// Called once after the game ends.
    fn finish(&mut self) {}
}

/// Display that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl GameDisplay for NullDisplay {
    fn initialize(&mut self, _state: &GameState) {}

    fn update(&mut self, _state: &GameState) {}
}

/// Keeps a text frame of every state shown.
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<String>,
    finished: bool,
}

impl FrameRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in display order, the root state first.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl GameDisplay for FrameRecorder {
    fn initialize(&mut self, state: &GameState) {
        self.frames.clear();
        self.finished = false;
        self.frames.push(state.to_string());
    }

    fn update(&mut self, state: &GameState) {
        self.frames.push(state.to_string());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
