//! Game progression: menu, levels, results
//!
//! `Progression::apply` is a pure transition function. Session totals are
//! folded into the returned value, never mutated in place elsewhere.

use serde::{Deserialize, Serialize};

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProgressionState {
    /// Title screen, waiting for start
    Intro,
    /// Driving a level
    Playing {
        level_index: usize,
        /// Session clock value when the level (re)started
        start_timestamp: f64,
    },
    /// Parked; results for the level just finished
    Success {
        level_index: usize,
        elapsed_seconds: f32,
        bump_count: u32,
    },
    /// Every level parked
    Complete {
        total_elapsed_seconds: f32,
        total_bump_count: u32,
    },
}

/// Player commands from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Begin a session at the first level
    Start,
    /// Begin a session at a chosen level (level select)
    StartLevel(usize),
    /// Move on from a success screen to the next level
    Advance,
    /// Start the current level over
    Restart,
    /// Leave the completion screen
    ReturnToMenu,
}

/// Anything that can move the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Command(Command),
    /// The car parked; per-level results at the moment of arrival
    Arrived { elapsed: f32, bumps: u32 },
    /// Over-speed fault; the car is reset in place
    Crashed,
}

impl From<Command> for Signal {
    fn from(command: Command) -> Self {
        Signal::Command(command)
    }
}

/// Current screen plus session totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub state: ProgressionState,
    /// Seconds across all parked levels this session
    pub total_elapsed: f32,
    /// Bumps across all parked levels this session
    pub total_bumps: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            state: ProgressionState::Intro,
            total_elapsed: 0.0,
            total_bumps: 0,
        }
    }

    /// Level being driven, if any
    pub fn playing_level(&self) -> Option<usize> {
        match self.state {
            ProgressionState::Playing { level_index, .. } => Some(level_index),
            _ => None,
        }
    }

    /// Apply one signal
    ///
    /// `level_count` is the catalog size, `now` the session clock (stamped into
    /// `Playing` on entry). Signals that do not apply to the current state are
    /// ignored.
    pub fn apply(self, signal: Signal, level_count: usize, now: f64) -> Self {
        use ProgressionState::*;

        let playing = |level_index| Playing {
            level_index,
            start_timestamp: now,
        };

        match (self.state, signal) {
            (Intro, Signal::Command(Command::Start)) if level_count > 0 => Self {
                state: playing(0),
                ..self
            },
            (Intro, Signal::Command(Command::StartLevel(index))) if index < level_count => Self {
                state: playing(index),
                ..self
            },
            (Playing { level_index, .. }, Signal::Arrived { elapsed, bumps }) => {
                let total_elapsed = self.total_elapsed + elapsed;
                let total_bumps = self.total_bumps + bumps;
                let state = if level_index + 1 >= level_count {
                    Complete {
                        total_elapsed_seconds: total_elapsed,
                        total_bump_count: total_bumps,
                    }
                } else {
                    Success {
                        level_index,
                        elapsed_seconds: elapsed,
                        bump_count: bumps,
                    }
                };
                Self {
                    state,
                    total_elapsed,
                    total_bumps,
                }
            }
            // The controller resets the car; the screen and clock stay as they are
            (Playing { .. }, Signal::Crashed) => self,
            (Playing { level_index, .. }, Signal::Command(Command::Restart)) => Self {
                state: playing(level_index),
                ..self
            },
            (Success { level_index, .. }, Signal::Command(Command::Advance))
                if level_index + 1 < level_count =>
            {
                Self {
                    state: playing(level_index + 1),
                    ..self
                }
            }
            (Complete { .. }, Signal::Command(Command::ReturnToMenu)) => Self::new(),
            _ => self,
        }
    }

    /// Banner line for the HUD
    pub fn banner(&self) -> String {
        match self.state {
            ProgressionState::Intro => "Park it! Press Enter to start".to_string(),
            ProgressionState::Playing { level_index, .. } => format!("Level {}", level_index + 1),
            ProgressionState::Success {
                level_index,
                elapsed_seconds,
                bump_count,
            } => format!(
                "Level {} parked in {:.1}s with {} bump{} - Enter for next",
                level_index + 1,
                elapsed_seconds,
                bump_count,
                if bump_count == 1 { "" } else { "s" }
            ),
            ProgressionState::Complete {
                total_elapsed_seconds,
                total_bump_count,
            } => format!(
                "All levels parked! {:.1}s, {} bump{} - Enter for menu",
                total_elapsed_seconds,
                total_bump_count,
                if total_bump_count == 1 { "" } else { "s" }
            ),
        }
    }
}
