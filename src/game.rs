//! Frame-driven game controller
//!
//! Owns the level catalog, the progression state, the live vehicle and the
//! held input. The presentation layer forwards key events and commands, calls
//! `update` once per rendered frame, then reads the pose and HUD back.

use serde::Serialize;

use crate::consts::MAX_FRAME_DT;
use crate::sim::{
    CatalogError, CollisionVolumes, Command, InputIntent, Key, LevelCatalog, LevelDefinition,
    Progression, ProgressionState, Signal, SimEvent, StepOutcome, VehicleState, step,
};

/// Geometry of the level on screen
#[derive(Debug, Clone)]
struct ActiveLevel {
    index: usize,
    volumes: CollisionVolumes,
}

/// Snapshot for HUD text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub banner: String,
    /// Short state tag: "intro", "playing", "success" or "complete"
    pub screen: &'static str,
    pub level_index: Option<usize>,
    pub level_name: Option<String>,
    pub level_count: usize,
    /// Seconds on the current level
    pub elapsed: f32,
    /// Bumps on the current level
    pub bumps: u32,
    pub total_elapsed: f32,
    pub total_bumps: u32,
    pub speed: f32,
    pub heading_degrees: f32,
    /// Session clock for cosmetic animation
    pub pulse: f64,
}

impl Hud {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The whole game, minus rendering
#[derive(Debug, Clone)]
pub struct Game {
    catalog: LevelCatalog,
    progression: Progression,
    active: Option<ActiveLevel>,
    /// Only present while a level is being driven
    vehicle: Option<VehicleState>,
    intent: InputIntent,
    /// Monotonic session clock (seconds)
    pulse: f64,
}

impl Game {
    pub fn new(catalog: LevelCatalog) -> Self {
        log::info!("Game initialized with {} levels", catalog.len());
        Self {
            catalog,
            progression: Progression::new(),
            active: None,
            vehicle: None,
            intent: InputIntent::default(),
            pulse: 0.0,
        }
    }

    /// Game over the built-in levels
    pub fn with_builtin_levels() -> Result<Self, CatalogError> {
        Ok(Self::new(LevelCatalog::builtin()?))
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Live vehicle, for pose rendering
    pub fn vehicle(&self) -> Option<&VehicleState> {
        self.vehicle.as_ref()
    }

    /// Level whose geometry is on screen (playing or just parked)
    pub fn level(&self) -> Option<&LevelDefinition> {
        self.active.as_ref().and_then(|a| self.catalog.get(a.index))
    }

    pub fn volumes(&self) -> Option<&CollisionVolumes> {
        self.active.as_ref().map(|a| &a.volumes)
    }

    pub fn intent(&self) -> InputIntent {
        self.intent
    }

    /// Session clock, only ever increases
    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    /// Replace all held intents at once (autopilot, gamepads)
    pub fn set_intent(&mut self, intent: InputIntent) {
        self.intent = intent;
    }

    /// Drop every held intent (window blur, tab hidden)
    pub fn release_keys(&mut self) {
        self.intent.clear();
    }

    /// Forward a key press/release
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        if key.is_driving() {
            self.intent.apply(key, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match key {
            Key::Restart => self.command(Command::Restart),
            Key::Confirm => {
                if let Some(command) = self.confirm_command() {
                    self.command(command);
                }
            }
            _ => {}
        }
    }

    /// Forward a browser `KeyboardEvent.code`; returns false for unmapped keys
    pub fn key_code(&mut self, code: &str, pressed: bool) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.key_event(key, pressed);
                true
            }
            None => false,
        }
    }

    /// What Enter means on the current screen
    fn confirm_command(&self) -> Option<Command> {
        match self.progression.state {
            ProgressionState::Intro => Some(Command::Start),
            ProgressionState::Success { .. } => Some(Command::Advance),
            ProgressionState::Complete { .. } => Some(Command::ReturnToMenu),
            ProgressionState::Playing { .. } => None,
        }
    }

    /// Apply a player command
    pub fn command(&mut self, command: Command) {
        let before = self.progression;
        self.progression = before.apply(command.into(), self.catalog.len(), self.pulse);

        let restarting = command == Command::Restart && before.playing_level().is_some();
        if self.progression == before && !restarting {
            log::debug!("Ignored {:?} in {:?}", command, before.state);
            return;
        }

        match self.progression.state {
            ProgressionState::Playing { level_index, .. } => self.enter_level(level_index),
            ProgressionState::Intro => {
                log::info!("Back to menu");
                self.active = None;
                self.vehicle = None;
            }
            _ => self.vehicle = None,
        }
    }

    fn enter_level(&mut self, index: usize) {
        let Some(level) = self.catalog.get(index) else {
            return;
        };
        if self.active.as_ref().map(|a| a.index) != Some(index) {
            self.active = Some(ActiveLevel {
                index,
                volumes: CollisionVolumes::build(level),
            });
        }
        self.vehicle = Some(VehicleState::spawn(level));
        log::info!("Level {} \"{}\" started", index + 1, level.name);
    }

    /// Advance one rendered frame of `frame_dt` seconds
    ///
    /// Non-positive or NaN deltas are ignored; large ones are clamped.
    pub fn update(&mut self, frame_dt: f32) -> SimEvent {
        if !(frame_dt > 0.0) {
            return SimEvent::None;
        }
        let dt = frame_dt.min(MAX_FRAME_DT);
        self.pulse += dt as f64;

        let (Some(vehicle), Some(active)) = (self.vehicle, self.active.as_ref()) else {
            return SimEvent::None;
        };
        let Some(level) = self.catalog.get(active.index) else {
            return SimEvent::None;
        };

        // Snapshot so the whole tick sees one consistent set of intents
        let intent = self.intent;
        let outcome = step(vehicle, &intent, level, &active.volumes, dt);
        self.handle_outcome(outcome);
        outcome.event
    }

    fn handle_outcome(&mut self, outcome: StepOutcome) {
        let level_count = self.catalog.len();
        match outcome.event {
            SimEvent::None => self.vehicle = Some(outcome.state),
            SimEvent::Arrived => {
                let signal = Signal::Arrived {
                    elapsed: outcome.state.elapsed,
                    bumps: outcome.state.bumps,
                };
                self.progression = self.progression.apply(signal, level_count, self.pulse);
                self.vehicle = None;
                log::info!(
                    "Parked in {:.1}s with {} bumps ({})",
                    outcome.state.elapsed,
                    outcome.state.bumps,
                    self.progression.banner()
                );
            }
            SimEvent::Crashed => {
                self.progression = self.progression.apply(Signal::Crashed, level_count, self.pulse);
                let Some(level) = self.level() else {
                    return;
                };
                let respawned = outcome.state.respawn_after_crash(level);
                log::debug!("Crash at {:.1} units/s, car reset", outcome.state.velocity);
                self.vehicle = Some(respawned);
            }
        }
    }

    /// Current HUD values
    pub fn hud(&self) -> Hud {
        let (screen, level_index) = match self.progression.state {
            ProgressionState::Intro => ("intro", None),
            ProgressionState::Playing { level_index, .. } => ("playing", Some(level_index)),
            ProgressionState::Success { level_index, .. } => ("success", Some(level_index)),
            ProgressionState::Complete { .. } => ("complete", None),
        };
        let (elapsed, bumps) = match (self.progression.state, self.vehicle) {
            (_, Some(v)) => (v.elapsed, v.bumps),
            (
                ProgressionState::Success {
                    elapsed_seconds,
                    bump_count,
                    ..
                },
                None,
            ) => (elapsed_seconds, bump_count),
            _ => (0.0, 0),
        };

        Hud {
            banner: self.progression.banner(),
            screen,
            level_index,
            level_name: level_index
                .and_then(|i| self.catalog.get(i))
                .map(|l| l.name.clone()),
            level_count: self.catalog.len(),
            elapsed,
            bumps,
            total_elapsed: self.progression.total_elapsed,
            total_bumps: self.progression.total_bumps,
            speed: self.vehicle.map(|v| v.speed()).unwrap_or(0.0),
            heading_degrees: self.vehicle.map(|v| v.heading_degrees()).unwrap_or(0.0),
            pulse: self.pulse,
        }
    }
}
