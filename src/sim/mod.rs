//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - No randomness
//! - Stable iteration order (obstacles in catalog order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod level;
pub mod progression;
pub mod state;
pub mod tick;
pub mod volume;

pub use autopilot::autopilot;
pub use collision::{CollisionVolumes, vehicle_box};
pub use input::{InputIntent, Key};
pub use level::{ArenaBounds, CatalogError, Footprint, LevelCatalog, LevelDefinition, Obstacle};
pub use progression::{Command, Progression, ProgressionState, Signal};
pub use state::VehicleState;
pub use tick::{SimEvent, StepOutcome, exceeds_crash_speed, step};
pub use volume::Aabb;
