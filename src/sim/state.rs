//! Vehicle state owned by the simulation step
//!
//! A plain value: the controller hands it to `tick::step` and gets the next
//! one back. Nothing here refers to a scene node or render handle.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::LevelDefinition;
use crate::consts::RIDE_HEIGHT;
use crate::{forward_vector, normalize_angle};

/// Pose, speed and per-level counters of the player's car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// World position; y stays at ride height
    pub position: Vec3,
    /// Radians, 0 faces +z (not wrapped; compare with `wrapped_heading`)
    pub heading: f32,
    /// Signed speed along the heading (positive = forward)
    pub velocity: f32,
    /// Seconds spent in the current level
    pub elapsed: f32,
    /// Collisions (and crashes) in the current level
    pub bumps: u32,
}

impl VehicleState {
    /// Car parked at the level's start pose with fresh counters
    pub fn spawn(level: &LevelDefinition) -> Self {
        Self {
            position: Vec3::new(level.start_position.x, RIDE_HEIGHT, level.start_position.z),
            heading: level.start_heading,
            velocity: 0.0,
            elapsed: 0.0,
            bumps: 0,
        }
    }

    /// Back to the start pose after a crash; the clock keeps running and the
    /// crash counts as a bump
    pub fn respawn_after_crash(&self, level: &LevelDefinition) -> Self {
        Self {
            elapsed: self.elapsed,
            bumps: self.bumps + 1,
            ..Self::spawn(level)
        }
    }

    /// Heading in (-π, π]
    pub fn wrapped_heading(&self) -> f32 {
        normalize_angle(self.heading)
    }

    /// Heading in degrees, [0, 360), for HUD compasses
    pub fn heading_degrees(&self) -> f32 {
        let deg = self.wrapped_heading() * 180.0 / PI;
        if deg < 0.0 { deg + 360.0 } else { deg }
    }

    /// Unit vector the car drives along
    pub fn forward(&self) -> Vec3 {
        forward_vector(self.heading)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.abs()
    }
}
