//! Parksim - A 3D parking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (levels, vehicle kinematics, collisions, progression)
//! - `game`: Frame-driven controller the presentation layer talks to
//! - `platform`: Browser bindings for the controller

pub mod game;
pub mod platform;
pub mod sim;

pub use game::{Game, Hud};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (a stalled clock must not teleport the car)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Vehicle body
    pub const RIDE_HEIGHT: f32 = 0.5;
    pub const VEHICLE_WIDTH: f32 = 1.6;
    pub const VEHICLE_LENGTH: f32 = 3.0;
    pub const VEHICLE_HEIGHT: f32 = 1.4;
    /// Collision box depth relative to the visual body
    pub const VEHICLE_COLLISION_DEPTH_SCALE: f32 = 0.7;

    /// Longitudinal dynamics (units/s²)
    pub const FORWARD_ACCEL: f32 = 22.0;
    pub const REVERSE_ACCEL: f32 = -16.0;
    pub const BRAKE_DECEL: f32 = 35.0;
    /// Rolling friction with no pedal held
    pub const COAST_DAMPING: f32 = 8.0;
    /// Drag while a pedal (throttle, reverse or brake) is held
    pub const PEDAL_DAMPING: f32 = 5.0;

    /// Speed limits (units/s)
    pub const MAX_FORWARD_SPEED: f32 = 24.0;
    pub const MAX_REVERSE_SPEED: f32 = 10.0;
    /// Anything faster than this is treated as a crash
    pub const CRASH_SPEED: f32 = 35.0;

    /// Steering
    pub const TURN_RATE: f32 = 1.7; // rad/s at full authority
    pub const FULL_STEER_SPEED: f32 = 10.0;

    /// Collision response (velocity multiplier after a hit)
    pub const WALL_RESTITUTION: f32 = -0.3;
    pub const OBSTACLE_RESTITUTION: f32 = -0.4;

    /// Nominal footprints are shrunk by this much per side before testing
    pub const VOLUME_MARGIN: f32 = 0.4;
    pub const ARENA_WALL_HEIGHT: f32 = 2.0;
    pub const GOAL_MARKER_HEIGHT: f32 = 2.0;

    /// Parking tolerances
    pub const PARKED_SPEED: f32 = 1.2;
    pub const PARKED_HEADING_TOLERANCE: f32 = 0.3; // radians
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Absolute angular distance between two headings, in [0, π]
#[inline]
pub fn heading_error(heading: f32, target: f32) -> f32 {
    normalize_angle(heading - target).abs()
}

/// Unit vector on the XZ plane a vehicle with this heading drives along
#[inline]
pub fn forward_vector(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
