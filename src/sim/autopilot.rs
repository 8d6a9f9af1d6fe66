//! Demo driver
//!
//! Produces intents that roll the car toward the bay along its current
//! heading: forward if the bay is ahead, reverse if it is behind, easing off
//! and braking so it stops inside. It only steers to hold the bay's heading, so
//! it parks straight-line levels and gives up politely on the rest.

use super::collision::CollisionVolumes;
use super::input::InputIntent;
use super::level::LevelDefinition;
use super::state::VehicleState;
use crate::consts::*;
use crate::normalize_angle;

/// Distance inside which the autopilot aims to be at a crawl
const STOP_WINDOW: f32 = 0.5;
/// Highest speed the demo drives at
const CRUISE_SPEED: f32 = 8.0;
/// Comfortable deceleration to plan stops with (brake plus drag, with slack)
const PLANNING_DECEL: f32 = 20.0;

/// Intent for the next tick
pub fn autopilot(
    state: &VehicleState,
    level: &LevelDefinition,
    volumes: &CollisionVolumes,
) -> InputIntent {
    let mut intent = InputIntent::default();

    let to_goal = volumes.goal.center - state.position;
    // Signed distance along the car's axis; negative means the bay is behind
    let along = to_goal.dot(state.forward());
    let remaining = (along.abs() - STOP_WINDOW).max(0.0);

    // Fastest speed from which a planned stop still lands in the bay
    let target_speed = (2.0 * PLANNING_DECEL * remaining).sqrt().min(CRUISE_SPEED);
    let direction = if along >= 0.0 { 1.0 } else { -1.0 };
    let speed_toward = state.velocity * direction;

    if remaining <= 0.0 || speed_toward > target_speed + 0.5 {
        intent.brake = state.velocity != 0.0;
    } else if speed_toward < target_speed {
        if direction > 0.0 {
            intent.forward = true;
        } else {
            intent.backward = true;
        }
    }

    // Hold the bay's heading while rolling; left always raises heading
    let error = normalize_angle(level.goal_heading - state.heading);
    if error.abs() > 0.02 && state.velocity.abs() > 0.1 {
        intent.left = error > 0.0;
        intent.right = error < 0.0;
    }

    intent
}

/// Rough upper bound on how long a straight-line park should take
pub fn time_budget(level: &LevelDefinition) -> f32 {
    let diagonal = (level.arena.width.powi(2) + level.arena.depth.powi(2)).sqrt();
    diagonal / CRUISE_SPEED * 3.0 + MAX_FORWARD_SPEED / BRAKE_DECEL
}
