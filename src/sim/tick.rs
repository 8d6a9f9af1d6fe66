//! Per-frame vehicle simulation step
//!
//! Integrates the car's longitudinal speed and heading, moves it, resolves
//! wall and obstacle hits, then checks whether it is parked. Runs once per
//! rendered frame with a caller-clamped `dt`.

use super::collision::CollisionVolumes;
use super::input::InputIntent;
use super::level::LevelDefinition;
use super::state::VehicleState;
use crate::consts::*;
use crate::heading_error;

/// What a tick reports back to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimEvent {
    #[default]
    None,
    /// Stopped inside the bay, lined up with it
    Arrived,
    /// Speed blew past the crash threshold; reset the car
    Crashed,
}

/// Result of advancing the vehicle by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: VehicleState,
    pub event: SimEvent,
}

/// Strictly faster than the crash threshold, in either direction
#[inline]
pub fn exceeds_crash_speed(velocity: f32) -> bool {
    velocity.abs() > CRASH_SPEED
}

/// Move `value` toward zero by `amount` without crossing it
#[inline]
fn approach_zero(value: f32, amount: f32) -> f32 {
    if value.abs() <= amount {
        0.0
    } else {
        value - amount * value.signum()
    }
}

/// A crash outranks parking: a car that is out of control never counts as parked
fn resolve_event(over_speed: bool, parked: bool) -> SimEvent {
    if over_speed {
        SimEvent::Crashed
    } else if parked {
        SimEvent::Arrived
    } else {
        SimEvent::None
    }
}

/// Advance the vehicle by `dt` seconds
///
/// `dt` must be small and positive; the controller clamps it.
pub fn step(
    mut state: VehicleState,
    intent: &InputIntent,
    level: &LevelDefinition,
    volumes: &CollisionVolumes,
    dt: f32,
) -> StepOutcome {
    state.elapsed += dt;
    let mut velocity = state.velocity;

    // Throttle / reverse
    let accel = if intent.forward {
        FORWARD_ACCEL
    } else if intent.backward {
        REVERSE_ACCEL
    } else {
        0.0
    };
    velocity += accel * dt;

    // Brake
    let mut braked_to_stop = false;
    if intent.brake {
        let bite = BRAKE_DECEL * dt;
        if velocity.abs() < bite {
            velocity = 0.0;
            braked_to_stop = true;
        } else {
            velocity -= bite * velocity.signum();
        }
    }

    // Reverse is always capped; holding reverse also caps forward speed
    let top_speed = if intent.backward {
        MAX_REVERSE_SPEED
    } else {
        MAX_FORWARD_SPEED
    };
    velocity = velocity.clamp(-MAX_REVERSE_SPEED, top_speed);

    // Friction / drag
    if !braked_to_stop {
        let damping = if intent.pedal_held() {
            PEDAL_DAMPING
        } else {
            COAST_DAMPING
        };
        velocity = approach_zero(velocity, damping * dt);
    }
    let mut over_speed = exceeds_crash_speed(velocity);

    // Steering authority grows with speed; a parked car cannot turn on the spot
    let authority = (velocity.abs() / FULL_STEER_SPEED).min(1.0);
    state.heading += intent.steer_axis() * TURN_RATE * authority * dt;

    let pre_move = state.position;
    state.position += state.forward() * velocity * dt;

    if !volumes.in_bounds(state.position) {
        state.position = pre_move;
        velocity *= WALL_RESTITUTION;
        state.bumps += 1;
        log::debug!("Wall bump #{} (v -> {:.2})", state.bumps, velocity);
    }

    if let Some(index) = volumes.obstacle_hit(state.position) {
        state.position = pre_move;
        velocity *= OBSTACLE_RESTITUTION;
        state.bumps += 1;
        log::debug!(
            "Obstacle {} bump #{} (v -> {:.2})",
            index,
            state.bumps,
            velocity
        );
    }
    over_speed |= exceeds_crash_speed(velocity);

    let parked = volumes.in_goal(state.position)
        && velocity.abs() < PARKED_SPEED
        && heading_error(state.heading, level.goal_heading) < PARKED_HEADING_TOLERANCE;

    let event = resolve_event(over_speed, parked);
    if event == SimEvent::Arrived {
        velocity = 0.0;
    }
    state.velocity = velocity;

    StepOutcome { state, event }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{ArenaBounds, Footprint, Obstacle};
    use glam::Vec3;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    const DT: f32 = 1.0 / 60.0;

    fn level(width: f32, depth: f32) -> LevelDefinition {
        LevelDefinition {
            id: 0,
            name: "Test Lot".to_string(),
            start_position: Vec3::ZERO,
            start_heading: 0.0,
            goal_position: Vec3::new(0.0, 0.0, -(depth / 2.0) + 4.0),
            goal_heading: 0.0,
            goal_footprint: Footprint::new(4.0, 6.0),
            obstacles: Vec::new(),
            arena: ArenaBounds { width, depth },
        }
    }

    fn car(position: Vec3, heading: f32, velocity: f32) -> VehicleState {
        VehicleState {
            position: Vec3::new(position.x, RIDE_HEIGHT, position.z),
            heading,
            velocity,
            elapsed: 0.0,
            bumps: 0,
        }
    }

    fn run(
        state: VehicleState,
        intent: InputIntent,
        level: &LevelDefinition,
        dt: f32,
    ) -> StepOutcome {
        let volumes = CollisionVolumes::build(level);
        step(state, &intent, level, &volumes, dt)
    }

    #[test]
    fn test_throttle_accelerates_with_drag() {
        let lot = level(40.0, 30.0);
        let intent = InputIntent {
            forward: true,
            ..Default::default()
        };
        let out = run(car(Vec3::ZERO, 0.0, 0.0), intent, &lot, 0.1);
        // +2.2 from throttle, -0.5 pedal drag
        assert!((out.state.velocity - 1.7).abs() < 1e-5);
        assert!(out.state.position.z > 0.0);
        assert_eq!(out.event, SimEvent::None);
        assert!((out.state.elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_huge_heading_in_bay_still_steps() {
        let lot = level(40.0, 30.0);
        let bay = Vec3::new(0.0, 0.0, -11.0);
        let out = run(car(bay, 1e9, 0.0), InputIntent::default(), &lot, DT);
        assert_eq!(out.state.position.z, -11.0);
        assert!((out.state.elapsed - DT).abs() < 1e-6);
    }

    #[test]
    fn test_forward_speed_capped() {
        let lot = level(40.0, 30.0);
        let intent = InputIntent {
            forward: true,
            ..Default::default()
        };
        let out = run(car(Vec3::ZERO, 0.0, 24.0), intent, &lot, 0.1);
        assert!((out.state.velocity - 23.5).abs() < 1e-4);
    }

    #[test]
    fn test_reverse_speed_capped() {
        let lot = level(40.0, 30.0);
        let intent = InputIntent {
            backward: true,
            ..Default::default()
        };
        let out = run(car(Vec3::ZERO, 0.0, -9.9), intent, &lot, 0.1);
        assert!((out.state.velocity - -9.5).abs() < 1e-4);

        // Holding reverse while rolling forward fast clamps to +10 first
        let out = run(car(Vec3::ZERO, 0.0, 20.0), intent, &lot, 0.1);
        assert!((out.state.velocity - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_brake_slows_then_snaps_to_zero() {
        let lot = level(40.0, 30.0);
        let intent = InputIntent {
            brake: true,
            ..Default::default()
        };
        let out = run(car(Vec3::ZERO, 0.0, 10.0), intent, &lot, 0.1);
        // -3.5 brake, -0.5 pedal drag
        assert!((out.state.velocity - 6.0).abs() < 1e-4);

        let out = run(car(Vec3::ZERO, 0.0, -1.0), intent, &lot, 0.1);
        assert_eq!(out.state.velocity, 0.0);
        assert_eq!(out.state.position.z, 0.0);
    }

    #[test]
    fn test_steering_scales_with_speed() {
        let lot = level(40.0, 30.0);
        let left = InputIntent {
            left: true,
            ..Default::default()
        };

        // Standing still: no turn
        let out = run(car(Vec3::ZERO, 0.0, 0.0), left, &lot, 0.1);
        assert_eq!(out.state.heading, 0.0);

        // 5 -> 4.2 after coast friction, authority 0.42
        let out = run(car(Vec3::ZERO, 0.0, 5.0), left, &lot, 0.1);
        assert!((out.state.heading - 1.7 * 0.42 * 0.1).abs() < 1e-5);

        // Full authority above 10 units/s, right turns negative
        let right = InputIntent {
            right: true,
            ..Default::default()
        };
        let out = run(car(Vec3::ZERO, 0.0, 20.0), right, &lot, 0.1);
        assert!((out.state.heading + 0.17).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_reverts_and_bounces() {
        let lot = level(40.0, 30.0);
        // Boundary interior ends at z = 13.5
        let start = car(Vec3::new(0.0, 0.0, 13.4), 0.0, 5.0);
        let out = run(start, InputIntent::default(), &lot, 0.1);

        assert_eq!(out.state.position, start.position);
        // 5 -> 4.2 after friction, then * -0.3
        assert!((out.state.velocity - 4.2 * -0.3).abs() < 1e-5);
        assert_eq!(out.state.bumps, 1);
    }

    #[test]
    fn test_boundary_bounces_decay_to_rest() {
        // A sliver of an arena: any motion along z leaves the interior
        let mut lot = level(40.0, 3.02);
        lot.goal_position = Vec3::new(15.0, 0.0, 0.0);
        lot.goal_footprint = Footprint::new(4.0, 3.0);

        let mut state = car(Vec3::ZERO, 0.0, 10.0);
        let origin = state.position;
        let mut last_speed = state.velocity.abs();
        for _ in 0..20 {
            state = run(state, InputIntent::default(), &lot, 0.1).state;
            assert_eq!(state.position, origin);
            assert!(state.velocity.abs() <= last_speed);
            last_speed = state.velocity.abs();
        }
        assert_eq!(state.velocity, 0.0);
        assert!(state.bumps >= 2);
    }

    #[test]
    fn test_obstacle_hit_restitution() {
        let mut lot = level(40.0, 30.0);
        lot.obstacles.push(Obstacle {
            position: Vec3::new(0.0, 0.0, 3.0),
            footprint: Footprint::new(4.0, 2.0),
            height: 1.5,
        });

        // 20.8 coasts down to 20 this tick, which would carry the car to z = 2
        let start = car(Vec3::ZERO, 0.0, 20.8);
        let out = run(start, InputIntent::default(), &lot, 0.1);

        assert_eq!(out.state.position, start.position);
        assert!((out.state.velocity - -8.0).abs() < 1e-4);
        assert_eq!(out.state.bumps, 1);
        assert_eq!(out.event, SimEvent::None);
    }

    #[test]
    fn test_wall_and_obstacle_in_same_tick() {
        let mut lot = level(40.0, 30.0);
        // Obstacle overlapping the car's current spot; the wall check reverts
        // first and the obstacle check fires on the reverted position
        lot.obstacles.push(Obstacle {
            position: Vec3::new(0.0, 0.0, 14.0),
            footprint: Footprint::new(4.0, 2.0),
            height: 1.5,
        });
        let start = car(Vec3::new(0.0, 0.0, 13.4), 0.0, 5.0);
        let out = run(start, InputIntent::default(), &lot, 0.1);

        assert_eq!(out.state.position, start.position);
        assert_eq!(out.state.bumps, 2);
        assert!((out.state.velocity - 4.2 * -0.3 * -0.4).abs() < 1e-5);
    }

    #[test]
    fn test_parked_at_rest_in_bay_arrives() {
        let mut lot = level(40.0, 30.0);
        lot.goal_position = Vec3::ZERO;
        lot.goal_footprint = Footprint::new(6.0, 12.0);

        let out = run(car(Vec3::ZERO, 0.0, 0.0), InputIntent::default(), &lot, DT);
        assert_eq!(out.event, SimEvent::Arrived);
        assert_eq!(out.state.velocity, 0.0);
    }

    #[test]
    fn test_arrival_forces_stop_but_keeps_pose() {
        let mut lot = level(40.0, 30.0);
        lot.goal_position = Vec3::ZERO;
        lot.goal_footprint = Footprint::new(6.0, 12.0);

        // Creeping at 1.0 stays under the 1.2 parked threshold
        let start = car(Vec3::ZERO, 0.1, 1.0);
        let out = run(start, InputIntent::default(), &lot, DT);
        assert_eq!(out.event, SimEvent::Arrived);
        assert_eq!(out.state.velocity, 0.0);
        assert_eq!(out.state.heading, 0.1);
        assert!(out.state.position.z > start.position.z);
    }

    #[test]
    fn test_arrival_needs_all_three_conditions() {
        let mut lot = level(40.0, 30.0);
        lot.goal_position = Vec3::ZERO;
        lot.goal_footprint = Footprint::new(6.0, 12.0);

        // In bay, slow, but crooked
        let out = run(car(Vec3::ZERO, 0.35, 0.0), InputIntent::default(), &lot, DT);
        assert_eq!(out.event, SimEvent::None);

        // In bay, lined up, but still rolling (2.0 -> ~1.87)
        let out = run(car(Vec3::ZERO, 0.0, 2.0), InputIntent::default(), &lot, DT);
        assert_eq!(out.event, SimEvent::None);
        assert!(out.state.velocity > 1.2);

        // Stopped and lined up, but outside the bay (goal spans x in [-2.6, 2.6])
        let out = run(
            car(Vec3::new(5.0, 0.0, 0.0), 0.0, 0.0),
            InputIntent::default(),
            &lot,
            DT,
        );
        assert_eq!(out.event, SimEvent::None);
    }

    #[test]
    fn test_arrival_heading_wraps() {
        let mut lot = level(40.0, 30.0);
        lot.goal_position = Vec3::ZERO;
        lot.goal_footprint = Footprint::new(6.0, 12.0);
        lot.goal_heading = PI;

        // -179° is 1° away from 180°
        let out = run(
            car(Vec3::ZERO, -PI + 0.02, 0.0),
            InputIntent::default(),
            &lot,
            DT,
        );
        assert_eq!(out.event, SimEvent::Arrived);

        lot.goal_heading = 0.0;
        let out = run(car(Vec3::ZERO, TAU - 0.1, 0.0), InputIntent::default(), &lot, DT);
        assert_eq!(out.event, SimEvent::Arrived);
    }

    #[test]
    fn test_crash_threshold_is_strict() {
        assert!(!exceeds_crash_speed(35.0));
        assert!(exceeds_crash_speed(35.0001));
        assert!(exceeds_crash_speed(-35.0001));
        assert!(!exceeds_crash_speed(-35.0));
    }

    #[test]
    fn test_crash_outranks_arrival() {
        assert_eq!(resolve_event(true, true), SimEvent::Crashed);
        assert_eq!(resolve_event(true, false), SimEvent::Crashed);
        assert_eq!(resolve_event(false, true), SimEvent::Arrived);
        assert_eq!(resolve_event(false, false), SimEvent::None);
    }

    #[test]
    fn test_determinism() {
        let lot = level(40.0, 30.0);
        let inputs = [
            InputIntent {
                forward: true,
                left: true,
                ..Default::default()
            },
            InputIntent {
                forward: true,
                ..Default::default()
            },
            InputIntent {
                brake: true,
                right: true,
                ..Default::default()
            },
            InputIntent::default(),
        ];

        let mut a = car(Vec3::ZERO, 0.3, 0.0);
        let mut b = a;
        for _ in 0..50 {
            for input in &inputs {
                a = run(a, *input, &lot, DT).state;
                b = run(b, *input, &lot, DT).state;
            }
        }
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn coasting_never_reverses(
            x in -20.0f32..20.0,
            z in -20.0f32..20.0,
            heading in -PI..PI,
            velocity in -10.0f32..24.0,
            dt in 0.01f32..0.1,
        ) {
            let lot = level(400.0, 400.0);
            let mut state = car(Vec3::new(x, 0.0, z), heading, velocity);

            for _ in 0..400 {
                let before = state.velocity;
                state = run(state, InputIntent::default(), &lot, dt).state;
                prop_assert!(state.velocity.abs() <= before.abs());
                prop_assert!(state.velocity * before >= 0.0);
            }
            prop_assert_eq!(state.bumps, 0);
            prop_assert_eq!(state.velocity, 0.0);
        }

        #[test]
        fn open_floor_translation_always_moves(
            x in -50.0f32..50.0,
            z in -50.0f32..50.0,
            heading in -PI..PI,
            velocity in 1.0f32..24.0,
            dt in 0.001f32..0.1,
        ) {
            let lot = level(200.0, 200.0);
            let start = car(Vec3::new(x, 0.0, z), heading, velocity);
            let intent = InputIntent { forward: true, ..Default::default() };
            let out = run(start, intent, &lot, dt);

            prop_assert_eq!(out.state.bumps, 0);
            prop_assert!(out.state.position != start.position);
            let travelled = (out.state.position - start.position).length();
            prop_assert!((travelled - out.state.velocity * dt).abs() < 1e-3);
        }
    }
}
