//! Collision volumes derived from level data
//!
//! Everything here is horizontal: the car never leaves the floor, so the
//! checks compare XZ footprints only. Nominal footprints are shrunk a little
//! so grazing a parked car or the bay lines does not count.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::LevelDefinition;
use super::volume::Aabb;
use crate::consts::*;

/// Per-level collision geometry, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionVolumes {
    /// Region the vehicle *center* must stay inside
    pub boundary: Aabb,
    /// One volume per obstacle, in catalog order
    pub obstacles: Vec<Aabb>,
    /// Region the vehicle center must reach to park
    pub goal: Aabb,
}

impl CollisionVolumes {
    /// Derive the volumes for a level
    pub fn build(level: &LevelDefinition) -> Self {
        let arena = level.arena;
        let boundary = Aabb::new(
            Vec3::new(0.0, ARENA_WALL_HEIGHT / 2.0, 0.0),
            Vec3::new(
                arena.width / 2.0 - VEHICLE_WIDTH / 2.0,
                ARENA_WALL_HEIGHT / 2.0,
                arena.depth / 2.0 - VEHICLE_LENGTH / 2.0,
            ),
        );

        let obstacles = level
            .obstacles
            .iter()
            .map(|o| {
                let center = Vec3::new(o.position.x, o.position.y + o.height / 2.0, o.position.z);
                Aabb::from_size(center, o.footprint.width, o.height, o.footprint.depth)
                    .shrink_horizontal(VOLUME_MARGIN)
            })
            .collect();

        let goal_center = Vec3::new(
            level.goal_position.x,
            level.goal_position.y + GOAL_MARKER_HEIGHT / 2.0,
            level.goal_position.z,
        );
        let goal = Aabb::from_size(
            goal_center,
            level.goal_footprint.width,
            GOAL_MARKER_HEIGHT,
            level.goal_footprint.depth,
        )
        .shrink_horizontal(VOLUME_MARGIN);

        Self {
            boundary,
            obstacles,
            goal,
        }
    }

    /// Vehicle center is still inside the drivable interior
    #[inline]
    pub fn in_bounds(&self, position: Vec3) -> bool {
        self.boundary.contains_xz(position)
    }

    /// Index of the first obstacle the vehicle box at `position` overlaps
    pub fn obstacle_hit(&self, position: Vec3) -> Option<usize> {
        let car = vehicle_box(position);
        self.obstacles.iter().position(|o| car.intersects_xz(o))
    }

    /// Vehicle center lies inside the parking bay
    #[inline]
    pub fn in_goal(&self, position: Vec3) -> bool {
        self.goal.contains_xz(position)
    }
}

/// Collision box for the car centered at `position`
///
/// The box is axis-aligned and does not rotate with heading. Its depth is
/// trimmed relative to the visual body so nose-to-tail parking is possible.
pub fn vehicle_box(position: Vec3) -> Aabb {
    Aabb::from_size(
        position,
        VEHICLE_WIDTH,
        VEHICLE_HEIGHT,
        VEHICLE_LENGTH * VEHICLE_COLLISION_DEPTH_SCALE,
    )
}
