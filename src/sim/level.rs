//! Level definitions and the ordered level catalog
//!
//! Levels are plain data. The arena of every level is centered on the world
//! origin: x spans [-width/2, width/2] and z spans [-depth/2, depth/2].

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{CollisionVolumes, vehicle_box};
use super::volume::Aabb;
use crate::consts::*;

/// Horizontal size of a level object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    pub const fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }
}

/// Arena floor size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f32,
    pub depth: f32,
}

impl ArenaBounds {
    /// Whether a footprint centered at `center` lies fully on the arena floor
    pub fn contains_footprint(&self, center: Vec3, footprint: Footprint) -> bool {
        let (hw, hd) = (self.width / 2.0, self.depth / 2.0);
        center.x - footprint.width / 2.0 >= -hw
            && center.x + footprint.width / 2.0 <= hw
            && center.z - footprint.depth / 2.0 >= -hd
            && center.z + footprint.depth / 2.0 <= hd
    }
}

/// A static box the car must not hit (parked cars, pillars, kerbs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
    pub footprint: Footprint,
    pub height: f32,
}

/// One parking challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: u32,
    pub name: String,
    pub start_position: Vec3,
    /// Radians, 0 faces +z
    pub start_heading: f32,
    pub goal_position: Vec3,
    pub goal_heading: f32,
    pub goal_footprint: Footprint,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub arena: ArenaBounds,
}

/// Reasons a catalog is rejected before any tick runs
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("level catalog is empty")]
    Empty,
    #[error("level at position {index} has id {id}; ids must run 0, 1, 2, ...")]
    NonSequentialId { index: usize, id: u32 },
    #[error("level {id}: arena must have positive width and depth")]
    NonPositiveArena { id: u32 },
    #[error("level {id}: goal footprint {width}x{depth} leaves no parking area after margins")]
    NonPositiveGoal { id: u32, width: f32, depth: f32 },
    #[error("level {id}: obstacle {index} must have positive width, depth and height")]
    NonPositiveObstacle { id: u32, index: usize },
    #[error("level {id}: goal footprint extends past the arena bounds")]
    GoalOutOfBounds { id: u32 },
    #[error("level {id}: obstacle {index} extends past the arena bounds")]
    ObstacleOutOfBounds { id: u32, index: usize },
    #[error("level {id}: heading {heading} must be finite and within one turn of zero")]
    InvalidHeading { id: u32, heading: f32 },
    #[error("level {id}: start position is outside the drivable area")]
    StartOutOfBounds { id: u32 },
    #[error("level {id}: start position overlaps obstacle {index}")]
    StartBlocked { id: u32, index: usize },
    #[error("invalid level catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read level catalog: {0}")]
    Io(#[from] std::io::Error),
}

impl LevelDefinition {
    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), CatalogError> {
        let id = self.id;
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.arena.width) || !positive(self.arena.depth) {
            return Err(CatalogError::NonPositiveArena { id });
        }

        for heading in [self.start_heading, self.goal_heading] {
            if !heading.is_finite() || heading.abs() > TAU {
                return Err(CatalogError::InvalidHeading { id, heading });
            }
        }

        let goal = self.goal_footprint;
        let goal_volume = Aabb::from_size(self.goal_position, goal.width, 0.0, goal.depth)
            .shrink_horizontal(VOLUME_MARGIN);
        if goal_volume.is_degenerate_xz() {
            return Err(CatalogError::NonPositiveGoal {
                id,
                width: goal.width,
                depth: goal.depth,
            });
        }
        if !self.arena.contains_footprint(self.goal_position, goal) {
            return Err(CatalogError::GoalOutOfBounds { id });
        }

        for (index, obstacle) in self.obstacles.iter().enumerate() {
            let fp = obstacle.footprint;
            if !positive(fp.width) || !positive(fp.depth) || !positive(obstacle.height) {
                return Err(CatalogError::NonPositiveObstacle { id, index });
            }
            if !self.arena.contains_footprint(obstacle.position, fp) {
                return Err(CatalogError::ObstacleOutOfBounds { id, index });
            }
        }

        let volumes = CollisionVolumes::build(self);
        if !volumes.boundary.contains_xz(self.start_position) {
            return Err(CatalogError::StartOutOfBounds { id });
        }
        let car = vehicle_box(self.start_position);
        if let Some(index) = volumes.obstacles.iter().position(|o| car.intersects_xz(o)) {
            return Err(CatalogError::StartBlocked { id, index });
        }

        Ok(())
    }
}

/// Ordered, validated list of levels
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Validate and wrap a list of levels
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            if level.id as usize != index {
                return Err(CatalogError::NonSequentialId {
                    index,
                    id: level.id,
                });
            }
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level definitions
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<LevelDefinition> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Read a JSON catalog from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin_levels())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

fn obstacle(x: f32, z: f32, width: f32, depth: f32, height: f32) -> Obstacle {
    Obstacle {
        position: Vec3::new(x, 0.0, z),
        footprint: Footprint::new(width, depth),
        height,
    }
}

/// Parked car facing along Z
fn parked_car(x: f32, z: f32) -> Obstacle {
    obstacle(x, z, 2.2, 4.5, 1.5)
}

/// Parked car facing along X
fn parked_car_sideways(x: f32, z: f32) -> Obstacle {
    obstacle(x, z, 4.5, 2.2, 1.5)
}

fn builtin_levels() -> Vec<LevelDefinition> {
    vec![
        // Drive straight down into a bay between two cars
        LevelDefinition {
            id: 0,
            name: "First Bay".to_string(),
            start_position: Vec3::new(0.0, 0.0, 10.0),
            start_heading: PI,
            goal_position: Vec3::new(0.0, 0.0, -8.0),
            goal_heading: PI,
            goal_footprint: Footprint::new(4.0, 7.0),
            obstacles: vec![parked_car(-4.5, -8.0), parked_car(4.5, -8.0)],
            arena: ArenaBounds {
                width: 40.0,
                depth: 30.0,
            },
        },
        // Parallel park along the far kerb, around a barrier
        LevelDefinition {
            id: 1,
            name: "Side Street".to_string(),
            start_position: Vec3::new(-14.0, 0.0, 8.0),
            start_heading: FRAC_PI_2,
            goal_position: Vec3::new(6.0, 0.0, -10.0),
            goal_heading: FRAC_PI_2,
            goal_footprint: Footprint::new(7.0, 4.0),
            obstacles: vec![
                parked_car_sideways(-1.0, -10.0),
                parked_car_sideways(13.0, -10.0),
                obstacle(0.0, 2.0, 10.0, 1.0, 1.0),
            ],
            arena: ArenaBounds {
                width: 44.0,
                depth: 32.0,
            },
        },
        // Back into a walled garage bay
        LevelDefinition {
            id: 2,
            name: "Reverse In".to_string(),
            start_position: Vec3::new(0.0, 0.0, -8.0),
            start_heading: PI,
            goal_position: Vec3::new(0.0, 0.0, 9.0),
            goal_heading: PI,
            goal_footprint: Footprint::new(4.0, 6.0),
            obstacles: vec![
                obstacle(-3.2, 9.0, 1.0, 6.0, 2.0),
                obstacle(3.2, 9.0, 1.0, 6.0, 2.0),
                obstacle(-9.0, 0.0, 2.0, 2.0, 3.0),
                obstacle(9.0, 0.0, 2.0, 2.0, 3.0),
            ],
            arena: ArenaBounds {
                width: 36.0,
                depth: 28.0,
            },
        },
        // Weave through a parking structure to the last free spot
        LevelDefinition {
            id: 3,
            name: "Garage Row".to_string(),
            start_position: Vec3::new(-15.0, 0.0, -13.0),
            start_heading: FRAC_PI_2,
            goal_position: Vec3::new(12.0, 0.0, 12.0),
            goal_heading: 0.0,
            goal_footprint: Footprint::new(4.0, 6.0),
            obstacles: vec![
                obstacle(0.0, 0.0, 14.0, 2.0, 3.0),
                obstacle(-8.0, 8.0, 2.0, 8.0, 3.0),
                obstacle(8.0, -8.0, 2.0, 8.0, 3.0),
                parked_car(8.0, 12.0),
                parked_car(16.0, 12.0),
            ],
            arena: ArenaBounds {
                width: 40.0,
                depth: 34.0,
            },
        },
    ]
}
