//! Axis-aligned box geometry for arena walls, obstacles and parking bays
//!
//! A box is stored as center + half-extents. Gameplay tests only look at the
//! horizontal (XZ) footprint; the vertical extent is kept so a full 3D
//! containment check can be layered on later.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Box center in world space
    pub center: Vec3,
    /// Half-size along each axis (never negative)
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.max(Vec3::ZERO),
        }
    }

    /// Box from a full-size footprint (width along X, height along Y, depth along Z)
    pub fn from_size(center: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self::new(center, Vec3::new(width, height, depth) * 0.5)
    }

    /// Pull the horizontal faces inward by `margin` (clamped at zero size)
    pub fn shrink_horizontal(self, margin: f32) -> Self {
        Self::new(self.center, self.half_extents - Vec3::new(margin, 0.0, margin))
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Whether the point's XZ projection lies inside (edges inclusive)
    #[inline]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.z >= min.z && point.z <= max.z
    }

    /// Whether the XZ footprints of two boxes overlap (touching counts)
    #[inline]
    pub fn intersects_xz(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        !(a_max.x < b_min.x || a_min.x > b_max.x || a_max.z < b_min.z || a_min.z > b_max.z)
    }

    /// Full 3D point containment
    pub fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// True if the box has zero extent along X or Z
    pub fn is_degenerate_xz(&self) -> bool {
        self.half_extents.x <= 0.0 || self.half_extents.z <= 0.0
    }
}
