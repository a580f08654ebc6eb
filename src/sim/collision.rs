//! Collision detection for boxy geometry
//!
//! Everything in the arena is an axis-aligned box: wall and ground blocks,
//! snow columns and avatar bounds. Snowballs are spheres tested against those
//! boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box from a centre point and half extents
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Cube of edge `size` centred at `center`
    pub fn cube(center: Vec3, size: f32) -> Self {
        Self::from_center(center, Vec3::splat(size / 2.0))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Inclusive point containment
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Inclusive overlap test (touching faces count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Overlap on the horizontal (x/z) plane only
    pub fn intersects_xz(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

/// Sphere-vs-box using the closest point on the box
///
/// Hits when the distance from the sphere centre to the box is at most the
/// radius, so a sphere resting exactly on a face counts.
#[inline]
pub fn sphere_hits_aabb(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    aabb.closest_point(center).distance_squared(center) <= radius * radius
}

/// Bounding box of a sphere
#[inline]
pub fn sphere_bounds(center: Vec3, radius: f32) -> Aabb {
    Aabb::from_center(center, Vec3::splat(radius))
}
