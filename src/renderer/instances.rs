//! Instance types handed to a GPU renderer

use bytemuck::{Pod, Zeroable};

/// One snow column: a unit-footprint box standing on the ground
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SnowInstance {
    /// Centre of the column's base
    pub base: [f32; 3],
    pub height: f32,
    pub alpha: f32,
    pub _pad: [f32; 3], // Pad to 32 bytes
}

/// A snowball
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub pos: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// One avatar body part: a unit cube scaled and placed by `model`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PartInstance {
    /// Column-major model matrix, scale included
    pub model: [f32; 16],
    pub part: u32,   // BodyPart discriminant
    pub avatar: u32, // 0 = Steve, 1 = Alex
    pub _pad: [u32; 2],
}

/// Colors for game elements
pub mod colors {
    pub const SNOWBALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
