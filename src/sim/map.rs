//! Static arena geometry
//!
//! Two 10x5 ground rectangles separated by an empty 5-cell buffer, ringed by a
//! wall five blocks high. Everything here is built once and only read.

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// A fixed-size cube used as collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub center: Vec3,
    pub size: f32,
}

impl Block {
    pub fn new(center: Vec3, size: f32) -> Self {
        Self { center, size }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.center, self.size)
    }
}

/// Inclusive rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl GroundRect {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    pub fn contains_cell(&self, cell: IVec2) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// True for cells on the rectangle's outer ring
    pub fn is_edge_cell(&self, cell: IVec2) -> bool {
        self.contains_cell(cell)
            && (cell.x == self.min.x
                || cell.x == self.max.x
                || cell.y == self.min.y
                || cell.y == self.max.y)
    }

    /// Half-open world-space containment on x/z
    pub fn contains_world(&self, x: f32, z: f32) -> bool {
        let (min, max) = self.world_extents();
        x >= min.x && x < max.x && z >= min.y && z < max.y
    }

    /// World-space (min, max) corners on the x/z plane
    pub fn world_extents(&self) -> (glam::Vec2, glam::Vec2) {
        let min = self.min.as_vec2() * CELL_SIZE;
        let max = (self.max + IVec2::ONE).as_vec2() * CELL_SIZE;
        (min, max)
    }

    /// Clamp a world position onto the nearest cell centre inside the rectangle
    pub fn clamp_world(&self, x: f32, z: f32) -> (f32, f32) {
        let (min, max) = self.world_extents();
        let half = CELL_SIZE / 2.0;
        (
            x.clamp(min.x + half, max.x - half),
            z.clamp(min.y + half, max.y - half),
        )
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn depth(&self) -> i32 {
        self.max.y - self.min.y + 1
    }
}

/// Which of the two ground rectangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundSide {
    Front,
    Back,
}

/// Grid of ground blocks covering one rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    pub rect: GroundRect,
    pub blocks: Vec<Block>,
}

impl Ground {
    pub fn new(rect: GroundRect) -> Self {
        let mut blocks = Vec::with_capacity((rect.width() * rect.depth()) as usize);
        for x in rect.min.x..=rect.max.x {
            for z in rect.min.y..=rect.max.y {
                let center = Vec3::new(
                    (x as f32 + 0.5) * CELL_SIZE,
                    GROUND_TOP - CELL_SIZE / 2.0,
                    (z as f32 + 0.5) * CELL_SIZE,
                );
                blocks.push(Block::new(center, CELL_SIZE));
            }
        }
        Self { rect, blocks }
    }

    /// World-space footprint of the whole ground
    pub fn bounds(&self) -> Aabb {
        let (min, max) = self.rect.world_extents();
        Aabb::new(
            Vec3::new(min.x, GROUND_TOP - CELL_SIZE, min.y),
            Vec3::new(max.x, GROUND_TOP, max.y),
        )
    }
}

/// Ring of wall blocks around the map footprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wall {
    pub blocks: Vec<Block>,
}

impl Wall {
    pub fn add_block(&mut self, center: Vec3, size: f32) {
        self.blocks.push(Block::new(center, size));
    }

    /// Row of blocks along +x starting at `start_x`
    pub fn add_row_x(&mut self, start_x: f32, y: f32, z: f32, length: i32, size: f32) {
        for i in 0..length {
            self.add_block(Vec3::new(start_x + i as f32 * size, y, z), size);
        }
    }

    /// Row of blocks along +z starting at `start_z`
    pub fn add_row_z(&mut self, x: f32, y: f32, start_z: f32, length: i32, size: f32) {
        for i in 0..length {
            self.add_block(Vec3::new(x, y, start_z + i as f32 * size), size);
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First wall block overlapping `aabb`
    pub fn first_overlap(&self, aabb: &Aabb) -> Option<&Block> {
        self.blocks.iter().find(|b| b.aabb().intersects(aabb))
    }
}

/// The complete static arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub front: Ground,
    pub back: Ground,
    pub wall: Wall,
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    pub fn new() -> Self {
        let front = Ground::new(GroundRect::new(
            IVec2::new(0, 0),
            IVec2::new(MAP_WIDTH - 1, GROUND_DEPTH - 1),
        ));
        let back = Ground::new(GroundRect::new(
            IVec2::new(0, BACK_GROUND_Z),
            IVec2::new(MAP_WIDTH - 1, BACK_GROUND_Z + GROUND_DEPTH - 1),
        ));

        // Wall blocks sit flush against the footprint, first layer resting
        // on the ground top.
        let mut wall = Wall::default();
        let half = CELL_SIZE / 2.0;
        for layer in 0..WALL_HEIGHT {
            let y = GROUND_TOP + half + layer as f32 * CELL_SIZE;
            let left = -half;
            let right = MAP_WIDTH as f32 * CELL_SIZE + half;
            let near = -half;
            let far = MAP_DEPTH as f32 * CELL_SIZE + half;

            wall.add_row_x(left, y, near, MAP_WIDTH + 2, CELL_SIZE);
            wall.add_row_x(left, y, far, MAP_WIDTH + 2, CELL_SIZE);
            wall.add_row_z(left, y, half, MAP_DEPTH, CELL_SIZE);
            wall.add_row_z(right, y, half, MAP_DEPTH, CELL_SIZE);
        }

        Self { front, back, wall }
    }

    pub fn ground(&self, side: GroundSide) -> &Ground {
        match side {
            GroundSide::Front => &self.front,
            GroundSide::Back => &self.back,
        }
    }

    pub fn ground_rects(&self) -> [GroundRect; 2] {
        [self.front.rect, self.back.rect]
    }

    /// Whether `aabb` touches any wall block
    pub fn hits_wall(&self, aabb: &Aabb) -> bool {
        self.wall.first_overlap(aabb).is_some()
    }

    /// Snowball-sized retention box: the footprint plus a margin on x/z
    pub fn in_extended_bounds(&self, p: Vec3) -> bool {
        let w = MAP_WIDTH as f32 * CELL_SIZE;
        let d = MAP_DEPTH as f32 * CELL_SIZE;
        p.x >= -BOUNDS_MARGIN
            && p.x <= w + BOUNDS_MARGIN
            && p.z >= -BOUNDS_MARGIN
            && p.z <= d + BOUNDS_MARGIN
    }

    /// Snap an impact point onto the nearest playable ground cell
    ///
    /// Points over the buffer zone go to whichever rectangle is closer.
    pub fn clamp_to_ground(&self, x: f32, z: f32) -> (f32, f32) {
        let front = self.front.rect.world_extents();
        let back = self.back.rect.world_extents();
        let split = (front.1.y + back.0.y) / 2.0;
        if z < split {
            self.front.rect.clamp_world(x, z)
        } else {
            self.back.rect.clamp_world(x, z)
        }
    }
}
