//! Accumulating snow field
//!
//! A sparse grid of snow columns standing on the two ground rectangles. Snow
//! only grows against the arena walls or next to a pile that is already at
//! least [`SNOW_SUPPORT_HEIGHT`] tall, so players build fortifications outward
//! from the edges instead of dropping lone columns in the open.
//!
//! Deposits commit a new target height immediately and animate toward it:
//! height eases out (quartic), and brand-new columns fade in.

use std::collections::BTreeMap;

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::map::{GroundRect, Map};
use crate::consts::*;
use crate::{ease_in_out, ease_out_quart};

/// One column of the snow field, addressed by `(gridX, gridZ)` stored as x/y
pub type GridCell = IVec2;

const NEIGHBORS_4: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
];

/// Grid cell containing a world-space x/z position
#[inline]
pub fn world_to_cell(x: f32, z: f32) -> GridCell {
    IVec2::new(
        (x / CELL_SIZE).floor() as i32,
        (z / CELL_SIZE).floor() as i32,
    )
}

/// World-space centre of a cell's footprint at height `y`
#[inline]
pub fn cell_center(cell: GridCell, y: f32) -> Vec3 {
    Vec3::new(
        (cell.x as f32 + 0.5) * CELL_SIZE,
        y,
        (cell.y as f32 + 0.5) * CELL_SIZE,
    )
}

/// Box occupied by a column of the given height
pub fn column_aabb(cell: GridCell, height: f32) -> Aabb {
    let center = cell_center(cell, GROUND_TOP + height / 2.0);
    Aabb::from_center(
        center,
        Vec3::new(CELL_SIZE / 2.0, height / 2.0, CELL_SIZE / 2.0),
    )
}

/// Movement classification of a snow height
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SnowDepth {
    None,
    /// Slows movement
    Shallow,
    /// Blocks movement
    Deep,
}

impl SnowDepth {
    pub fn classify(height: f32) -> Self {
        if height >= DEEP_SNOW_HEIGHT {
            SnowDepth::Deep
        } else if height >= SHALLOW_SNOW_HEIGHT {
            SnowDepth::Shallow
        } else {
            SnowDepth::None
        }
    }
}

/// Animated state of one snow column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnowColumn {
    /// Committed height
    pub target_height: f32,
    /// Animated height, always within `[0, target_height]`
    pub current_height: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub animating: bool,
    /// Fade-in opacity
    pub alpha: f32,
}

impl SnowColumn {
    fn empty(duration: f32) -> Self {
        Self {
            target_height: 0.0,
            current_height: 0.0,
            elapsed: 0.0,
            duration,
            animating: false,
            alpha: 0.0,
        }
    }

    /// Height the current animation started from
    #[inline]
    pub fn start_height(&self) -> f32 {
        (self.target_height - SNOW_INCREMENT).max(0.0)
    }

    /// Step the animation, returning true on the tick it settles
    fn advance(&mut self, dt: f32) -> bool {
        if !self.animating {
            return false;
        }
        self.elapsed += dt;
        let progress = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };

        let start = self.start_height();
        self.current_height = start + (self.target_height - start) * ease_out_quart(progress);
        self.alpha = if start <= 0.0 { ease_in_out(progress) } else { 1.0 };

        if progress >= 1.0 {
            self.animating = false;
            self.current_height = self.target_height;
            self.alpha = 1.0;
            return true;
        }
        false
    }
}

/// Why a deposit did or did not change the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepositOutcome {
    Accepted { cell: GridCell, from: f32, to: f32 },
    /// Position is not over either ground rectangle
    OutsideGround,
    /// Column already at [`SNOW_MAX_HEIGHT`]
    AtCap { cell: GridCell },
    /// Neither wall-adjacent nor next to a supporting pile
    Unsupported { cell: GridCell },
}

impl DepositOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DepositOutcome::Accepted { .. })
    }
}

/// Sparse map from grid cell to animated snow column
#[derive(Debug, Clone)]
pub struct SnowField {
    columns: BTreeMap<(i32, i32), SnowColumn>,
    ground: [GroundRect; 2],
    grow_duration: f32,
}

impl SnowField {
    pub fn new(ground: [GroundRect; 2], grow_duration: f32) -> Self {
        Self {
            columns: BTreeMap::new(),
            ground,
            grow_duration,
        }
    }

    /// Empty field over the map's ground rectangles
    pub fn for_map(map: &Map, grow_duration: f32) -> Self {
        Self::new(map.ground_rects(), grow_duration)
    }

    pub fn set_grow_duration(&mut self, duration: f32) {
        self.grow_duration = duration;
    }

    /// Animated height at a cell, 0 when there is no column
    pub fn height_at(&self, cell: GridCell) -> f32 {
        self.columns
            .get(&(cell.x, cell.y))
            .map(|c| c.current_height)
            .unwrap_or(0.0)
    }

    pub fn height_at_world(&self, x: f32, z: f32) -> f32 {
        self.height_at(world_to_cell(x, z))
    }

    /// Committed height at a cell, 0 when there is no column
    pub fn target_at(&self, cell: GridCell) -> f32 {
        self.columns
            .get(&(cell.x, cell.y))
            .map(|c| c.target_height)
            .unwrap_or(0.0)
    }

    pub fn column(&self, cell: GridCell) -> Option<&SnowColumn> {
        self.columns.get(&(cell.x, cell.y))
    }

    /// Columns in cell order
    pub fn columns(&self) -> impl Iterator<Item = (GridCell, &SnowColumn)> {
        self.columns
            .iter()
            .map(|(&(x, z), column)| (IVec2::new(x, z), column))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Box of the visible column at `cell`, if it has any height yet
    pub fn column_bounds(&self, cell: GridCell) -> Option<Aabb> {
        let height = self.height_at(cell);
        (height > 0.0).then(|| column_aabb(cell, height))
    }

    /// Whether a world position lies over one of the ground rectangles
    pub fn is_valid_ground(&self, x: f32, z: f32) -> bool {
        self.ground.iter().any(|r| r.contains_world(x, z))
    }

    /// Cells on the outer ring of a ground rectangle touch a wall or the
    /// buffer zone
    pub fn is_wall_adjacent(&self, cell: GridCell) -> bool {
        self.ground.iter().any(|r| r.is_edge_cell(cell))
    }

    /// A 4-neighbour already stands at least [`SNOW_SUPPORT_HEIGHT`] tall
    pub fn is_supported_by_neighbor(&self, cell: GridCell) -> bool {
        NEIGHBORS_4
            .iter()
            .any(|&d| self.height_at(cell + d) >= SNOW_SUPPORT_HEIGHT)
    }

    /// Add one increment of snow at a world position if the rules allow it
    pub fn try_deposit(&mut self, x: f32, z: f32) -> DepositOutcome {
        if !self.is_valid_ground(x, z) {
            log::trace!("Deposit at ({x:.2}, {z:.2}) rejected: not over ground");
            return DepositOutcome::OutsideGround;
        }

        let cell = world_to_cell(x, z);
        let previous = self.target_at(cell);
        if previous >= SNOW_MAX_HEIGHT {
            log::trace!("Deposit at {cell} rejected: column at max height");
            return DepositOutcome::AtCap { cell };
        }

        if !self.is_wall_adjacent(cell) && !self.is_supported_by_neighbor(cell) {
            log::trace!("Deposit at {cell} rejected: no wall or supporting pile");
            return DepositOutcome::Unsupported { cell };
        }

        let target = (previous + SNOW_INCREMENT).min(SNOW_MAX_HEIGHT);
        let duration = self.grow_duration;
        let column = self
            .columns
            .entry((cell.x, cell.y))
            .or_insert_with(|| SnowColumn::empty(duration));
        column.target_height = target;
        column.current_height = previous;
        column.elapsed = 0.0;
        column.duration = duration;
        column.animating = true;
        column.alpha = if previous > 0.0 { 1.0 } else { 0.0 };

        log::debug!("Snow at {cell}: {previous} -> {target}");
        DepositOutcome::Accepted {
            cell,
            from: previous,
            to: target,
        }
    }

    /// Advance every growing column
    pub fn tick(&mut self, dt: f32) {
        for (&(x, z), column) in self.columns.iter_mut() {
            if column.advance(dt) {
                log::trace!("Snow at [{x}, {z}] settled at {}", column.target_height);
            }
        }
    }

    /// Remove all snow
    pub fn clear(&mut self) {
        log::debug!("Clearing {} snow columns", self.columns.len());
        self.columns.clear();
    }
}
