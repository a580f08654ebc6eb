//! Snowball Fight - a two-player voxel snowball fight
//!
//! Core modules:
//! - `sim`: Deterministic simulation (avatars, snowballs, snow field, match flow)
//! - `renderer`: Render-facing instance data built from the simulation state
//! - `settings`: Data-driven gameplay tuning

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (16 ms frame timer)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Map footprint in cells
    pub const MAP_WIDTH: i32 = 10;
    pub const MAP_DEPTH: i32 = 15;
    /// Depth of each ground rectangle (front and back)
    pub const GROUND_DEPTH: i32 = 5;
    /// First cell row of the back ground rectangle
    pub const BACK_GROUND_Z: i32 = 10;
    /// Edge length of a block / snow cell
    pub const CELL_SIZE: f32 = 1.0;
    /// Top face of the ground blocks
    pub const GROUND_TOP: f32 = 0.5;
    /// Stacked wall height in blocks
    pub const WALL_HEIGHT: i32 = 5;

    /// Height added by one deposit
    pub const SNOW_INCREMENT: f32 = 0.5;
    /// Maximum committed column height
    pub const SNOW_MAX_HEIGHT: f32 = 3.0;
    /// Neighbour height that allows growth away from the walls
    pub const SNOW_SUPPORT_HEIGHT: f32 = 1.0;
    /// Snow at or above this blocks movement
    pub const DEEP_SNOW_HEIGHT: f32 = 1.0;
    /// Snow at or above this (and below deep) halves movement speed
    pub const SHALLOW_SNOW_HEIGHT: f32 = 0.5;

    /// Extra padding around wall blocks for snowball hits
    pub const WALL_HIT_MARGIN: f32 = 0.1;
    /// Snowballs further than this outside the footprint are dropped
    pub const BOUNDS_MARGIN: f32 = 2.0;

    /// Arm/leg swing per frame while running (radians)
    pub const LIMB_SWING_STEP: f32 = 0.05;
    /// Swing amplitude (radians, 60 degrees)
    pub const LIMB_SWING_LIMIT: f32 = std::f32::consts::PI / 3.0;
    /// Arm recovery per frame after a throw (radians)
    pub const ARM_LOWER_STEP: f32 = 0.25;
}

/// Ease-out quartic: fast start, soft landing
#[inline]
pub fn ease_out_quart(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(4)
}

/// Quadratic ease-in-out
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
