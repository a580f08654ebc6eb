//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID, snow by cell)
//! - No rendering or platform dependencies

pub mod ai;
pub mod avatar;
pub mod collision;
pub mod map;
pub mod projectile;
pub mod snow;
pub mod state;
pub mod tick;

pub use ai::DemoDriver;
pub use avatar::{ArmState, Avatar, BodyDims, BodyPart, LegState, PartLayout, Pose};
pub use collision::{Aabb, sphere_hits_aabb};
pub use map::{Block, Ground, GroundRect, GroundSide, Map, Wall};
pub use projectile::{Projectile, ProjectileEvent, Team};
pub use snow::{DepositOutcome, GridCell, SnowColumn, SnowDepth, SnowField};
pub use state::{MatchEvent, MatchPhase, MatchState, ViewMode};
pub use tick::{PlayerInput, TickInput, tick};
