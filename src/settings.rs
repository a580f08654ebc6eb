//! Gameplay tuning and settings
//!
//! Speeds, timings and projectile parameters are data-driven; the snow growth
//! rules and map layout stay in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-avatar movement and throwing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarTuning {
    /// Distance covered per frame at full intent
    pub move_speed: f32,
    /// Launch speed of a fully charged snowball
    pub throw_speed: f32,
}

/// Gameplay constants that can be tweaked without changing the rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub steve: AvatarTuning,
    pub alex: AvatarTuning,
    /// Upper bound on per-frame movement after slowdowns
    pub max_move_speed: f32,
    /// Seconds of holding needed for a full charge
    pub max_charge_time: f32,
    /// Fraction of throw speed an uncharged throw still gets
    pub min_throw_fraction: f32,
    /// Duration of one snow growth animation (seconds)
    pub snow_grow_duration: f32,
    pub snowball_radius: f32,
    pub snowball_max_lifetime: f32,
    /// Vertical acceleration applied to snowballs
    pub gravity: f32,
    /// Spawn distance in front of the thrower
    pub launch_forward: f32,
    /// Spawn height above the thrower's origin
    pub launch_up: f32,
    /// Upward bias added to the facing direction on release
    pub launch_lift: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            steve: AvatarTuning {
                move_speed: 0.085,
                throw_speed: 13.0,
            },
            alex: AvatarTuning {
                move_speed: 0.085,
                throw_speed: 13.0,
            },
            max_move_speed: 1.5,
            max_charge_time: 1.0,
            min_throw_fraction: 0.3,
            snow_grow_duration: 1.5,
            snowball_radius: 0.15,
            snowball_max_lifetime: 5.0,
            gravity: -9.8,
            launch_forward: 1.0,
            launch_up: 0.5,
            launch_lift: 0.3,
        }
    }
}

/// Top-level settings: tuning plus demo driver parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    /// Seed for the demo-mode driver
    pub seed: u64,
    /// Ticks the headless demo runs before giving up on a winner
    pub demo_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            seed: 0x5EED,
            demo_ticks: 60 * 120,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
