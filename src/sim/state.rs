//! Match state
//!
//! `MatchState` owns everything one match touches: the arena, the snow
//! field, both avatars and the live snowballs. It is built once per match and
//! passed by reference into [`tick`](super::tick::tick).

use serde::{Deserialize, Serialize};

use super::ai::DemoDriver;
use super::avatar::Avatar;
use super::map::Map;
use super::projectile::{Projectile, ProjectileEvent, Team};
use super::snow::SnowField;
use crate::Tuning;

/// Camera mode chosen on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    FirstPerson,
    ThirdPerson,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for a view mode to be picked
    Title,
    /// Active gameplay
    Playing(ViewMode),
    /// Someone got hit. Terminal until reset.
    Finished { winner: Team },
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchEvent {
    Started(ViewMode),
    Thrown { id: u32, owner: Team },
    ProjectileStopped { id: u32, owner: Team, event: ProjectileEvent },
    /// Snowball `id` struck `target`
    Hit { id: u32, target: Team, winner: Team },
    Reset,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Seed for the demo driver
    pub seed: u64,
    /// Simulation ticks while playing
    pub time_ticks: u64,
    pub phase: MatchPhase,
    pub tuning: Tuning,
    pub map: Map,
    pub snow: SnowField,
    pub steve: Avatar,
    pub alex: Avatar,
    /// Live snowballs, in id order
    pub projectiles: Vec<Projectile>,
    /// Events from the most recent tick
    pub events: Vec<MatchEvent>,
    pub demo: DemoDriver,
    next_id: u32,
}

impl MatchState {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let map = Map::new();
        let snow = SnowField::for_map(&map, tuning.snow_grow_duration);
        Self {
            seed,
            time_ticks: 0,
            phase: MatchPhase::Title,
            steve: Avatar::steve(&tuning),
            alex: Avatar::alex(&tuning),
            map,
            snow,
            projectiles: Vec::new(),
            events: Vec::new(),
            demo: DemoDriver::new(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Back to the title screen with a fresh match
    pub fn reset(&mut self) {
        self.phase = MatchPhase::Title;
        self.time_ticks = 0;
        self.snow.clear();
        self.snow.set_grow_duration(self.tuning.snow_grow_duration);
        self.steve = Avatar::steve(&self.tuning);
        self.alex = Avatar::alex(&self.tuning);
        self.projectiles.clear();
        self.demo = DemoDriver::new(self.seed);
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn avatar(&self, team: Team) -> &Avatar {
        match team {
            Team::Steve => &self.steve,
            Team::Alex => &self.alex,
        }
    }

    pub fn avatar_mut(&mut self, team: Team) -> &mut Avatar {
        match team {
            Team::Steve => &mut self.steve,
            Team::Alex => &mut self.alex,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, MatchPhase::Playing(_))
    }

    pub fn winner(&self) -> Option<Team> {
        match self.phase {
            MatchPhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        match self.phase {
            MatchPhase::Playing(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_match() {
        let state = MatchState::new(Tuning::default(), 1);
        assert_eq!(state.phase, MatchPhase::Title);
        assert!(state.snow.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.steve.pos, Avatar::spawn_point(Team::Steve));
        assert_eq!(state.alex.pos, Avatar::spawn_point(Team::Alex));
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_reset_rebuilds() {
        let mut state = MatchState::new(Tuning::default(), 1);
        state.phase = MatchPhase::Finished { winner: Team::Alex };
        state.steve.pos = Vec3::new(2.0, 1.5, 2.0);
        state.snow.try_deposit(0.5, 0.5);
        let id = state.next_entity_id();
        let tuning = state.tuning.clone();
        state
            .projectiles
            .push(Projectile::new(id, Team::Alex, Vec3::splat(3.0), Vec3::ZERO, &tuning));

        state.reset();
        assert_eq!(state.phase, MatchPhase::Title);
        assert!(state.snow.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.steve.pos, Avatar::spawn_point(Team::Steve));
        assert_eq!(state.next_entity_id(), 1);
    }

    #[test]
    fn test_avatar_lookup() {
        let mut state = MatchState::new(Tuning::default(), 1);
        assert_eq!(state.avatar(Team::Alex).team, Team::Alex);
        state.avatar_mut(Team::Steve).pos.x = 3.0;
        assert_eq!(state.steve.pos.x, 3.0);
    }
}
