//! Fixed timestep simulation tick
//!
//! Advances a match in a fixed order: snow animation, snowballs, hit tests,
//! then avatars.

use glam::{Vec2, Vec3};

use super::collision::sphere_hits_aabb;
use super::projectile::{Projectile, Team};
use super::state::{MatchEvent, MatchPhase, MatchState, ViewMode};

/// One avatar's commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Movement intent on the x/z plane; zero means standing still
    pub move_dir: Vec2,
    /// New aim direction, if it changed
    pub facing: Option<Vec3>,
    /// Start charging a throw
    pub charge: bool,
    /// Let go of a charged throw
    pub release: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub steve: PlayerInput,
    pub alex: PlayerInput,
    /// Leave the title screen in the given view mode
    pub start: Option<ViewMode>,
    /// Return from a finished match to the title screen
    pub reset: bool,
    /// Idle/demo mode - AI plays both sides
    pub idle_mode: bool,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.events.clear();

    match state.phase {
        MatchPhase::Title => {
            let start = input
                .start
                .or(input.idle_mode.then_some(ViewMode::ThirdPerson));
            if let Some(view) = start {
                state.phase = MatchPhase::Playing(view);
                state.events.push(MatchEvent::Started(view));
                log::info!("Match started ({view:?})");
            }
            return;
        }
        MatchPhase::Finished { .. } => {
            if input.reset {
                state.reset();
                state.events.push(MatchEvent::Reset);
                log::info!("Match reset");
            }
            return;
        }
        MatchPhase::Playing(_) => {}
    }

    // Demo mode replaces both players' input
    let mut input = input.clone();
    if input.idle_mode {
        input.steve = state.demo.input_for(&state.steve, &state.alex, &state.map);
        input.alex = state.demo.input_for(&state.alex, &state.steve, &state.map);
    }

    state.time_ticks += 1;

    state.snow.tick(dt);

    for ball in &mut state.projectiles {
        if let Some(event) = ball.update(dt, &mut state.snow, &state.map) {
            state.events.push(MatchEvent::ProjectileStopped {
                id: ball.id,
                owner: ball.owner,
                event,
            });
        }
    }
    state.projectiles.retain(Projectile::is_active);

    if let Some((id, target)) = find_hit(state) {
        let winner = target.opponent();
        state.phase = MatchPhase::Finished { winner };
        state.events.push(MatchEvent::Hit { id, target, winner });
        log::info!(
            "Snowball {} hit {} after {} ticks, {} wins",
            id,
            target.name(),
            state.time_ticks,
            winner.name()
        );
        return;
    }

    for team in [Team::Steve, Team::Alex] {
        let player = match team {
            Team::Steve => &input.steve,
            Team::Alex => &input.alex,
        };
        if let Some(id) = apply_player(state, team, player, dt) {
            state.events.push(MatchEvent::Thrown { id, owner: team });
        }

        let MatchState {
            tuning,
            map,
            snow,
            steve,
            alex,
            ..
        } = state;
        let avatar = match team {
            Team::Steve => steve,
            Team::Alex => alex,
        };
        avatar.update(dt, tuning.max_move_speed, map, snow);
    }
}

/// First snowball (by id) touching either avatar, Steve checked first
fn find_hit(state: &MatchState) -> Option<(u32, Team)> {
    state.projectiles.iter().find_map(|ball| {
        [&state.steve, &state.alex]
            .into_iter()
            .find(|avatar| sphere_hits_aabb(ball.pos, ball.radius, &avatar.world_aabb()))
            .map(|avatar| (ball.id, avatar.team))
    })
}

/// Feed one player's commands to their avatar, spawning a snowball on release
///
/// Returns the id of the thrown snowball.
fn apply_player(state: &mut MatchState, team: Team, input: &PlayerInput, dt: f32) -> Option<u32> {
    let max_charge_time = state.tuning.max_charge_time;
    let avatar = state.avatar_mut(team);
    avatar.move_dir = input.move_dir;
    if let Some(facing) = input.facing.and_then(|f| f.try_normalize()) {
        avatar.facing = facing;
    }

    if input.charge {
        avatar.begin_charge();
    }
    avatar.advance_charge(dt, max_charge_time);

    if !input.release || !avatar.is_charging() {
        return None;
    }
    let id = state.next_entity_id();
    let MatchState {
        tuning,
        steve,
        alex,
        projectiles,
        ..
    } = state;
    let avatar = match team {
        Team::Steve => steve,
        Team::Alex => alex,
    };
    let ball = avatar.release(id, tuning)?;
    projectiles.push(ball);
    Some(id)
}
