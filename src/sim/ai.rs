//! Demo mode driver
//!
//! Plays both sides from a seeded RNG: wander to random spots on the home
//! ground, face the opponent, and now and then charge and throw.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::avatar::{ArmState, Avatar};
use super::map::Map;
use super::projectile::Team;
use super::tick::PlayerInput;

/// Distance at which a wander target counts as reached
const ARRIVE_DISTANCE: f32 = 0.2;
/// Chance per tick of starting a throw when the arm is free
const THROW_CHANCE: f64 = 0.02;
/// Range of ticks to hold a charge
const CHARGE_TICKS: std::ops::RangeInclusive<u32> = 20..=70;
/// Ticks before giving up on an unreachable target
const WANDER_PATIENCE: u32 = 240;

#[derive(Debug, Clone, Default)]
struct Plan {
    target: Option<Vec2>,
    wander_ticks: u32,
    hold_ticks: u32,
    held: u32,
}

/// Seeded AI for both avatars
#[derive(Debug, Clone)]
pub struct DemoDriver {
    rng: Pcg32,
    plans: [Plan; 2],
}

impl DemoDriver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            plans: Default::default(),
        }
    }

    fn slot(team: Team) -> usize {
        match team {
            Team::Steve => 0,
            Team::Alex => 1,
        }
    }

    /// Random standing spot on `me`'s home ground with room for the body
    fn pick_target(rng: &mut Pcg32, me: &Avatar, map: &Map) -> Vec2 {
        let (min, max) = map.ground(me.home).rect.world_extents();
        let half = me.local_bounds().half_extents();
        let margin = Vec2::new(half.x, half.z) + Vec2::splat(0.1);
        Vec2::new(
            rng.random_range((min.x + margin.x)..(max.x - margin.x)),
            rng.random_range((min.y + margin.y)..(max.y - margin.y)),
        )
    }

    /// Input for `me` this tick
    pub fn input_for(&mut self, me: &Avatar, foe: &Avatar, map: &Map) -> PlayerInput {
        let rng = &mut self.rng;
        let plan = &mut self.plans[Self::slot(me.team)];
        let here = Vec2::new(me.pos.x, me.pos.z);

        // Wander
        let reached = plan
            .target
            .is_none_or(|t| t.distance(here) < ARRIVE_DISTANCE || plan.wander_ticks > WANDER_PATIENCE);
        if reached {
            plan.target = Some(Self::pick_target(rng, me, map));
            plan.wander_ticks = 0;
        }
        plan.wander_ticks += 1;
        let move_dir = plan
            .target
            .map(|t| (t - here).normalize_or_zero())
            .unwrap_or(Vec2::ZERO);

        // Aim at the opponent on the horizontal plane
        let to_foe = Vec3::new(foe.pos.x - me.pos.x, 0.0, foe.pos.z - me.pos.z);
        let facing = to_foe.try_normalize();

        let mut input = PlayerInput {
            move_dir,
            facing,
            ..Default::default()
        };

        match me.arm_state {
            ArmState::Idle | ArmState::Run => {
                if rng.random_bool(THROW_CHANCE) {
                    input.charge = true;
                    plan.hold_ticks = rng.random_range(CHARGE_TICKS);
                    plan.held = 0;
                }
            }
            ArmState::Charge => {
                plan.held += 1;
                if plan.held >= plan.hold_ticks {
                    input.release = true;
                }
                // Stand still while winding up
                input.move_dir = Vec2::ZERO;
            }
            ArmState::Lowering => {}
        }

        input
    }
}
