//! Snowballs
//!
//! A snowball is a point mass under constant gravity. It lives until it hits
//! something or times out; wall and snow hits pile more snow, ground hits and
//! strays just vanish.

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, sphere_bounds};
use super::map::Map;
use super::snow::{DepositOutcome, SnowField, column_aabb, world_to_cell};
use crate::Tuning;
use crate::consts::*;

/// Which avatar threw a snowball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Steve,
    Alex,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Steve => Team::Alex,
            Team::Alex => Team::Steve,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Steve => "Steve",
            Team::Alex => "Alex",
        }
    }
}

/// Why a snowball stopped this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    /// Lifetime ran out
    Expired,
    /// Hit a wall block; snow was offered at the clamped ground point
    HitWall { deposit: DepositOutcome },
    /// Hit an existing snow column; snow was offered at the impact point
    HitSnow { deposit: DepositOutcome },
    /// Splashed on bare ground
    HitGround,
    /// Left the extended map bounds
    OutOfBounds,
}

/// A thrown snowball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Team,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Constant acceleration (gravity)
    pub accel: Vec3,
    pub radius: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    active: bool,
}

impl Projectile {
    pub fn new(id: u32, owner: Team, pos: Vec3, vel: Vec3, tuning: &Tuning) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            accel: Vec3::new(0.0, tuning.gravity, 0.0),
            radius: tuning.snowball_radius,
            lifetime: 0.0,
            max_lifetime: tuning.snowball_max_lifetime,
            active: true,
        }
    }

    /// Launch from a thrower: ahead of and above `origin`, aimed along
    /// `facing` with an upward lift.
    pub fn launch(
        id: u32,
        owner: Team,
        origin: Vec3,
        facing: Vec3,
        speed: f32,
        tuning: &Tuning,
    ) -> Self {
        let facing = facing.normalize_or(Vec3::Z);
        let start = origin + facing * tuning.launch_forward + Vec3::Y * tuning.launch_up;
        let dir = (facing + Vec3::Y * tuning.launch_lift).normalize_or(facing);
        Self::new(id, owner, start, dir * speed, tuning)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop the snowball for good
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounds(&self) -> Aabb {
        sphere_bounds(self.pos, self.radius)
    }

    /// Advance one tick: age, integrate, then resolve wall, snow, ground and
    /// bounds in that order.
    pub fn update(&mut self, dt: f32, snow: &mut SnowField, map: &Map) -> Option<ProjectileEvent> {
        if !self.active {
            return None;
        }

        self.lifetime += dt;
        if self.lifetime >= self.max_lifetime {
            return Some(self.finish(ProjectileEvent::Expired));
        }

        // Semi-implicit Euler
        self.vel += self.accel * dt;
        self.pos += self.vel * dt;

        if self.hits_wall(map) {
            let (x, z) = map.clamp_to_ground(self.pos.x, self.pos.z);
            let deposit = snow.try_deposit(x, z);
            return Some(self.finish(ProjectileEvent::HitWall { deposit }));
        }

        if self.hits_snow(snow) {
            let deposit = snow.try_deposit(self.pos.x, self.pos.z);
            return Some(self.finish(ProjectileEvent::HitSnow { deposit }));
        }

        if self.pos.y - self.radius <= GROUND_TOP {
            return Some(self.finish(ProjectileEvent::HitGround));
        }

        if !map.in_extended_bounds(self.pos) {
            return Some(self.finish(ProjectileEvent::OutOfBounds));
        }

        None
    }

    fn finish(&mut self, event: ProjectileEvent) -> ProjectileEvent {
        self.active = false;
        log::debug!(
            "Snowball {} ({}) stopped at ({:.2}, {:.2}, {:.2}): {:?}",
            self.id,
            self.owner.name(),
            self.pos.x,
            self.pos.y,
            self.pos.z,
            event
        );
        event
    }

    /// Centre inside any wall block grown by radius plus a small margin
    fn hits_wall(&self, map: &Map) -> bool {
        let margin = self.radius + WALL_HIT_MARGIN;
        map.wall
            .blocks
            .iter()
            .any(|b| b.aabb().expanded(margin).contains_point(self.pos))
    }

    /// Sphere bounds against the columns in the current cell and its 8 neighbours
    fn hits_snow(&self, snow: &SnowField) -> bool {
        let cell = world_to_cell(self.pos.x, self.pos.z);
        let bounds = self.bounds();
        for dx in -1..=1 {
            for dz in -1..=1 {
                let check = cell + IVec2::new(dx, dz);
                let height = snow.height_at(check);
                if height > 0.0 && column_aabb(check, height).intersects(&bounds) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::snow::cell_center;

    fn setup() -> (Map, SnowField, Tuning) {
        let map = Map::new();
        let snow = SnowField::for_map(&map, 1.5);
        (map, snow, Tuning::default())
    }

    fn run(ball: &mut Projectile, snow: &mut SnowField, map: &Map) -> Option<ProjectileEvent> {
        for _ in 0..2000 {
            if let Some(event) = ball.update(SIM_DT, snow, map) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_launch_geometry() {
        let tuning = Tuning::default();
        let ball = Projectile::launch(1, Team::Steve, Vec3::new(5.0, 1.5, 2.5), Vec3::Z, 10.0, &tuning);
        assert!((ball.pos - Vec3::new(5.0, 2.0, 3.5)).length() < 1e-5);
        assert!((ball.vel.length() - 10.0).abs() < 1e-4);
        assert!(ball.vel.y > 0.0 && ball.vel.z > 0.0);
        assert!(ball.is_active());
    }

    #[test]
    fn test_zero_facing_does_not_nan() {
        let tuning = Tuning::default();
        let ball = Projectile::launch(1, Team::Alex, Vec3::new(5.0, 1.5, 12.5), Vec3::ZERO, 10.0, &tuning);
        assert!(ball.pos.is_finite());
        assert!(ball.vel.is_finite());
    }

    #[test]
    fn test_parabolic_descent() {
        let (map, mut snow, tuning) = setup();
        let mut ball = Projectile::new(1, Team::Steve, Vec3::new(5.0, 4.0, 7.5), Vec3::new(0.0, 3.0, 0.0), &tuning);
        let mut heights = Vec::new();
        while ball.update(SIM_DT, &mut snow, &map).is_none() {
            heights.push(ball.pos.y);
        }
        let peak = heights.iter().cloned().fold(f32::MIN, f32::max);
        assert!(peak > 4.0);
        assert!(heights.last().copied().unwrap_or(peak) < peak);
        // Falling over the buffer zone still counts as a ground splash
        assert!(snow.is_empty());
    }

    #[test]
    fn test_lifetime_expiry() {
        let (map, mut snow, mut tuning) = setup();
        tuning.gravity = 0.0;
        tuning.snowball_max_lifetime = 0.1;
        let mut ball = Projectile::new(1, Team::Steve, Vec3::new(5.0, 3.0, 7.5), Vec3::ZERO, &tuning);
        let event = run(&mut ball, &mut snow, &map);
        assert_eq!(event, Some(ProjectileEvent::Expired));
        assert!(!ball.is_active());
        assert!(ball.update(SIM_DT, &mut snow, &map).is_none());
    }

    #[test]
    fn test_ground_hit_leaves_snow_untouched() {
        let (map, mut snow, tuning) = setup();
        let mut ball = Projectile::new(1, Team::Steve, Vec3::new(4.5, 1.0, 2.5), Vec3::new(0.0, -5.0, 0.0), &tuning);
        let event = run(&mut ball, &mut snow, &map);
        assert_eq!(event, Some(ProjectileEvent::HitGround));
        assert!(snow.is_empty());
    }

    #[test]
    fn test_wall_hit_deposits_at_clamped_point() {
        let (map, mut snow, mut tuning) = setup();
        tuning.gravity = 0.0;
        // Straight into the near wall over the front ground
        let mut ball = Projectile::new(1, Team::Alex, Vec3::new(4.5, 2.0, 2.5), Vec3::new(0.0, 0.0, -8.0), &tuning);
        let event = run(&mut ball, &mut snow, &map);
        match event {
            Some(ProjectileEvent::HitWall { deposit }) => {
                assert_eq!(
                    deposit,
                    DepositOutcome::Accepted { cell: IVec2::new(4, 0), from: 0.0, to: 0.5 }
                );
            }
            other => panic!("expected wall hit, got {other:?}"),
        }
        assert!(!ball.is_active());
    }

    #[test]
    fn test_deep_snow_hit_grows_column() {
        let (map, mut snow, mut tuning) = setup();
        tuning.gravity = 0.0;
        let pile = IVec2::new(0, 2);
        let p = cell_center(pile, 0.0);
        snow.try_deposit(p.x, p.z);
        snow.try_deposit(p.x, p.z);
        snow.tick(5.0);
        assert_eq!(snow.height_at(pile), 1.0);

        // Low throw along -x into the pile, below its top
        let mut ball = Projectile::new(1, Team::Steve, Vec3::new(4.5, 1.0, 2.5), Vec3::new(-6.0, 0.0, 0.0), &tuning);
        let event = run(&mut ball, &mut snow, &map);
        assert!(matches!(event, Some(ProjectileEvent::HitSnow { .. })), "{event:?}");
        assert!(!ball.is_active());
        let grown: f32 = [IVec2::new(0, 2), IVec2::new(1, 2)]
            .iter()
            .map(|&c| snow.target_at(c))
            .sum();
        assert!(grown > 1.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let (map, mut snow, mut tuning) = setup();
        tuning.gravity = 0.0;
        // Above the wall tops, heading out over the side
        let mut ball = Projectile::new(1, Team::Steve, Vec3::new(5.0, 8.0, 2.5), Vec3::new(10.0, 0.0, 0.0), &tuning);
        let event = run(&mut ball, &mut snow, &map);
        assert_eq!(event, Some(ProjectileEvent::OutOfBounds));
        assert!(snow.is_empty());
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Steve.opponent(), Team::Alex);
        assert_eq!(Team::Alex.opponent(), Team::Steve);
    }
}
