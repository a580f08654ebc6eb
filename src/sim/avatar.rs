//! Blocky avatars
//!
//! One `Avatar` type covers both players. Movement is axis-separated and
//! collision-checked against the wall, deep snow and the avatar's home
//! ground; the arm and legs run small state machines that drive the pose.

use glam::{IVec2, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::map::{GroundRect, GroundSide, Map};
use super::projectile::{Projectile, Team};
use super::snow::{SnowDepth, SnowField};
use crate::consts::*;
use crate::settings::{AvatarTuning, Tuning};

/// Arm animation state
///
/// `Charge` can only be entered from `Idle` or `Run`, and only left through
/// `Lowering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmState {
    Idle,
    Run,
    Charge,
    Lowering,
}

impl ArmState {
    /// Whether movement may switch the arm between idle and running
    #[inline]
    pub fn follows_movement(self) -> bool {
        matches!(self, ArmState::Idle | ArmState::Run)
    }
}

/// Leg animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegState {
    Idle,
    Run,
}

/// Named body parts, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum BodyPart {
    Body = 0,
    Head = 1,
    LeftArm = 2,
    RightArm = 3,
    LeftLeg = 4,
    RightLeg = 5,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] = [
        BodyPart::Body,
        BodyPart::Head,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
    ];
}

/// A cuboid part placed relative to the avatar origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartLayout {
    pub half_extents: Vec3,
    pub offset: Vec3,
    /// Rotation pivot relative to `offset`
    pub pivot: Vec3,
}

/// Half extents of each body part plus the spacing between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDims {
    pub body: Vec3,
    pub head: Vec3,
    pub arm: Vec3,
    pub leg: Vec3,
    /// Lateral offset of each leg from the centre line
    pub leg_spread: f32,
    pub gap: f32,
}

impl BodyDims {
    pub fn steve() -> Self {
        let limb = Vec3::new(0.12, 0.35, 0.12);
        Self {
            body: Vec3::new(0.3, 0.35, 0.15),
            head: Vec3::splat(0.25),
            arm: limb,
            leg: limb,
            leg_spread: 0.15,
            gap: 0.02,
        }
    }

    /// Slimmer arms and narrower stance
    pub fn alex() -> Self {
        Self {
            arm: Vec3::new(0.09, 0.35, 0.12),
            leg_spread: 0.12,
            ..Self::steve()
        }
    }

    pub fn for_team(team: Team) -> Self {
        match team {
            Team::Steve => Self::steve(),
            Team::Alex => Self::alex(),
        }
    }

    pub fn layout(&self, part: BodyPart) -> PartLayout {
        let arm_x = self.body.x + self.arm.x + self.gap;
        let arm_y = self.body.y - self.arm.y;
        let leg_y = -(self.body.y + self.leg.y + self.gap);
        let arm_pivot = Vec3::new(0.0, self.arm.y, 0.0);
        let leg_pivot = Vec3::new(0.0, self.leg.y, 0.0);

        match part {
            BodyPart::Body => PartLayout {
                half_extents: self.body,
                offset: Vec3::ZERO,
                pivot: Vec3::ZERO,
            },
            BodyPart::Head => PartLayout {
                half_extents: self.head,
                offset: Vec3::new(0.0, self.body.y + self.head.y + self.gap, 0.0),
                pivot: Vec3::new(0.0, -self.head.y, 0.0),
            },
            BodyPart::LeftArm => PartLayout {
                half_extents: self.arm,
                offset: Vec3::new(-arm_x, arm_y, 0.0),
                pivot: arm_pivot,
            },
            BodyPart::RightArm => PartLayout {
                half_extents: self.arm,
                offset: Vec3::new(arm_x, arm_y, 0.0),
                pivot: arm_pivot,
            },
            BodyPart::LeftLeg => PartLayout {
                half_extents: self.leg,
                offset: Vec3::new(-self.leg_spread, leg_y, 0.0),
                pivot: leg_pivot,
            },
            BodyPart::RightLeg => PartLayout {
                half_extents: self.leg,
                offset: Vec3::new(self.leg_spread, leg_y, 0.0),
                pivot: leg_pivot,
            },
        }
    }

    /// Local bounding box: head top to leg bottom, body width, head depth
    pub fn bounding_box(&self) -> Aabb {
        let head = self.layout(BodyPart::Head);
        let leg = self.layout(BodyPart::LeftLeg);
        let top = head.offset.y + self.head.y;
        let bottom = leg.offset.y - self.leg.y;
        Aabb::new(
            Vec3::new(-self.body.x, bottom, head.offset.z - self.head.z),
            Vec3::new(self.body.x, top, head.offset.z + self.head.z),
        )
    }
}

/// Joint angles for drawing, in radians about the x axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub left_arm: f32,
    pub right_arm: f32,
    pub left_leg: f32,
    pub right_leg: f32,
}

impl Pose {
    pub fn angle(&self, part: BodyPart) -> f32 {
        match part {
            BodyPart::Body | BodyPart::Head => 0.0,
            BodyPart::LeftArm => self.left_arm,
            BodyPart::RightArm => self.right_arm,
            BodyPart::LeftLeg => self.left_leg,
            BodyPart::RightLeg => self.right_leg,
        }
    }
}

/// A player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub team: Team,
    pub pos: Vec3,
    /// Movement intent on the x/z plane (`y` is world z)
    pub move_dir: Vec2,
    /// Horizontal aim, used as the throw direction
    pub facing: Vec3,
    pub move_speed: f32,
    pub throw_speed: f32,
    pub home: GroundSide,
    pub arm_state: ArmState,
    pub arm_angle: f32,
    arm_dir: f32,
    pub leg_state: LegState,
    pub leg_angle: f32,
    leg_dir: f32,
    /// Seconds spent in the current charge
    pub charge_time: f32,
    dims: BodyDims,
    /// Bounding box relative to `pos`
    local_bounds: Aabb,
}

impl Avatar {
    pub fn new(team: Team, pos: Vec3, home: GroundSide, tuning: AvatarTuning) -> Self {
        let dims = BodyDims::for_team(team);
        let facing = match home {
            GroundSide::Front => Vec3::Z,
            GroundSide::Back => Vec3::NEG_Z,
        };
        Self {
            team,
            pos,
            move_dir: Vec2::ZERO,
            facing,
            move_speed: tuning.move_speed,
            throw_speed: tuning.throw_speed,
            home,
            arm_state: ArmState::Idle,
            arm_angle: 0.0,
            arm_dir: 1.0,
            leg_state: LegState::Idle,
            leg_angle: 0.0,
            leg_dir: 1.0,
            charge_time: 0.0,
            dims,
            local_bounds: dims.bounding_box(),
        }
    }

    /// Steve at the front-ground spawn
    pub fn steve(tuning: &Tuning) -> Self {
        Self::new(Team::Steve, Self::spawn_point(Team::Steve), GroundSide::Front, tuning.steve)
    }

    /// Alex at the back-ground spawn
    pub fn alex(tuning: &Tuning) -> Self {
        Self::new(Team::Alex, Self::spawn_point(Team::Alex), GroundSide::Back, tuning.alex)
    }

    pub fn spawn_point(team: Team) -> Vec3 {
        match team {
            Team::Steve => Vec3::new(5.0, 1.5, 2.5),
            Team::Alex => Vec3::new(5.0, 1.5, 12.5),
        }
    }

    pub fn dims(&self) -> &BodyDims {
        &self.dims
    }

    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Bounding box in world space at the current position
    pub fn world_aabb(&self) -> Aabb {
        self.aabb_at(self.pos)
    }

    fn aabb_at(&self, pos: Vec3) -> Aabb {
        self.local_bounds.translated(pos)
    }

    pub fn is_moving(&self) -> bool {
        self.move_dir != Vec2::ZERO
    }

    pub fn is_charging(&self) -> bool {
        self.arm_state == ArmState::Charge
    }

    /// Charge progress in `[0, 1]`
    pub fn charge_ratio(&self, max_charge_time: f32) -> f32 {
        if max_charge_time <= 0.0 {
            return 1.0;
        }
        (self.charge_time / max_charge_time).clamp(0.0, 1.0)
    }

    fn set_arm_state(&mut self, state: ArmState) {
        if self.arm_state == state {
            return;
        }
        self.arm_state = state;
        if matches!(state, ArmState::Idle | ArmState::Run) {
            self.arm_angle = 0.0;
        }
        if state == ArmState::Run {
            self.arm_dir = 1.0;
        }
    }

    fn set_leg_state(&mut self, state: LegState) {
        if self.leg_state == state {
            return;
        }
        self.leg_state = state;
        self.leg_angle = 0.0;
        if state == LegState::Run {
            self.leg_dir = -1.0;
        }
    }

    /// Start charging a throw. Ignored while already charging or lowering.
    pub fn begin_charge(&mut self) -> bool {
        if !self.arm_state.follows_movement() {
            return false;
        }
        self.arm_state = ArmState::Charge;
        self.arm_angle = 0.0;
        self.charge_time = 0.0;
        true
    }

    /// Accumulate charge time and wind the arm back
    pub fn advance_charge(&mut self, dt: f32, max_charge_time: f32) {
        if self.arm_state != ArmState::Charge {
            return;
        }
        self.charge_time += dt;
        self.arm_angle = -std::f32::consts::PI * self.charge_ratio(max_charge_time);
    }

    /// Release a charged throw, returning the new snowball
    ///
    /// Returns `None` unless the arm is charging.
    pub fn release(&mut self, id: u32, tuning: &Tuning) -> Option<Projectile> {
        if self.arm_state != ArmState::Charge {
            return None;
        }
        let ratio = self.charge_ratio(tuning.max_charge_time);
        let fraction = tuning.min_throw_fraction + (1.0 - tuning.min_throw_fraction) * ratio;
        let speed = self.throw_speed * fraction;

        self.arm_state = ArmState::Lowering;
        self.charge_time = 0.0;

        let ball = Projectile::launch(id, self.team, self.pos, self.facing, speed, tuning);
        log::debug!(
            "{} threw snowball {} at {:.2} (charge {:.0}%)",
            self.team.name(),
            id,
            speed,
            ratio * 100.0
        );
        Some(ball)
    }

    /// Deepest snow class under the avatar's footprint at `pos`
    pub fn snow_contact(&self, pos: Vec3, snow: &SnowField) -> SnowDepth {
        let bounds = self.aabb_at(pos);
        let min = IVec2::new(bounds.min.x.floor() as i32, bounds.min.z.floor() as i32);
        let max = IVec2::new(bounds.max.x.floor() as i32, bounds.max.z.floor() as i32);

        let mut deepest = SnowDepth::None;
        for gx in min.x..=max.x {
            for gz in min.y..=max.y {
                let cell = IVec2::new(gx, gz);
                let height = snow.height_at(cell);
                if height <= 0.0 {
                    continue;
                }
                let column = Aabb::new(
                    Vec3::new(gx as f32, GROUND_TOP, gz as f32),
                    Vec3::new(gx as f32 + CELL_SIZE, GROUND_TOP + height, gz as f32 + CELL_SIZE),
                );
                if column.intersects_xz(&bounds) {
                    deepest = deepest.max(SnowDepth::classify(height));
                }
            }
        }
        deepest
    }

    fn home_rect<'a>(&self, map: &'a Map) -> &'a GroundRect {
        &map.ground(self.home).rect
    }

    /// Bounding box stays within the home ground's footprint
    fn inside_home(&self, pos: Vec3, map: &Map) -> bool {
        let bounds = self.aabb_at(pos);
        let (min, max) = self.home_rect(map).world_extents();
        bounds.min.x >= min.x && bounds.max.x <= max.x && bounds.min.z >= min.y && bounds.max.z <= max.y
    }

    fn can_occupy(&self, pos: Vec3, map: &Map, snow: &SnowField) -> bool {
        self.snow_contact(pos, snow) != SnowDepth::Deep
            && !map.hits_wall(&self.aabb_at(pos))
            && self.inside_home(pos, map)
    }

    /// Per-frame update: animation states, movement, then limb swing
    ///
    /// Movement and swing constants are per 16 ms frame and scale with `dt`.
    pub fn update(&mut self, dt: f32, max_move_speed: f32, map: &Map, snow: &SnowField) {
        let frames = dt / SIM_DT;
        let moving = self.is_moving();

        if self.arm_state.follows_movement() {
            self.set_arm_state(if moving { ArmState::Run } else { ArmState::Idle });
        }
        self.set_leg_state(if moving { LegState::Run } else { LegState::Idle });

        let mut speed = self.move_speed;
        if self.snow_contact(self.pos, snow) == SnowDepth::Shallow {
            speed *= 0.5;
        }
        let step = speed.min(max_move_speed) * frames;

        let mut dir = self.move_dir;
        let len = dir.length();
        if len > 1e-4 {
            dir /= len;
        }

        // Axis-separated so a blocked axis still lets the other slide
        let next = self.pos + Vec3::new(dir.x * step, 0.0, 0.0);
        if self.can_occupy(next, map, snow) {
            self.pos.x = next.x;
        }
        let next = self.pos + Vec3::new(0.0, 0.0, dir.y * step);
        if self.can_occupy(next, map, snow) {
            self.pos.z = next.z;
        }

        match self.arm_state {
            ArmState::Idle | ArmState::Charge => {}
            ArmState::Run => {
                self.arm_angle += self.arm_dir * LIMB_SWING_STEP * frames;
                if self.arm_angle.abs() > LIMB_SWING_LIMIT {
                    self.arm_dir = -self.arm_dir;
                }
            }
            ArmState::Lowering => {
                self.arm_angle += ARM_LOWER_STEP * frames;
                if self.arm_angle >= 0.0 {
                    self.arm_angle = 0.0;
                    self.set_arm_state(if moving { ArmState::Run } else { ArmState::Idle });
                }
            }
        }

        match self.leg_state {
            LegState::Idle => {}
            LegState::Run => {
                self.leg_angle += self.leg_dir * LIMB_SWING_STEP * frames;
                if self.leg_angle.abs() > LIMB_SWING_LIMIT {
                    self.leg_dir = -self.leg_dir;
                }
            }
        }
    }

    /// Joint angles for drawing
    pub fn pose(&self) -> Pose {
        let left_arm = self.arm_angle;
        let right_arm = match self.arm_state {
            ArmState::Charge | ArmState::Lowering => 0.0,
            ArmState::Idle | ArmState::Run => -left_arm,
        };
        let leg = -self.leg_angle.sin() * LIMB_SWING_LIMIT;
        Pose {
            left_arm,
            right_arm,
            left_leg: leg,
            right_leg: -leg,
        }
    }

    /// Model matrix of one part: `T(pos) * T(offset) * T(pivot) * Rx(angle) * T(-pivot)`
    pub fn part_transform(&self, part: BodyPart, pose: &Pose) -> Mat4 {
        let layout = self.dims.layout(part);
        Mat4::from_translation(self.pos)
            * Mat4::from_translation(layout.offset)
            * Mat4::from_translation(layout.pivot)
            * Mat4::from_rotation_x(pose.angle(part))
            * Mat4::from_translation(-layout.pivot)
    }

    /// Model matrices for every part, in [`BodyPart::ALL`] order
    pub fn part_transforms(&self) -> [(BodyPart, Mat4); 6] {
        let pose = self.pose();
        BodyPart::ALL.map(|part| (part, self.part_transform(part, &pose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snow::cell_center;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn world() -> (Map, SnowField, Tuning) {
        let map = Map::new();
        let snow = SnowField::for_map(&map, 1.5);
        (map, snow, Tuning::default())
    }

    fn step(avatar: &mut Avatar, map: &Map, snow: &SnowField, frames: usize) {
        for _ in 0..frames {
            avatar.update(SIM_DT, 1.5, map, snow);
        }
    }

    /// Settled column of `height` on a wall-adjacent cell
    fn rebuild(snow: &mut SnowField, cell: IVec2, height: f32) {
        let p = cell_center(cell, 0.0);
        while snow.target_at(cell) < height {
            assert!(snow.try_deposit(p.x, p.z).is_accepted());
        }
        snow.tick(10.0);
    }

    #[test]
    fn test_bounding_box_from_dims() {
        let dims = BodyDims::steve();
        let bb = dims.bounding_box();
        assert!((bb.max.y - 0.87).abs() < EPS);
        assert!((bb.min.y + 1.07).abs() < EPS);
        assert!((bb.max.x - 0.3).abs() < EPS);
        assert!((bb.max.z - 0.25).abs() < EPS);
        assert_eq!(BodyDims::alex().bounding_box(), bb);
    }

    #[test]
    fn test_alex_build() {
        let alex = BodyDims::alex();
        let arm = alex.layout(BodyPart::RightArm);
        assert!((arm.offset.x - (0.3 + 0.09 + 0.02)).abs() < EPS);
        assert!((alex.layout(BodyPart::LeftLeg).offset.x + 0.12).abs() < EPS);
    }

    #[test]
    fn test_spawn_inside_home() {
        let (map, snow, tuning) = world();
        for avatar in [Avatar::steve(&tuning), Avatar::alex(&tuning)] {
            assert!(avatar.can_occupy(avatar.pos, &map, &snow), "{:?}", avatar.team);
        }
    }

    #[test]
    fn test_move_and_run_states() {
        let (map, snow, tuning) = world();
        let mut steve = Avatar::steve(&tuning);
        steve.move_dir = Vec2::new(1.0, 0.0);
        step(&mut steve, &map, &snow, 10);
        assert!((steve.pos.x - (5.0 + 0.085 * 10.0)).abs() < 1e-3);
        assert_eq!(steve.arm_state, ArmState::Run);
        assert_eq!(steve.leg_state, LegState::Run);
        assert!(steve.arm_angle > 0.0);
        assert!(steve.leg_angle < 0.0);

        steve.move_dir = Vec2::ZERO;
        step(&mut steve, &map, &snow, 1);
        assert_eq!(steve.arm_state, ArmState::Idle);
        assert_eq!(steve.arm_angle, 0.0);
        assert_eq!(steve.leg_angle, 0.0);
    }

    #[test]
    fn test_diagonal_intent_is_normalized() {
        let (map, snow, tuning) = world();
        let mut steve = Avatar::steve(&tuning);
        steve.move_dir = Vec2::new(3.0, 3.0);
        step(&mut steve, &map, &snow, 1);
        let moved = Vec2::new(steve.pos.x - 5.0, steve.pos.z - 2.5).length();
        assert!((moved - 0.085).abs() < 1e-4);
    }

    #[test]
    fn test_slides_along_wall() {
        let (map, snow, tuning) = world();
        let mut steve = Avatar::steve(&tuning);
        // Push into the left wall while drifting forward
        steve.move_dir = Vec2::new(-1.0, 0.5);
        step(&mut steve, &map, &snow, 200);
        let bb = steve.world_aabb();
        assert!(bb.min.x > 0.0);
        assert!(bb.min.x < 0.1);
        // Still made progress along z until the home edge
        assert!(steve.pos.z > 4.0);
        assert!(bb.max.z <= 5.0 + EPS);
    }

    #[test]
    fn test_interior_wall_blocks_x_but_not_z() {
        let (mut map, snow, tuning) = world();
        // One block standing on Steve's ground, just right of spawn
        map.wall.add_block(Vec3::new(6.5, 1.0, 2.5), 1.0);

        let mut steve = Avatar::steve(&tuning);
        steve.move_dir = Vec2::new(1.0, 0.3);
        step(&mut steve, &map, &snow, 20);

        let bb = steve.world_aabb();
        assert!(bb.max.x < 6.0, "walked through interior wall: {bb:?}");
        assert!(bb.max.x > 5.9);
        assert!(steve.pos.z > 2.9);
        assert!(bb.min.z < 3.0);
    }

    #[test]
    fn test_cannot_leave_home_ground() {
        let (map, snow, tuning) = world();
        let mut alex = Avatar::alex(&tuning);
        alex.move_dir = Vec2::new(0.0, -1.0);
        step(&mut alex, &map, &snow, 300);
        assert!(alex.world_aabb().min.z >= 10.0 - EPS);
    }

    #[test]
    fn test_deep_snow_blocks_movement() {
        let (map, mut snow, tuning) = world();
        // Deep column against the right wall, in Steve's path
        rebuild(&mut snow, IVec2::new(9, 2), 1.0);
        assert_eq!(snow.height_at(IVec2::new(9, 2)), 1.0);

        let mut steve = Avatar::steve(&tuning);
        steve.move_dir = Vec2::new(1.0, 0.0);
        step(&mut steve, &map, &snow, 200);
        let bb = steve.world_aabb();
        assert!(bb.max.x < 9.0, "walked into deep snow: {bb:?}");
        assert!(bb.max.x > 8.8);
    }

    #[test]
    fn test_shallow_snow_halves_speed() {
        let (map, mut snow, tuning) = world();
        rebuild(&mut snow, IVec2::new(4, 0), 0.5);
        let mut steve = Avatar::steve(&tuning);
        // Footprint reaches z = 0.95, over the column
        steve.pos = Vec3::new(4.5, 1.5, 1.2);
        assert_eq!(steve.snow_contact(steve.pos, &snow), SnowDepth::Shallow);
        steve.move_dir = Vec2::new(0.0, 1.0);
        step(&mut steve, &map, &snow, 1);
        assert!((steve.pos.z - (1.2 + 0.0425)).abs() < 1e-4);
    }

    #[test]
    fn test_charge_guard_and_lowering() {
        let (map, snow, tuning) = world();
        let mut steve = Avatar::steve(&tuning);
        assert!(steve.begin_charge());
        assert_eq!(steve.arm_state, ArmState::Charge);
        assert!(!steve.begin_charge());

        steve.advance_charge(0.5, tuning.max_charge_time);
        assert!((steve.arm_angle + std::f32::consts::FRAC_PI_2).abs() < EPS);

        // Moving does not pull the arm out of a charge
        steve.move_dir = Vec2::new(1.0, 0.0);
        step(&mut steve, &map, &snow, 3);
        assert_eq!(steve.arm_state, ArmState::Charge);

        let ball = steve.release(7, &tuning);
        assert!(ball.is_some());
        assert_eq!(steve.arm_state, ArmState::Lowering);
        // Cannot re-charge mid-recovery
        assert!(!steve.begin_charge());
        assert!(steve.release(8, &tuning).is_none());

        // -pi/2 recovers in ceil(1.5708 / 0.25) = 7 frames
        step(&mut steve, &map, &snow, 7);
        assert_eq!(steve.arm_state, ArmState::Run);
        assert_eq!(steve.arm_angle, 0.0);
        assert!(steve.begin_charge());
    }

    #[test]
    fn test_lowering_returns_to_idle_when_still() {
        let (map, snow, tuning) = world();
        let mut steve = Avatar::steve(&tuning);
        steve.begin_charge();
        steve.advance_charge(2.0, tuning.max_charge_time);
        assert!((steve.arm_angle + std::f32::consts::PI).abs() < EPS);
        steve.release(1, &tuning);
        step(&mut steve, &map, &snow, 13);
        assert_eq!(steve.arm_state, ArmState::Idle);
    }

    #[test]
    fn test_release_speed_scales_with_charge() {
        let tuning = Tuning::default();
        let mut steve = Avatar::steve(&tuning);

        steve.begin_charge();
        let weak = steve.release(1, &tuning).map(|b| b.vel.length());
        steve.arm_state = ArmState::Idle;

        steve.begin_charge();
        steve.advance_charge(tuning.max_charge_time, tuning.max_charge_time);
        let strong = steve.release(2, &tuning).map(|b| b.vel.length());

        let weak = weak.unwrap_or_default();
        let strong = strong.unwrap_or_default();
        assert!((weak - 13.0 * 0.3).abs() < 1e-3);
        assert!((strong - 13.0).abs() < 1e-3);
    }

    #[test]
    fn test_release_without_charge_ignored() {
        let tuning = Tuning::default();
        let mut steve = Avatar::steve(&tuning);
        assert!(steve.release(1, &tuning).is_none());
        assert_eq!(steve.arm_state, ArmState::Idle);
    }

    #[test]
    fn test_pose_rules() {
        let tuning = Tuning::default();
        let mut steve = Avatar::steve(&tuning);
        steve.arm_state = ArmState::Run;
        steve.arm_angle = 0.4;
        steve.leg_angle = 0.5;
        let pose = steve.pose();
        assert_eq!(pose.right_arm, -0.4);
        assert!((pose.left_leg + 0.5f32.sin() * LIMB_SWING_LIMIT).abs() < EPS);
        assert_eq!(pose.right_leg, -pose.left_leg);

        steve.arm_state = ArmState::Charge;
        assert_eq!(steve.pose().right_arm, 0.0);
    }

    #[test]
    fn test_part_transform_rotates_about_pivot() {
        let tuning = Tuning::default();
        let mut steve = Avatar::steve(&tuning);
        steve.arm_state = ArmState::Charge;
        steve.arm_angle = -std::f32::consts::PI;

        let transforms = steve.part_transforms();
        assert_eq!(transforms[2].0, BodyPart::LeftArm);
        let layout = steve.dims().layout(BodyPart::LeftArm);

        // The shoulder (pivot) stays put under rotation
        let shoulder = transforms[2].1.transform_point3(layout.pivot);
        assert!((shoulder - (steve.pos + layout.offset + layout.pivot)).length() < EPS);
        // A half-turn swings the arm's centre above the shoulder
        let centre = transforms[2].1.transform_point3(Vec3::ZERO);
        assert!(centre.y > shoulder.y);

        let body = transforms[0].1.transform_point3(Vec3::ZERO);
        assert!((body - steve.pos).length() < EPS);
    }

    proptest! {
        #[test]
        fn prop_stays_on_home_ground(
            moves in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, 1usize..40), 1..12),
            alex in any::<bool>(),
        ) {
            let (map, snow, tuning) = world();
            let mut avatar = if alex { Avatar::alex(&tuning) } else { Avatar::steve(&tuning) };
            let (min, max) = map.ground(avatar.home).rect.world_extents();
            for (x, z, frames) in moves {
                avatar.move_dir = Vec2::new(x, z);
                step(&mut avatar, &map, &snow, frames);
                let bb = avatar.world_aabb();
                prop_assert!(bb.min.x > min.x - EPS && bb.max.x < max.x + EPS);
                prop_assert!(bb.min.z >= min.y - EPS && bb.max.z <= max.y + EPS);
                prop_assert!(!map.hits_wall(&bb));
            }
        }
    }
}
