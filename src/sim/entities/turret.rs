//! Player turret: aims, fires missile volleys, keeps score

use glam::Vec2;
use rand::Rng;

use super::missile::{COLLATERAL_MISSILE_SIZE, MISSILE_SIZE, MISSILE_SPEED, Missile};
use super::EntityKind;
use crate::consts::CELL_SIZE;
use crate::degrees_to_direction;
use crate::sim::entity::{Body, Entity, EntityState};
use crate::sim::rect::Rect;
use crate::sim::world::World;

pub const TURRET_SIZE: Vec2 = Vec2::new(15.0, 32.5);
/// How far the turret's foot sinks into the ground it stands on
const SEAT_OVERLAP: f32 = 5.0;
const AIM_LIMIT: f32 = 90.0;
const DEFAULT_SHOOT_DELAY: f32 = 0.2;
const COLLATERAL_MISSILES: usize = 2;

#[derive(Debug, Clone)]
pub struct Turret {
    /// Degrees from vertical, clockwise positive
    aim_angle: f32,
    score: i32,
    bombs_missed: u32,
    shoot_delay: f32,
    /// Seconds until the next volley may fire
    cooldown: f32,
}

impl Default for Turret {
    fn default() -> Self {
        Self {
            aim_angle: 0.0,
            score: 0,
            bombs_missed: 0,
            shoot_delay: DEFAULT_SHOOT_DELAY,
            cooldown: 0.0,
        }
    }
}

impl Turret {
    /// Detached turret entity at the origin
    pub fn spawn() -> Entity {
        Self::spawn_at(Vec2::ZERO)
    }

    pub fn spawn_at(pos: Vec2) -> Entity {
        let mut body = Body::new(TURRET_SIZE, false);
        body.set_position(pos);
        Entity::new(EntityKind::Turret(Self::default()), body)
    }

    #[inline]
    pub fn aim_angle(&self) -> f32 {
        self.aim_angle
    }

    pub fn set_aim_angle(&mut self, degrees: f32) {
        self.aim_angle = degrees.clamp(-AIM_LIMIT, AIM_LIMIT);
    }

    pub fn add_to_aim_angle(&mut self, degrees: f32) {
        self.set_aim_angle(self.aim_angle + degrees);
    }

    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn add_score(&mut self, points: i32) {
        self.score += points;
    }

    #[inline]
    pub fn bombs_missed(&self) -> u32 {
        self.bombs_missed
    }

    pub fn increment_bombs_missed(&mut self) {
        self.bombs_missed += 1;
    }

    #[inline]
    pub fn shoot_delay(&self) -> f32 {
        self.shoot_delay
    }

    #[inline]
    pub fn can_fire(&self) -> bool {
        self.cooldown <= 0.0
    }

    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        state.body.integrate(world.gravity_accel(), world.frame_time());
        if self.cooldown > 0.0 {
            self.cooldown -= world.frame_time();
        }

        // Snap down onto the highest solid cell beneath the turret
        let kill_y = world.kill_plane_y();
        let pos = state.body.position();
        let size = state.body.size();
        let mut foot_y = pos.y + size.y - SEAT_OVERLAP;
        while foot_y < kill_y {
            let probe = Rect::from_pos_size(
                Vec2::new(pos.x + size.x * 0.5, foot_y),
                Vec2::splat(CELL_SIZE),
            );
            if world.grid_rect_collision(probe).is_some() {
                break;
            }
            foot_y += CELL_SIZE;
        }

        if foot_y < kill_y {
            state
                .body
                .set_position(Vec2::new(pos.x, foot_y - size.y + SEAT_OVERLAP));
        }
    }

    /// Launch a volley along the aim direction if the cooldown allows
    pub(crate) fn fire_missile(&mut self, state: &EntityState, world: &mut World) -> bool {
        if !self.can_fire() {
            return false;
        }

        let velocity = MISSILE_SPEED * degrees_to_direction(self.aim_angle - 90.0);
        let pos = state.body.position();
        let size = state.body.size();
        let muzzle = |missile: Vec2| {
            pos + Vec2::new(2.0 - 0.5 * missile.x, 0.5 * size.y - 0.5 * missile.y)
        };

        world.spawn(Missile::spawn(
            muzzle(MISSILE_SIZE),
            MISSILE_SIZE,
            velocity,
            state.id(),
        ));

        for _ in 0..COLLATERAL_MISSILES {
            let spread = world.effects_rng().random_range(1.05..1.15);
            world.spawn(Missile::spawn(
                muzzle(COLLATERAL_MISSILE_SIZE),
                COLLATERAL_MISSILE_SIZE,
                spread * velocity,
                state.id(),
            ));
        }

        self.cooldown += self.shoot_delay;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::block::BlockKind;

    fn small_world() -> World {
        World::new(Settings::with_grid(200, 200))
    }

    #[test]
    fn test_aim_angle_clamped() {
        let mut turret = Turret::default();
        turret.set_aim_angle(120.0);
        assert_eq!(turret.aim_angle(), 90.0);
        turret.add_to_aim_angle(-500.0);
        assert_eq!(turret.aim_angle(), -90.0);
    }

    #[test]
    fn test_turret_snaps_onto_ground() {
        let mut world = small_world();
        for col in 0..200 {
            world.create_block(col, 150, BlockKind::Stone);
        }
        let id = world.spawn(Turret::spawn_at(Vec2::new(40.0, 0.0)));
        world.tick();

        let rect = world.lookup(id).expect("turret").rect();
        // Foot sits within one cell of the ground surface (row 150 => y 75)
        let foot = rect.bottom() - SEAT_OVERLAP;
        assert!(foot <= 75.0 && foot > 75.0 - 2.0 * CELL_SIZE, "foot at {foot}");
    }

    #[test]
    fn test_turret_without_ground_stays_put() {
        let mut world = small_world();
        let id = world.spawn(Turret::spawn_at(Vec2::new(40.0, 10.0)));
        world.tick();
        assert_eq!(world.lookup(id).expect("turret").body().position(), Vec2::new(40.0, 10.0));
    }

    #[test]
    fn test_fire_spawns_volley_and_respects_cooldown() {
        let mut world = small_world();
        let id = world.spawn(Turret::spawn_at(Vec2::new(40.0, 40.0)));

        assert!(world.fire_turret(id));
        // Turret + main missile + two collateral missiles
        assert_eq!(world.entity_count(), 4);
        let missiles: Vec<&Entity> = world
            .entities()
            .filter(|e| matches!(e.kind(), EntityKind::Missile(_)))
            .collect();
        assert_eq!(missiles.len(), 3);
        // Aim 0 degrees fires straight up
        for missile in &missiles {
            assert!(missile.body().velocity.y < 0.0);
            assert!(missile.body().velocity.x.abs() < 1e-3);
        }

        assert!(!world.fire_turret(id), "still cooling down");
        let turret = world.lookup(id).and_then(Entity::as_turret).expect("turret");
        assert!(!turret.can_fire());
    }

    #[test]
    fn test_fire_on_non_turret_is_rejected() {
        let mut world = small_world();
        assert!(!world.fire_turret(crate::sim::EntityId::INVALID));
    }
}
