//! Falling bomb: drifts down and cratters the terrain on contact

use glam::Vec2;

use super::smoke::{SMOKE_SIZE, Smoke};
use super::{EntityKind, SMOKE_INTERVAL};
use crate::consts::DEFAULT_GIB_CHANCE;
use crate::sim::entity::{Body, Entity, EntityId, EntityState};
use crate::sim::rect::Rect;
use crate::sim::world::World;
use crate::world_to_cell;

pub const BOMB_SIZE: Vec2 = Vec2::splat(20.0);
/// World units per tick
pub const BOMB_FALL_SPEED: f32 = 0.75;
/// Blast radius in cells
pub const BOMB_EXPLOSION_RADIUS: u16 = 100;
pub const BOMB_EXPLOSION_DAMAGE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Bomb {
    explosion_radius: u16,
    explosion_damage: u32,
    smoke_time: f32,
    /// Turret charged with a miss when this bomb lands
    scorer: EntityId,
}

impl Bomb {
    pub fn spawn(pos: Vec2, scorer: EntityId) -> Entity {
        let mut body = Body::new(BOMB_SIZE, false);
        body.set_position(pos);
        body.velocity = Vec2::new(0.0, BOMB_FALL_SPEED);
        let bomb = Self {
            explosion_radius: BOMB_EXPLOSION_RADIUS,
            explosion_damage: BOMB_EXPLOSION_DAMAGE,
            smoke_time: 0.0,
            scorer,
        };
        Entity::new(EntityKind::Bomb(bomb), body)
    }

    #[inline]
    pub fn explosion_radius(&self) -> u16 {
        self.explosion_radius
    }

    #[inline]
    pub fn explosion_damage(&self) -> u32 {
        self.explosion_damage
    }

    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        self.smoke_time += world.frame_time();
        let rect = state.body.rect;

        if world.grid_rect_collision(rect).is_some() {
            let center = world_to_cell(rect.center());
            world.explode(
                center.x,
                center.y,
                self.explosion_radius,
                self.explosion_damage,
                DEFAULT_GIB_CHANCE,
            );

            if let Some(turret) = world.lookup_mut(self.scorer).and_then(Entity::as_turret_mut) {
                turret.increment_bombs_missed();
            }

            state.mark_for_deletion();
        } else if rect.pos.y > world.kill_plane_y() {
            state.mark_for_deletion();
        } else if self.smoke_time > SMOKE_INTERVAL {
            let puff = Rect::from_pos_size(
                rect.pos + Vec2::new(rect.size.x * 0.5, -rect.size.y),
                SMOKE_SIZE,
            );
            let smoke = Smoke::spawn(puff, world.effects_rng());
            world.spawn(smoke);
            self.smoke_time -= SMOKE_INTERVAL;
        }

        state.body.integrate(world.gravity_accel(), world.frame_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::block::BlockKind;
    use crate::sim::entities::Turret;

    #[test]
    fn test_bomb_falls_at_constant_speed() {
        let mut world = World::new(Settings::with_grid(100, 400));
        let id = world.spawn(Bomb::spawn(Vec2::new(10.0, 0.0), EntityId::INVALID));
        for _ in 0..4 {
            world.tick();
        }
        let pos = world.lookup(id).expect("bomb").body().position();
        assert!((pos.y - 3.0).abs() < 1e-5);
        assert_eq!(pos.x, 10.0);
    }

    #[test]
    fn test_bomb_explodes_on_ground_and_charges_turret() {
        let mut world = World::new(Settings::with_grid(200, 200));
        for row in 100..200 {
            for col in 0..200 {
                world.create_block(col, row, BlockKind::Dirt);
            }
        }
        let turret = world.spawn(Turret::spawn_at(Vec2::ZERO));
        let bomb = world.spawn(Bomb::spawn(Vec2::new(40.0, 35.0), turret));

        world.tick();

        assert!(world.lookup(bomb).expect("bomb").is_marked_for_deletion());
        let missed = world
            .lookup(turret)
            .and_then(Entity::as_turret)
            .map(Turret::bombs_missed);
        assert_eq!(missed, Some(1));
        // Explosion visual always spawns
        assert!(
            world
                .entities()
                .any(|e| matches!(e.kind(), EntityKind::Explosion(_)))
        );
        // The crater lands on the next state pass
        let before = world.block_count();
        world.tick();
        assert!(world.block_count() < before);
        assert!(world.lookup(bomb).is_none());
    }
}
