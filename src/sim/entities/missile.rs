//! Player missile: arcs under gravity, shoots down bombs

use glam::Vec2;
use rand::Rng;

use super::explosion_fx::ExplosionFx;
use super::gib::Gib;
use super::smoke::Smoke;
use super::{EntityKind, SMOKE_INTERVAL};
use crate::sim::block::{Block, BlockKind};
use crate::sim::entity::{Body, Entity, EntityId, EntityState};
use crate::sim::rect::Rect;
use crate::sim::world::World;

pub const MISSILE_SIZE: Vec2 = Vec2::splat(12.5);
pub const COLLATERAL_MISSILE_SIZE: Vec2 = Vec2::splat(8.0);
/// Launch speed in world units per tick
pub const MISSILE_SPEED: f32 = 11.5;
/// Points awarded to the launching turret per bomb shot down
pub const BOMB_KILL_SCORE: i32 = 100;
/// Explosion visuals are this many times the size of what blew up
const EXPLOSION_SCALE: f32 = 2.5;

#[derive(Debug, Clone)]
pub struct Missile {
    /// Seconds accumulated toward the next smoke puff
    smoke_time: f32,
    /// Turret credited for kills
    scorer: EntityId,
}

impl Missile {
    pub fn spawn(pos: Vec2, size: Vec2, velocity: Vec2, scorer: EntityId) -> Entity {
        let mut body = Body::new(size, true);
        body.set_position(pos);
        body.velocity = velocity;
        // Puff smoke as soon as it leaves the barrel
        let missile = Self {
            smoke_time: SMOKE_INTERVAL,
            scorer,
        };
        Entity::new(EntityKind::Missile(missile), body)
    }

    #[inline]
    pub fn scorer(&self) -> EntityId {
        self.scorer
    }

    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        self.smoke_time += world.frame_time();
        let rect = state.body.rect;

        let hit = world.entity_rect_collision(rect);
        let bomb_rect = world
            .lookup(hit)
            .filter(|entity| entity.is_bomb())
            .map(Entity::rect);
        if let Some(bomb_rect) = bomb_rect {
            self.shoot_down(hit, bomb_rect, state.body.velocity, world);
            state.mark_for_deletion();
            return;
        }

        // Glass and brick don't stop missiles
        let solid = world
            .grid_rect_collision(rect)
            .map(|hit| hit.block.kind())
            .filter(|kind| !matches!(kind, BlockKind::Glass | BlockKind::Brick));

        if solid.is_some() {
            world.spawn(ExplosionFx::spawn(Rect::centered(
                rect.pos,
                EXPLOSION_SCALE * rect.size,
            )));
            state.mark_for_deletion();
        } else if rect.pos.y > world.kill_plane_y() {
            state.mark_for_deletion();
        } else if self.smoke_time > SMOKE_INTERVAL {
            let smoke = Smoke::spawn(rect, world.effects_rng());
            world.spawn(smoke);
            self.smoke_time -= SMOKE_INTERVAL;
        }

        state.body.integrate(world.gravity_accel(), world.frame_time());
    }

    /// Burst the bomb into fire debris and credit the scoring turret
    fn shoot_down(&self, bomb: EntityId, bomb_rect: Rect, velocity: Vec2, world: &mut World) {
        let debris = world.effects_rng().random_range(50..=75);
        for _ in 0..debris {
            let rng = world.effects_rng();
            let pos = bomb_rect.pos + bomb_rect.size * Vec2::new(rng.random(), rng.random());
            let fling = Vec2::new(
                rng.random_range(0.1..0.4) * velocity.x,
                rng.random_range(0.4..1.25) * velocity.y,
            );
            let block = Block::new(BlockKind::FireFx, rng);
            world.spawn(Gib::spawn(pos, block, fling));
        }

        world.spawn(ExplosionFx::spawn(Rect::centered(
            bomb_rect.center(),
            EXPLOSION_SCALE * bomb_rect.size,
        )));

        if let Some(turret) = world.lookup_mut(self.scorer).and_then(Entity::as_turret_mut) {
            turret.add_score(BOMB_KILL_SCORE);
        }

        world.request_removal(bomb);
    }
}
