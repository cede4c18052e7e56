//! Explosion flash, played back as a sprite animation

use super::EntityKind;
use crate::sim::entity::{Body, Entity, EntityState};
use crate::sim::rect::Rect;
use crate::sim::world::World;

pub const EXPLOSION_FADE_PER_SECOND: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct ExplosionFx {
    /// 1.0 when spawned, removed at 0.0
    density: f32,
}

impl ExplosionFx {
    pub fn spawn(rect: Rect) -> Entity {
        let mut body = Body::new(rect.size, false);
        body.set_position(rect.pos);
        Entity::new(EntityKind::Explosion(Self { density: 1.0 }), body)
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Animation frame to show out of `frame_count`, if there are any
    pub fn animation_frame(&self, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        let progress = (1.0 - self.density).max(0.0);
        Some(((progress * frame_count as f32) as usize).min(frame_count - 1))
    }

    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        state.body.integrate(world.gravity_accel(), world.frame_time());

        self.density -= EXPLOSION_FADE_PER_SECOND * world.frame_time();
        self.density = self.density.min(1.0);
        if self.density <= 0.0 {
            state.mark_for_deletion();
        }
    }
}
