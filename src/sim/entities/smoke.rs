//! Smoke puffs left behind by missiles and bombs

use glam::Vec2;
use rand::Rng;

use super::EntityKind;
use crate::sim::entity::{Body, Entity, EntityState};
use crate::sim::rect::Rect;
use crate::sim::world::World;

pub const SMOKE_SIZE: Vec2 = Vec2::splat(10.0);
pub const SMOKE_INITIAL_DENSITY: f32 = 0.15;
const FADE_PER_SECOND: f32 = 0.08;
const SPIN_DEGREES_PER_SECOND: f32 = 45.0;
/// Size multiplier per tick is this times the frame time
const GROWTH_RATE: f32 = 30.8;

#[derive(Debug, Clone)]
pub struct Smoke {
    density: f32,
    /// Degrees
    angle: f32,
}

impl Smoke {
    pub fn spawn<R: Rng + ?Sized>(rect: Rect, rng: &mut R) -> Entity {
        let smoke = Self {
            density: SMOKE_INITIAL_DENSITY,
            angle: rng.random_range(0.0..360.0),
        };
        let mut body = Body::new(rect.size, false);
        body.set_position(rect.pos);
        body.velocity = Vec2::new(rng.random_range(-0.2..0.2), rng.random_range(-1.5..-0.5));
        Entity::new(EntityKind::Smoke(smoke), body)
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = density;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Smoke billows in place; its drift velocity is not integrated
    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        let dt = world.frame_time();
        state.body.rect.size *= GROWTH_RATE * dt;
        self.density -= FADE_PER_SECOND * dt;
        self.angle += SPIN_DEGREES_PER_SECOND * dt;

        if self.density <= 0.0 {
            state.mark_for_deletion();
        }
    }
}
