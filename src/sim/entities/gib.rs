//! Block debris thrown by explosions

use glam::Vec2;

use super::EntityKind;
use crate::consts::CELL_SIZE;
use crate::sim::block::Block;
use crate::sim::entity::{Body, Entity, EntityState};
use crate::sim::world::World;

pub const GIB_SIZE: Vec2 = Vec2::splat(4.0 * CELL_SIZE);

/// Carries a detached copy of the block it was blown out of
#[derive(Debug, Clone)]
pub struct Gib {
    block: Block,
}

impl Gib {
    pub fn spawn(pos: Vec2, block: Block, velocity: Vec2) -> Entity {
        let mut body = Body::new(GIB_SIZE, true);
        body.set_position(pos);
        body.velocity = velocity;
        Entity::new(EntityKind::Gib(Self { block }), body)
    }

    #[inline]
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub(crate) fn tick(&mut self, state: &mut EntityState, world: &mut World) {
        state.body.integrate(world.gravity_accel(), world.frame_time());

        let rect = state.body.rect;
        if world.grid_rect_collision(rect).is_some() || rect.pos.y > world.kill_plane_y() {
            state.mark_for_deletion();
        }
    }
}
