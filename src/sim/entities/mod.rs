//! Entity kinds and their per-tick behaviour
//!
//! The set of kinds is closed. Dispatch is a single match on [`EntityKind`];
//! every kind's `tick` receives the shared [`EntityState`] and the owning
//! world, through which it queries collisions and spawns other entities.

mod bomb;
mod explosion_fx;
mod gib;
mod missile;
mod smoke;
mod turret;

pub use bomb::{BOMB_EXPLOSION_DAMAGE, BOMB_EXPLOSION_RADIUS, BOMB_FALL_SPEED, BOMB_SIZE, Bomb};
pub use explosion_fx::{EXPLOSION_FADE_PER_SECOND, ExplosionFx};
pub use gib::{GIB_SIZE, Gib};
pub use missile::{
    BOMB_KILL_SCORE, COLLATERAL_MISSILE_SIZE, MISSILE_SIZE, MISSILE_SPEED, Missile,
};
pub use smoke::{SMOKE_INITIAL_DENSITY, SMOKE_SIZE, Smoke};
pub use turret::{TURRET_SIZE, Turret};

use super::entity::Entity;
use super::world::World;

/// Seconds between smoke puffs trailed by missiles and bombs
pub const SMOKE_INTERVAL: f32 = 0.4;

#[derive(Debug, Clone)]
pub enum EntityKind {
    Turret(Turret),
    Missile(Missile),
    Bomb(Bomb),
    Gib(Gib),
    Smoke(Smoke),
    Explosion(ExplosionFx),
}

impl EntityKind {
    /// Cosmetic kinds never take part in entity-vs-entity collision
    pub fn is_fx_only(&self) -> bool {
        matches!(
            self,
            EntityKind::Gib(_) | EntityKind::Smoke(_) | EntityKind::Explosion(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Turret(_) => "turret",
            EntityKind::Missile(_) => "missile",
            EntityKind::Bomb(_) => "bomb",
            EntityKind::Gib(_) => "gib",
            EntityKind::Smoke(_) => "smoke",
            EntityKind::Explosion(_) => "explosion",
        }
    }
}

impl Entity {
    /// Advance one simulation step
    pub(crate) fn tick(&mut self, world: &mut World) {
        debug_assert_eq!(self.world(), Some(world.id()), "ticked by a foreign world");

        let state = &mut self.state;
        match &mut self.kind {
            EntityKind::Turret(turret) => turret.tick(state, world),
            EntityKind::Missile(missile) => missile.tick(state, world),
            EntityKind::Bomb(bomb) => bomb.tick(state, world),
            EntityKind::Gib(gib) => gib.tick(state, world),
            EntityKind::Smoke(smoke) => smoke.tick(state, world),
            EntityKind::Explosion(fx) => fx.tick(state, world),
        }
    }

    pub fn as_turret(&self) -> Option<&Turret> {
        match &self.kind {
            EntityKind::Turret(turret) => Some(turret),
            _ => None,
        }
    }

    pub fn as_turret_mut(&mut self) -> Option<&mut Turret> {
        match &mut self.kind {
            EntityKind::Turret(turret) => Some(turret),
            _ => None,
        }
    }

    pub fn as_bomb(&self) -> Option<&Bomb> {
        match &self.kind {
            EntityKind::Bomb(bomb) => Some(bomb),
            _ => None,
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self.kind, EntityKind::Bomb(_))
    }
}
