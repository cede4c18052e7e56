//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - World generation from a seeded generator stream
//! - Cosmetic randomness from a separate effects stream
//! - No platform dependencies; drawing goes through [`crate::renderer::DrawSink`]

pub mod block;
pub mod collision;
pub mod entities;
pub mod entity;
pub mod explosion;
pub mod grid;
pub mod rect;
pub mod registry;
pub mod world;
pub mod worldgen;

pub use block::{Block, BlockKind};
pub use collision::{BlockHit, entity_rect_collision, grid_rect_collision};
pub use entities::{Bomb, EntityKind, ExplosionFx, Gib, Missile, Smoke, Turret};
pub use entity::{Body, Entity, EntityId, EntityState, WorldId};
pub use explosion::falloff_damage;
pub use grid::BlockGrid;
pub use rect::Rect;
pub use registry::EntityRegistry;
pub use world::World;
pub use worldgen::{BuildingConfig, GenConfig, TerrainConfig, WorldGen};
