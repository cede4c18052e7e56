//! Block Siege - destructible block-grid artillery arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block grid, entities, collisions, explosions, world gen)
//! - `renderer`: Draw sink abstraction, block raster cache, entity drawing
//! - `settings`: Data-driven world and generator configuration

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;
pub use sim::{Entity, EntityId, World};

use glam::{UVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in world units
    pub const CELL_SIZE: f32 = 0.5;

    /// Fixed simulation rate (one tick + one render per displayed frame)
    pub const FRAME_RATE: u32 = 30;
    /// Fixed simulation timestep in seconds
    pub const FRAME_TIME: f32 = 1.0 / FRAME_RATE as f32;

    /// Gravity applied to per-tick velocity, in velocity units per second
    pub const GRAVITY_ACCEL: f32 = 4.5;

    /// Playfield dimensions in world units
    pub const PLAYFIELD_WIDTH: f32 = 1024.0;
    pub const PLAYFIELD_HEIGHT: f32 = 576.0;

    /// Default grid dimensions (playfield / cell size)
    pub const GRID_WIDTH: u32 = (PLAYFIELD_WIDTH / CELL_SIZE) as u32;
    pub const GRID_HEIGHT: u32 = (PLAYFIELD_HEIGHT / CELL_SIZE) as u32;

    /// Raster cache refreshes per render pass
    pub const RASTER_UPDATES_PER_RENDER: usize = 3000;
    /// Backlog multiple of the per-pass budget that forces a full catch-up
    pub const RASTER_CATCHUP_FACTOR: usize = 8;

    /// Default chance that a destroyed cell throws a gib
    pub const DEFAULT_GIB_CHANCE: f64 = 0.2;
}

/// World-space top-left corner of a grid cell
#[inline]
pub fn cell_to_world(cell: UVec2) -> Vec2 {
    cell.as_vec2() * consts::CELL_SIZE
}

/// Grid cell containing a world-space point (negative coordinates clamp to 0)
#[inline]
pub fn world_to_cell(pos: Vec2) -> UVec2 {
    // `as` saturates, so points left of or above the grid land on column/row 0
    UVec2::new(
        (pos.x / consts::CELL_SIZE) as u32,
        (pos.y / consts::CELL_SIZE) as u32,
    )
}

/// Convert an SFML-style clockwise angle in degrees to a unit direction
#[inline]
pub fn degrees_to_direction(degrees: f32) -> Vec2 {
    let rads = degrees.to_radians();
    Vec2::new(rads.cos(), rads.sin())
}
