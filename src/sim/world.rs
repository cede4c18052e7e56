//! The world: block grid, entity registry and the per-step driver
//!
//! The owning game loop calls [`World::tick`] and
//! [`World::render`](crate::renderer) strictly alternately. Entities reach
//! back into the world during their tick for collision queries and to
//! spawn other entities.

use glam::UVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::block::{Block, BlockKind};
use super::collision::{self, BlockHit};
use super::entities::EntityKind;
use super::entity::{Entity, EntityId, WorldId};
use super::grid::BlockGrid;
use super::rect::Rect;
use super::registry::EntityRegistry;
use super::worldgen::WorldGen;
use crate::consts::CELL_SIZE;
use crate::error::ConfigError;
use crate::renderer::BlockRaster;
use crate::settings::Settings;

pub struct World {
    id: WorldId,
    settings: Settings,
    pub(crate) grid: BlockGrid,
    pub(crate) raster: BlockRaster,
    pub(crate) entities: EntityRegistry,
    /// Cosmetic stream: gibs, smoke jitter, flicker, raster refresh order
    pub(crate) effects_rng: Pcg32,
}

impl World {
    /// Build a world. Invalid settings are a caller bug and panic.
    pub fn new(settings: Settings) -> Self {
        match Self::try_new(settings) {
            Ok(world) => world,
            Err(err) => panic!("invalid world settings: {err}"),
        }
    }

    pub fn try_new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let (width, height) = (settings.grid_width, settings.grid_height);
        let world = Self {
            id: WorldId::next(),
            grid: BlockGrid::new(width, height, settings.effects_seed.wrapping_add(1)),
            raster: BlockRaster::new(width, height),
            entities: EntityRegistry::new(),
            effects_rng: Pcg32::seed_from_u64(settings.effects_seed),
            settings,
        };

        log::info!("World created ({}x{} blocks)", width, height);
        Ok(world)
    }

    #[inline]
    pub fn id(&self) -> WorldId {
        self.id
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    #[inline]
    pub fn gravity_accel(&self) -> f32 {
        self.settings.gravity_accel
    }

    #[inline]
    pub fn frame_time(&self) -> f32 {
        self.settings.frame_time
    }

    /// Entities that fall past the bottom of the grid are discarded
    #[inline]
    pub fn kill_plane_y(&self) -> f32 {
        self.grid.height() as f32 * CELL_SIZE
    }

    #[inline]
    pub fn effects_rng(&mut self) -> &mut Pcg32 {
        &mut self.effects_rng
    }

    // --- blocks ---

    #[inline]
    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    #[inline]
    pub fn raster(&self) -> &BlockRaster {
        &self.raster
    }

    pub fn cell_at(&self, col: u32, row: u32) -> Option<&Block> {
        self.grid.get(col, row)
    }

    pub fn cell_at_mut(&mut self, col: u32, row: u32) -> Option<&mut Block> {
        self.grid.get_mut(col, row)
    }

    pub fn create_block(&mut self, col: u32, row: u32, kind: BlockKind) -> &mut Block {
        self.grid.create(col, row, kind)
    }

    pub fn remove_block(&mut self, col: u32, row: u32) {
        self.grid.remove(col, row);
    }

    pub fn mark_dirty(&mut self, col: u32, row: u32) {
        self.grid.mark_dirty(col, row);
    }

    pub fn block_count(&self) -> usize {
        self.grid.block_count()
    }

    pub fn set_raster_tracking(&mut self, enabled: bool) {
        self.grid.set_raster_tracking(enabled);
    }

    /// Redraw the whole raster cache from the grid
    pub fn refresh_raster(&mut self) {
        self.raster.refresh_all(&mut self.grid, &mut self.effects_rng);
    }

    // --- entities ---

    /// Admit an entity, returning [`EntityId::INVALID`] for an empty handle
    pub fn admit(&mut self, entity: Option<Entity>) -> EntityId {
        self.entities.admit(entity, self.id)
    }

    /// Admit a detached entity
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.admit(Some(entity))
    }

    /// Live entity by id. The entity being ticked is checked out of its slot,
    /// so its own id reads as `None` here until the tick returns; use
    /// [`World::is_live`] for a presence check that covers it.
    pub fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn lookup_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Whether `id` is still held, including while it is being ticked
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Flag `id` for removal at the start of the next tick pass
    pub fn request_removal(&mut self, id: EntityId) -> bool {
        self.entities.request_removal(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Ids taking part in entity-vs-entity collision, unordered
    pub fn non_fx_ids(&self) -> &[EntityId] {
        self.entities.non_fx_ids()
    }

    /// Fire the turret `id`. False if it is not a turret or still cooling down.
    pub fn fire_turret(&mut self, id: EntityId) -> bool {
        let Some((slot, mut entity)) = self.entities.checkout_id(id) else {
            return false;
        };
        let fired = match &mut entity.kind {
            EntityKind::Turret(turret) => turret.fire_missile(&entity.state, self),
            _ => false,
        };
        self.entities.restore(slot, entity);
        fired
    }

    // --- collision ---

    pub fn grid_rect_collision(&self, rect: Rect) -> Option<BlockHit<'_>> {
        collision::grid_rect_collision(&self.grid, rect)
    }

    pub fn entity_rect_collision(&self, rect: Rect) -> EntityId {
        collision::entity_rect_collision(&self.entities, rect)
    }

    // --- lifecycle ---

    /// One simulation step: settle destroyed blocks, then erase flagged
    /// entities and tick the rest. Entities admitted during the pass first
    /// tick on the next one.
    pub fn tick(&mut self) {
        self.grid.process_state_updates();

        let first_new = self.entities.peek_next_id();
        for slot in 0..self.entities.slot_count() {
            let Some(mut entity) = self.entities.checkout(slot) else {
                continue;
            };

            if entity.is_marked_for_deletion() {
                self.entities.erase(slot, entity);
                continue;
            }

            if entity.id() < first_new {
                entity.tick(self);
            }
            self.entities.restore(slot, entity);
        }
    }

    /// Full reset between games: no blocks, no entities, ids restart
    pub fn clear(&mut self) {
        log::info!("Clearing world..");
        self.entities.clear();
        self.grid.clear();
        self.raster.clear();
    }

    /// Clear and regenerate terrain and buildings from `seed`
    pub fn generate_new_world(&mut self, seed: u64) {
        self.grid.set_raster_tracking(false);

        self.clear();
        WorldGen::new(seed, self.settings.generator.clone()).generate(&mut self.grid);

        self.refresh_raster();
        self.grid.set_raster_tracking(true);
    }

    /// Cell under a world-space point, if it is on the grid
    pub fn cell_under(&self, pos: glam::Vec2) -> Option<UVec2> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let cell = crate::world_to_cell(pos);
        self.grid.contains(cell.x, cell.y).then_some(cell)
    }
}
