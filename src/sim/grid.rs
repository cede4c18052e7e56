//! Fixed-size block grid with change tracking
//!
//! Every mutation marks the touched cell dirty twice over: once for the
//! state pass (destroyed blocks are removed on the next tick) and, while
//! raster tracking is enabled, once for the render cache. Both queues may
//! hold duplicates.

use std::collections::VecDeque;

use glam::UVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::block::{Block, BlockKind};

pub struct BlockGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<Block>>,
    /// Cells to reconcile on the next state pass
    state_updates: VecDeque<UVec2>,
    /// Cells whose raster texel is stale
    raster_updates: Vec<UVec2>,
    track_raster: bool,
    /// Cosmetic tint stream for newly created blocks
    tint_rng: Pcg32,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32, tint_seed: u64) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            state_updates: VecDeque::new(),
            raster_updates: Vec::new(),
            track_raster: true,
            tint_rng: Pcg32::seed_from_u64(tint_seed),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, col: u32, row: u32) -> bool {
        col < self.width && row < self.height
    }

    /// Row-major index. Out-of-range coordinates are a caller bug.
    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        assert!(
            self.contains(col, row),
            "block index ({col}, {row}) out of range for {}x{} grid",
            self.width,
            self.height
        );
        col as usize + self.width as usize * row as usize
    }

    pub fn get(&self, col: u32, row: u32) -> Option<&Block> {
        self.cells[self.index(col, row)].as_ref()
    }

    pub fn get_mut(&mut self, col: u32, row: u32) -> Option<&mut Block> {
        let index = self.index(col, row);
        self.cells[index].as_mut()
    }

    /// Create a full-health block, replacing whatever was there
    pub fn create(&mut self, col: u32, row: u32, kind: BlockKind) -> &mut Block {
        let index = self.index(col, row);
        let block = Block::new(kind, &mut self.tint_rng);
        self.mark_dirty(col, row);
        self.cells[index].insert(block)
    }

    pub fn remove(&mut self, col: u32, row: u32) {
        let index = self.index(col, row);
        self.cells[index] = None;
        self.mark_dirty(col, row);
    }

    pub fn mark_dirty(&mut self, col: u32, row: u32) {
        let pos = UVec2::new(col, row);
        self.state_updates.push_back(pos);
        if self.track_raster {
            self.raster_updates.push(pos);
        }
    }

    /// Remove every block whose health reached zero since the last pass
    pub fn process_state_updates(&mut self) {
        while let Some(pos) = self.state_updates.pop_front() {
            if self.get(pos.x, pos.y).is_some_and(Block::is_destroyed) {
                // Re-queues the cell; the second visit finds it empty
                self.remove(pos.x, pos.y);
            }
        }
    }

    /// Empty every cell and drop pending change tracking
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.state_updates.clear();
        self.raster_updates.clear();
    }

    #[inline]
    pub fn raster_tracking(&self) -> bool {
        self.track_raster
    }

    pub fn set_raster_tracking(&mut self, enabled: bool) {
        self.track_raster = enabled;
    }

    #[inline]
    pub fn pending_state_updates(&self) -> usize {
        self.state_updates.len()
    }

    #[inline]
    pub fn pending_raster_updates(&self) -> usize {
        self.raster_updates.len()
    }

    /// Take an arbitrary stale cell (swap-and-pop, order is irrelevant)
    pub fn pop_raster_update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<UVec2> {
        if self.raster_updates.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.raster_updates.len());
        Some(self.raster_updates.swap_remove(i))
    }

    pub fn clear_raster_updates(&mut self) {
        self.raster_updates.clear();
    }

    /// Number of occupied cells
    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Occupied cells in row-major order
    pub fn blocks(&self) -> impl Iterator<Item = (UVec2, &Block)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|block| (UVec2::new((i % width) as u32, (i / width) as u32), block))
        })
    }
}
