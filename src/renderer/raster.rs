//! Cached block image, one texel per grid cell
//!
//! Repainting the whole grid every frame is far too slow, so only cells on
//! the grid's raster dirty list are redrawn, a bounded number per pass.

use rand::Rng;

use super::Rgba;
use super::palette::block_color;
use crate::sim::grid::BlockGrid;

pub struct BlockRaster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl BlockRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
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

    pub fn pixel(&self, col: u32, row: u32) -> Rgba {
        self.pixels[self.index(col, row)]
    }

    /// Row-major texels
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        assert!(
            col < self.width && row < self.height,
            "raster texel ({col}, {row}) out of range"
        );
        col as usize + self.width as usize * row as usize
    }

    /// Redraw one texel from the grid; empty cells become transparent
    fn paint<R: Rng + ?Sized>(&mut self, grid: &BlockGrid, col: u32, row: u32, rng: &mut R) {
        let color = grid
            .get(col, row)
            .map_or(Rgba::TRANSPARENT, |block| block_color(block, rng));
        let index = self.index(col, row);
        self.pixels[index] = color;
    }

    /// Repaint up to `budget` stale cells in arbitrary order. A backlog
    /// beyond `budget * catchup_factor` is drained in full instead.
    /// Returns the number of cells repainted.
    pub fn flush_pending<R: Rng + ?Sized>(
        &mut self,
        grid: &mut BlockGrid,
        rng: &mut R,
        budget: usize,
        catchup_factor: usize,
    ) -> usize {
        debug_assert_eq!((self.width, self.height), (grid.width(), grid.height()));

        let pending = grid.pending_raster_updates();
        let catch_up = pending > budget.saturating_mul(catchup_factor);
        if catch_up {
            log::warn!("Too many raster updates scheduled ({pending}), forcing catch-up");
        }
        let limit = if catch_up { pending } else { pending.min(budget) };

        let mut painted = 0;
        while painted < limit {
            let Some(cell) = grid.pop_raster_update(rng) else {
                break;
            };
            self.paint(grid, cell.x, cell.y, rng);
            painted += 1;
        }
        painted
    }

    /// Repaint every cell row by row and drop the dirty list
    pub fn refresh_all<R: Rng + ?Sized>(&mut self, grid: &mut BlockGrid, rng: &mut R) {
        log::info!(
            "Performing full raster refresh ({}x{})..",
            grid.width(),
            grid.height()
        );
        grid.clear_raster_updates();
        self.clear();

        for (cell, block) in grid.blocks() {
            let index = self.index(cell.x, cell.y);
            self.pixels[index] = block_color(block, rng);
        }
    }
}
