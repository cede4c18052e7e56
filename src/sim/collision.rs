//! Rectangle collision queries against the block grid and the entity set
//!
//! Both queries report the first hit in scan order, not the nearest one.

use glam::UVec2;

use super::block::Block;
use super::entity::EntityId;
use super::grid::BlockGrid;
use super::rect::Rect;
use super::registry::EntityRegistry;
use crate::consts::CELL_SIZE;

/// A solid block found by [`grid_rect_collision`]
#[derive(Debug, Clone, Copy)]
pub struct BlockHit<'a> {
    pub cell: UVec2,
    pub block: &'a Block,
}

/// Inclusive-exclusive cell range a world rectangle may touch, clipped to
/// the grid. `None` if the rectangle lies wholly outside it or has NaN bounds.
pub fn cell_span(grid: &BlockGrid, rect: Rect) -> Option<(UVec2, UVec2)> {
    let rect = rect.normalized();

    // Stay in float space until clipped; huge or infinite bounds must not overflow
    let start_x = (rect.left() / CELL_SIZE).floor();
    let start_y = (rect.top() / CELL_SIZE).floor();
    // One cell of slack on the far edge covers partial overlap
    let end_x = (rect.right() / CELL_SIZE).ceil() + 1.0;
    let end_y = (rect.bottom() / CELL_SIZE).ceil() + 1.0;
    if [start_x, start_y, end_x, end_y].iter().any(|v| v.is_nan()) {
        return None;
    }

    let width = grid.width() as f32;
    let height = grid.height() as f32;
    if end_x <= 0.0 || start_x >= width || end_y <= 0.0 || start_y >= height {
        return None;
    }

    let start = UVec2::new(start_x.max(0.0) as u32, start_y.max(0.0) as u32);
    let end = UVec2::new(end_x.min(width) as u32, end_y.min(height) as u32);
    Some((start, end))
}

/// First intact block the rectangle touches, scanning row-major
pub fn grid_rect_collision(grid: &BlockGrid, rect: Rect) -> Option<BlockHit<'_>> {
    let (start, end) = cell_span(grid, rect)?;

    for row in start.y..end.y {
        for col in start.x..end.x {
            if let Some(block) = grid.get(col, row) {
                if !block.is_destroyed() {
                    return Some(BlockHit {
                        cell: UVec2::new(col, row),
                        block,
                    });
                }
            }
        }
    }

    None
}

/// First non-effects entity whose rectangle overlaps `rect`, or
/// [`EntityId::INVALID`]. Entities checked out for ticking are skipped.
pub fn entity_rect_collision(entities: &EntityRegistry, rect: Rect) -> EntityId {
    entities
        .non_fx_ids()
        .iter()
        .copied()
        .find(|&id| {
            entities
                .get(id)
                .is_some_and(|entity| entity.rect().intersects(&rect))
        })
        .unwrap_or(EntityId::INVALID)
}
