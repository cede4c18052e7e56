//! Circular blast damage with debris

use glam::{UVec2, Vec2};
use rand::Rng;

use super::block::BlockKind;
use super::entities::{ExplosionFx, Gib};
use super::rect::Rect;
use super::world::World;
use crate::cell_to_world;
use crate::consts::CELL_SIZE;

/// Cells inside the blast always take at least this fraction off the
/// centre damage as falloff, so the centre cell gets 90%.
const MIN_FALLOFF: f32 = 0.1;

/// Damage dealt to a cell at squared distance `dist_sq` from the centre
pub fn falloff_damage(center_damage: u32, dist_sq: u64, radius_sq: u64) -> u32 {
    let falloff = (dist_sq as f32 / radius_sq as f32).max(MIN_FALLOFF);
    (center_damage as f32 * (1.0 - falloff)) as u32
}

impl World {
    /// Damage every block within `radius` cells of (`col`, `row`), throwing
    /// a gib for destroyed (or water) cells with probability `gib_chance`.
    /// Always spawns the explosion flash. Blocks are only removed on the
    /// next state pass.
    pub fn explode(&mut self, col: u32, row: u32, radius: u16, center_damage: u32, gib_chance: f64) {
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(col), i64::from(row));
        let width = i64::from(self.grid.width());
        let height = i64::from(self.grid.height());
        if r == 0 || cx - r >= width || cy - r >= height {
            return;
        }

        let start_x = (cx - r).max(0);
        let start_y = (cy - r).max(0);
        let end_x = (cx + r + 1).min(width);
        let end_y = (cy + r + 1).min(height);
        let radius_sq = (r * r) as u64;
        let gib_chance = gib_chance.clamp(0.0, 1.0);

        let mut hit = 0usize;
        let mut gibs = Vec::new();
        for y in start_y..end_y {
            for x in start_x..end_x {
                let dist_sq = ((x - cx).pow(2) + (y - cy).pow(2)) as u64;
                if dist_sq > radius_sq {
                    continue;
                }

                let (x, y) = (x as u32, y as u32);
                let Some(block) = self.grid.get_mut(x, y) else {
                    continue;
                };
                block.damage(falloff_damage(center_damage, dist_sq, radius_sq));
                let block = *block;
                self.grid.mark_dirty(x, y);
                hit += 1;

                let shatters = block.is_destroyed() || block.kind() == BlockKind::Water;
                if shatters && self.effects_rng.random_bool(gib_chance) {
                    let velocity = Vec2::new(
                        self.effects_rng.random_range(-2.0..2.0),
                        self.effects_rng.random_range(-5.0..-1.0),
                    );
                    gibs.push(Gib::spawn(cell_to_world(UVec2::new(x, y)), block, velocity));
                }
            }
        }

        log::debug!(
            "Explosion at ({col}, {row}) r={radius}: {hit} blocks hit, {} gibs",
            gibs.len()
        );
        for gib in gibs {
            self.spawn(gib);
        }

        let extent = 2.0 * CELL_SIZE * radius as f32;
        let flash = Rect::new(
            (cx - r) as f32 * CELL_SIZE,
            (cy - r) as f32 * CELL_SIZE,
            extent,
            extent,
        );
        self.spawn(ExplosionFx::spawn(flash));
    }
}
