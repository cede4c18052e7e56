//! Seeded terrain and building generation
//!
//! All randomness comes from the generator's own PCG stream, so a seed and
//! grid size always reproduce the same layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::BlockKind;
use super::grid::BlockGrid;
use crate::consts::CELL_SIZE;
use crate::error::ConfigError;

/// Rolling terrain surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Highest surface row as a fraction of grid height
    pub top_min_frac: f32,
    /// Lowest surface row as a fraction of grid height
    pub top_max_frac: f32,
    /// Surface step per column, in rows
    pub step_min: i32,
    pub step_max: i32,
    /// Chance per column that the surface steps
    pub step_chance: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            top_min_frac: 0.65,
            top_max_frac: 0.825,
            step_min: -2,
            step_max: 2,
            step_chance: 0.25,
        }
    }
}

/// Buildings stamped onto the terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    /// Building width range in cells
    pub width_min: u32,
    pub width_max: u32,
    /// Building height range in cells
    pub height_min: u32,
    pub height_max: u32,
    /// Rows a building sinks below the terrain surface
    pub foundation: u32,
    /// Half-width in cells of the building-free strip around the centre
    pub middle_clearance: u32,
    /// Chance per eligible column to start a building
    pub chance: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            width_min: 24,
            width_max: 24,
            height_min: 20,
            height_max: 110,
            foundation: 20,
            middle_clearance: (100.0 / CELL_SIZE) as u32,
            chance: 0.15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub terrain: TerrainConfig,
    pub buildings: BuildingConfig,
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("terrain.top_min_frac", self.top_min_frac),
            ("terrain.top_max_frac", self.top_max_frac),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFraction {
                    field,
                    value: value.into(),
                });
            }
        }
        ConfigError::check_range("terrain.top", self.top_min_frac, self.top_max_frac)?;
        ConfigError::check_range("terrain.step", self.step_min, self.step_max)?;
        ConfigError::check_probability("terrain.step_chance", self.step_chance)
    }
}

impl BuildingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("buildings.width", self.width_min, self.width_max)?;
        ConfigError::check_range("buildings.height", self.height_min, self.height_max)?;
        ConfigError::check_probability("buildings.chance", self.chance)
    }
}

impl GenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.buildings.validate()
    }
}

pub struct WorldGen {
    seed: u64,
    rng: Pcg32,
    config: GenConfig,
}

impl WorldGen {
    pub fn new(seed: u64, config: GenConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    /// Fill `grid` with terrain, then buildings on top of it.
    ///
    /// Panics if either phase's configuration has an inverted range.
    pub fn generate(&mut self, grid: &mut BlockGrid) {
        log::info!("Generating world (seed: {})..", self.seed);
        self.generate_terrain(grid);
        self.generate_buildings(grid);
        log::info!("World generated: {} blocks", grid.block_count());
    }

    fn generate_terrain(&mut self, grid: &mut BlockGrid) {
        let cfg = self.config.terrain.clone();
        if let Err(err) = cfg.validate() {
            panic!("cannot generate terrain: {err}");
        }

        let height = grid.height();
        let top_min = (cfg.top_min_frac * height as f32) as u32;
        let top_max = (cfg.top_max_frac * height as f32) as u32;
        log::debug!(
            "Generating terrain (top {top_min}..={top_max}, step {}..={}, chance {})",
            cfg.step_min,
            cfg.step_max,
            cfg.step_chance
        );

        let mut top = self.rng.random_range(top_min..=top_max);
        for col in 0..grid.width() {
            let depth = (height - top) as f32;
            for row in top..height {
                // 0 at the surface, approaching 1 at the bottom
                let frac = (row - top) as f32 / depth;
                let kind = if frac <= 0.015 {
                    BlockKind::Grass
                } else if frac <= 0.2 {
                    BlockKind::Dirt
                } else if frac <= 0.9 {
                    BlockKind::Stone
                } else {
                    BlockKind::Water
                };
                grid.create(col, row, kind);
            }

            if self.rng.random_bool(cfg.step_chance) {
                let step = self.rng.random_range(cfg.step_min..=cfg.step_max);
                top = (i64::from(top) + i64::from(step)).clamp(i64::from(top_min), i64::from(top_max))
                    as u32;
            }
        }
    }

    fn generate_buildings(&mut self, grid: &mut BlockGrid) {
        let cfg = self.config.buildings.clone();
        if let Err(err) = cfg.validate() {
            panic!("cannot generate buildings: {err}");
        }
        log::debug!("Generating buildings ({cfg:?})");

        let (width, height) = (grid.width(), grid.height());
        let clear_min = (width / 2).saturating_sub(cfg.middle_clearance);
        let clear_max = (width / 2).saturating_add(cfg.middle_clearance);
        let search_rows = height.saturating_sub(cfg.foundation.saturating_add(1));

        let mut buildings = 0usize;
        let mut col = 0;
        while col < width {
            let outside_clearance = col < clear_min || col > clear_max;
            if outside_clearance && self.rng.random_bool(cfg.chance) {
                let w = self.rng.random_range(cfg.width_min..=cfg.width_max);
                let h = self.rng.random_range(cfg.height_min..=cfg.height_max);

                let surface = (0..search_rows).find(|&row| grid.get(col, row).is_some());
                if let Some(surface) = surface {
                    let bottom = surface.saturating_add(cfg.foundation);
                    Self::stamp_building(grid, col, bottom, w, h);
                    buildings += 1;
                    // Building span plus a one-column gap
                    col = col.saturating_add(w).saturating_add(2);
                    continue;
                }
            }
            col += 1;
        }

        log::debug!("Placed {buildings} buildings");
    }

    /// Brick shell with a regular window pattern, filling only empty cells
    fn stamp_building(grid: &mut BlockGrid, left: u32, bottom: u32, w: u32, h: u32) {
        let top = bottom.saturating_sub(h);
        let right = left.saturating_add(w).min(grid.width() - 1);
        let (left_i, bottom_i) = (i64::from(left), i64::from(bottom));
        let (w_i, h_i) = (i64::from(w), i64::from(h));

        for row in (top..=bottom).rev() {
            for col in left..=right {
                if grid.get(col, row).is_some() {
                    continue;
                }
                let (x, y) = (i64::from(col), i64::from(row));
                let window = (x - left_i) % 10 >= 6
                    && (y - bottom_i).rem_euclid(16) >= 12
                    && x <= left_i + w_i - 2
                    && y > bottom_i - h_i + 4;
                let kind = if window {
                    BlockKind::Glass
                } else {
                    BlockKind::Brick
                };
                grid.create(col, row, kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, width: u32, height: u32, config: GenConfig) -> BlockGrid {
        let mut grid = BlockGrid::new(width, height, 7);
        WorldGen::new(seed, config).generate(&mut grid);
        grid
    }

    fn layout(grid: &BlockGrid) -> Vec<(u32, u32, BlockKind)> {
        grid.blocks().map(|(cell, block)| (cell.x, cell.y, block.kind())).collect()
    }

    fn no_buildings() -> GenConfig {
        GenConfig {
            buildings: BuildingConfig {
                chance: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = generate(42, 512, 288, GenConfig::default());
        let b = generate(42, 512, 288, GenConfig::default());
        assert_eq!(layout(&a), layout(&b));

        let c = generate(43, 512, 288, GenConfig::default());
        assert_ne!(layout(&a), layout(&c));
    }

    #[test]
    fn test_terrain_bands_within_bounds() {
        let (width, height) = (64, 200);
        let grid = generate(3, width, height, no_buildings());
        let top_min = (0.65 * height as f32) as u32;
        let top_max = (0.825 * height as f32) as u32;

        for col in 0..width {
            let surface = (0..height)
                .find(|&row| grid.get(col, row).is_some())
                .expect("every column has terrain");
            assert!((top_min..=top_max).contains(&surface), "col {col} surface {surface}");

            // Solid all the way down, grass on top, water at the bottom
            assert!((surface..height).all(|row| grid.get(col, row).is_some()));
            assert_eq!(grid.get(col, surface).map(|b| b.kind()), Some(BlockKind::Grass));
            assert_eq!(grid.get(col, height - 1).map(|b| b.kind()), Some(BlockKind::Water));
        }
    }

    #[test]
    fn test_surface_steps_are_bounded() {
        let grid = generate(11, 300, 200, no_buildings());
        let surface = |col| (0..200).find(|&row| grid.get(col, row).is_some()).unwrap_or(200);
        for col in 1..300 {
            let diff = surface(col) as i64 - surface(col - 1) as i64;
            assert!(diff.abs() <= 2, "col {col} stepped {diff}");
        }
    }

    #[test]
    fn test_buildings_avoid_clearance() {
        let config = GenConfig {
            buildings: BuildingConfig {
                chance: 1.0,
                middle_clearance: 60,
                ..Default::default()
            },
            ..Default::default()
        };
        let (width, height) = (400, 300);
        let grid = generate(5, width, height, config);

        let bricks: Vec<u32> = grid
            .blocks()
            .filter(|(_, block)| matches!(block.kind(), BlockKind::Brick | BlockKind::Glass))
            .map(|(cell, _)| cell.x)
            .collect();
        assert!(!bricks.is_empty());
        // A building started left of the strip may overhang into it by its width
        let (clear_min, clear_max) = (width / 2 - 60, width / 2 + 60);
        assert!(bricks.iter().all(|&x| x < clear_min + 24 || x > clear_max));
    }

    #[test]
    fn test_buildings_have_windows() {
        let config = GenConfig {
            buildings: BuildingConfig {
                chance: 1.0,
                height_min: 60,
                height_max: 60,
                middle_clearance: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let grid = generate(9, 200, 300, config);
        assert!(grid.blocks().any(|(_, b)| b.kind() == BlockKind::Glass));
    }

    #[test]
    fn test_tall_building_clamps_at_top_row() {
        let config = GenConfig {
            terrain: TerrainConfig {
                top_min_frac: 0.5,
                top_max_frac: 0.5,
                ..Default::default()
            },
            buildings: BuildingConfig {
                chance: 1.0,
                height_min: 500,
                height_max: 500,
                foundation: 2,
                middle_clearance: 0,
                ..Default::default()
            },
        };
        let grid = generate(1, 40, 40, config);
        assert!(grid.get(0, 0).is_some_and(|b| b.kind() == BlockKind::Brick));
    }

    #[test]
    fn test_huge_foundation_places_nothing() {
        let config = GenConfig {
            buildings: BuildingConfig {
                chance: 1.0,
                foundation: u32::MAX,
                middle_clearance: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let grid = generate(4, 60, 60, config);
        assert!(grid.block_count() > 0);
        assert!(grid
            .blocks()
            .all(|(_, b)| !matches!(b.kind(), BlockKind::Brick | BlockKind::Glass)));
    }

    #[test]
    fn test_huge_building_width_stops_at_right_edge() {
        let config = GenConfig {
            buildings: BuildingConfig {
                chance: 1.0,
                width_min: u32::MAX,
                width_max: u32::MAX,
                height_min: 5,
                height_max: 5,
                foundation: 2,
                middle_clearance: 0,
            },
            terrain: TerrainConfig {
                step_chance: 0.0,
                ..Default::default()
            },
        };
        let (width, height) = (40, 60);
        let grid = generate(6, width, height, config);
        let bricks: Vec<u32> = grid
            .blocks()
            .filter(|(_, b)| b.kind() == BlockKind::Brick)
            .map(|(cell, _)| cell.x)
            .collect();
        // One building from column 0 across the flat surface
        assert!(bricks.contains(&0));
        assert!(bricks.contains(&(width - 1)));
    }

    #[test]
    #[should_panic(expected = "cannot generate terrain")]
    fn test_inverted_terrain_range_panics() {
        let config = GenConfig {
            terrain: TerrainConfig {
                step_min: 3,
                step_max: -3,
                ..Default::default()
            },
            ..Default::default()
        };
        generate(1, 32, 32, config);
    }

    #[test]
    #[should_panic(expected = "cannot generate buildings")]
    fn test_inverted_building_range_panics() {
        let config = GenConfig {
            buildings: BuildingConfig {
                width_min: 30,
                width_max: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        generate(1, 32, 32, config);
    }

    #[test]
    fn test_config_validation() {
        assert!(GenConfig::default().validate().is_ok());
        let mut config = GenConfig::default();
        config.terrain.top_max_frac = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFraction { .. })
        ));
        let mut config = GenConfig::default();
        config.buildings.chance = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }
}
