//! World settings
//!
//! Loaded from JSON on disk. Missing fields fall back to defaults, so a file
//! only needs to name what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::ConfigError;
use crate::sim::worldgen::GenConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Grid width in cells
    pub grid_width: u32,
    /// Grid height in cells
    pub grid_height: u32,

    // === Physics ===
    pub gravity_accel: f32,
    /// Seconds per tick
    pub frame_time: f32,

    // === Effects ===
    /// Seed for cosmetic randomness (gibs, smoke, flicker, raster order)
    pub effects_seed: u64,

    // === Rendering ===
    /// Raster cells refreshed per render pass
    pub raster_updates_per_render: usize,
    /// Backlog multiple of the budget that forces a full catch-up
    pub raster_catchup_factor: usize,
    /// Frames in the explosion sprite animation (0 disables it)
    pub explosion_frames: usize,

    pub generator: GenConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: consts::GRID_WIDTH,
            grid_height: consts::GRID_HEIGHT,

            gravity_accel: consts::GRAVITY_ACCEL,
            frame_time: consts::FRAME_TIME,

            effects_seed: 0x5eed,

            raster_updates_per_render: consts::RASTER_UPDATES_PER_RENDER,
            raster_catchup_factor: consts::RASTER_CATCHUP_FACTOR,
            explosion_frames: 16,

            generator: GenConfig::default(),
        }
    }
}

impl Settings {
    /// Default settings on a grid of the given size
    pub fn with_grid(width: u32, height: u32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        self.generator.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a JSON file, or use defaults if it can't be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!(
                    "Using default settings ({}: {err})",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_playfield() {
        let settings = Settings::default();
        assert_eq!(settings.grid_width, 2048);
        assert_eq!(settings.grid_height, 1152);
        assert_eq!(settings.generator.buildings.middle_clearance, 200);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "grid_width": 64, "generator": { "buildings": { "chance": 0.5 } } }"#)
                .expect("valid settings");
        assert_eq!(settings.grid_width, 64);
        assert_eq!(settings.grid_height, consts::GRID_HEIGHT);
        assert_eq!(settings.generator.buildings.chance, 0.5);
        assert_eq!(settings.generator.buildings.width_min, 24);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::with_grid(300, 200);
        settings.effects_seed = 99;
        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json).expect("parse"), settings);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Settings::with_grid(0, 10).validate(),
            Err(ConfigError::EmptyGrid { .. })
        ));
        let inverted = r#"{ "generator": { "buildings": { "height_min": 50, "height_max": 10 } } }"#;
        assert!(matches!(
            Settings::from_json(inverted),
            Err(ConfigError::InvertedRange { field: "buildings.height", .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("block-siege-settings-{}.json", std::process::id()));
        let settings = Settings::with_grid(128, 72);
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/block-siege.json");
        assert_eq!(settings, Settings::default());
        assert!(matches!(
            Settings::load("/nonexistent/block-siege.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
