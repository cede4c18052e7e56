//! Colours for blocks and entities

use rand::Rng;

use super::Rgba;
use crate::sim::block::{Block, BlockKind};

pub const DIRT: Rgba = Rgba::rgb(153, 102, 51);
pub const BRICK: Rgba = Rgba::rgb(128, 128, 128);
pub const GRASS: Rgba = Rgba::rgb(51, 204, 51);
pub const GLASS: Rgba = Rgba::rgb(255, 255, 0);
pub const GLASS_SHATTERED: Rgba = Rgba::rgb(51, 153, 255);
pub const STONE: Rgba = Rgba::rgb(168, 168, 168);
pub const BEDROCK: Rgba = Rgba::rgb(25, 25, 25);
pub const WATER: Rgba = Rgba::rgb(64, 164, 223);

pub const TURRET_CANNON: Rgba = Rgba::rgb(55, 55, 55);
pub const TURRET_BASE: Rgba = Rgba::rgb(100, 100, 100);
pub const SMOKE: Rgba = Rgba::rgb(210, 210, 210);

/// Flickering orange-to-red, redrawn every frame
pub fn fire<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    Rgba::rgb(255, rng.random_range(0..=185), 0)
}

pub fn missile<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    Rgba::rgb(
        rng.random_range(100..=255),
        rng.random_range(0..=185),
        rng.random_range(0..=185),
    )
}

/// Damaged blocks darken down to 35% brightness
fn health_shade(block: &Block) -> f32 {
    1.0 - 0.65 * (1.0 - block.health_fraction()).clamp(0.0, 1.0)
}

/// Colour of a block: base by kind, shaded by health, then tinted.
/// Fire and water ignore health and tint.
pub fn block_color<R: Rng + ?Sized>(block: &Block, rng: &mut R) -> Rgba {
    let base = match block.kind() {
        BlockKind::Dirt => DIRT,
        BlockKind::Brick => BRICK,
        BlockKind::Grass => GRASS,
        BlockKind::Glass if block.is_destroyed() => GLASS_SHATTERED,
        BlockKind::Glass => GLASS,
        BlockKind::Stone => STONE,
        BlockKind::Bedrock => BEDROCK,
        BlockKind::Water => return WATER,
        BlockKind::FireFx => return fire(rng),
    };

    let tint = block.tint();
    base.scaled(health_shade(block))
        .modulate(Rgba::rgb(tint, tint, tint))
}
