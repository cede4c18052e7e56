//! Grid cell model
//!
//! A block is one grid-addressable unit of world material. Blocks own no
//! position; the grid that stores them does.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Block material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Stone,
    Dirt,
    Grass,
    Brick,
    Glass,
    /// Indestructible world boundary
    Bedrock,
    /// Explosion-immune liquid
    Water,
    /// Transient fire debris, purely cosmetic
    FireFx,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Stone,
        BlockKind::Dirt,
        BlockKind::Grass,
        BlockKind::Brick,
        BlockKind::Glass,
        BlockKind::Bedrock,
        BlockKind::Water,
        BlockKind::FireFx,
    ];

    /// Health a freshly created block of this kind starts with
    pub fn max_health(self) -> u32 {
        match self {
            BlockKind::Dirt => 75,
            BlockKind::Brick => 45,
            BlockKind::Glass => 38,
            BlockKind::Grass => 35,
            BlockKind::Stone => 150,
            BlockKind::FireFx => 1,
            // Can't be damaged anyway
            BlockKind::Bedrock | BlockKind::Water => 1000,
        }
    }

    /// Damage is a no-op on these kinds
    #[inline]
    pub fn is_indestructible(self) -> bool {
        matches!(self, BlockKind::Bedrock | BlockKind::Water)
    }
}

/// Lowest/highest cosmetic tint a block can roll
pub const TINT_MIN: u8 = 205;
pub const TINT_MAX: u8 = 255;

/// A single destructible cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    health: u32,
    /// Grey multiplier applied to the rendered colour, rolled once
    tint: u8,
}

impl Block {
    /// Create a block at full health
    pub fn new<R: Rng + ?Sized>(kind: BlockKind, rng: &mut R) -> Self {
        Self::with_health(kind, kind.max_health(), rng)
    }

    /// Create a block with explicit health (clamped to the kind's maximum)
    pub fn with_health<R: Rng + ?Sized>(kind: BlockKind, health: u32, rng: &mut R) -> Self {
        Self {
            kind,
            health: health.min(kind.max_health()),
            tint: rng.random_range(TINT_MIN..=TINT_MAX),
        }
    }

    #[inline]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> u32 {
        self.kind.max_health()
    }

    #[inline]
    pub fn tint(&self) -> u8 {
        self.tint
    }

    /// Health as a fraction of the kind's maximum
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health() as f32
    }

    /// Setting health never allows it above the kind's maximum
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health());
    }

    /// Apply damage, saturating at zero. Indestructible kinds ignore it.
    pub fn damage(&mut self, amount: u32) {
        if !self.kind.is_indestructible() {
            self.health = self.health.saturating_sub(amount);
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_new_block_has_max_health() {
        let mut rng = rng();
        for kind in BlockKind::ALL {
            let block = Block::new(kind, &mut rng);
            assert_eq!(block.health(), kind.max_health(), "{kind:?}");
            assert!(!block.is_destroyed());
        }
    }

    #[test]
    fn test_explicit_health_is_clamped() {
        let mut rng = rng();
        let block = Block::with_health(BlockKind::Glass, 10_000, &mut rng);
        assert_eq!(block.health(), 38);

        let mut block = Block::with_health(BlockKind::Stone, 20, &mut rng);
        assert_eq!(block.health(), 20);
        block.set_health(u32::MAX);
        assert_eq!(block.health(), 150);
    }

    #[test]
    fn test_tint_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let tint = Block::new(BlockKind::Dirt, &mut rng).tint();
            assert!((TINT_MIN..=TINT_MAX).contains(&tint));
        }
    }

    #[test]
    fn test_damage_destroys_at_zero() {
        let mut block = Block::new(BlockKind::Grass, &mut rng());
        block.damage(34);
        assert_eq!(block.health(), 1);
        assert!(!block.is_destroyed());
        block.damage(1000);
        assert_eq!(block.health(), 0);
        assert!(block.is_destroyed());
    }

    #[test]
    fn test_indestructible_kinds_ignore_damage() {
        let mut rng = rng();
        for kind in [BlockKind::Bedrock, BlockKind::Water] {
            let mut block = Block::new(kind, &mut rng);
            block.damage(u32::MAX);
            assert_eq!(block.health(), kind.max_health());
            assert!(!block.is_destroyed());
        }
    }

    fn any_kind() -> impl Strategy<Value = BlockKind> {
        proptest::sample::select(BlockKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_damage_saturates(kind in any_kind(), start in 0u32..2000, amount in any::<u32>()) {
            let mut block = Block::with_health(kind, start, &mut rng());
            let before = block.health();
            block.damage(amount);
            if kind.is_indestructible() {
                prop_assert_eq!(block.health(), before);
            } else {
                prop_assert_eq!(block.health(), before.saturating_sub(amount));
            }
            prop_assert!(block.health() <= kind.max_health());
        }

        #[test]
        fn prop_zero_damage_is_noop(kind in any_kind(), start in 0u32..2000) {
            let mut block = Block::with_health(kind, start, &mut rng());
            let before = block;
            block.damage(0);
            prop_assert_eq!(block, before);
        }
    }
}
