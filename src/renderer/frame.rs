//! Per-frame drawing of the world

use glam::Vec2;
use rand::Rng;

use super::palette::{self, block_color};
use super::{DrawSink, Rgba, Rotation, Sprite};
use crate::consts::CELL_SIZE;
use crate::sim::entities::EntityKind;
use crate::sim::entity::Entity;
use crate::sim::rect::Rect;
use crate::sim::world::World;

const CANNON_SIZE: Vec2 = Vec2::new(4.0, 17.5);
/// Cannon pivot relative to the turret position
const CANNON_PIVOT: Vec2 = Vec2::new(2.0, 18.5);
const BASE_OFFSET: Vec2 = Vec2::new(-5.5, 17.0);
const BASE_DIAMETER: f32 = 15.0;

impl World {
    /// Refresh part of the block raster, draw it, then draw every live entity
    pub fn render(&mut self, sink: &mut dyn DrawSink) {
        let budget = self.settings().raster_updates_per_render;
        let catchup = self.settings().raster_catchup_factor;
        let explosion_frames = self.settings().explosion_frames;

        self.raster
            .flush_pending(&mut self.grid, &mut self.effects_rng, budget, catchup);
        sink.draw_raster(&self.raster, Vec2::ZERO, CELL_SIZE);

        for entity in self.entities.iter() {
            if !entity.is_marked_for_deletion() {
                draw_entity(entity, explosion_frames, &mut self.effects_rng, sink);
            }
        }
    }
}

fn draw_entity<R: Rng + ?Sized>(
    entity: &Entity,
    explosion_frames: usize,
    rng: &mut R,
    sink: &mut dyn DrawSink,
) {
    let rect = entity.rect();
    let pos = rect.pos;

    match entity.kind() {
        EntityKind::Turret(turret) => {
            sink.fill_rect(
                Rect::from_pos_size(pos, CANNON_SIZE),
                Rotation::about(turret.aim_angle(), pos + CANNON_PIVOT),
                palette::TURRET_CANNON,
            );
            sink.fill_ellipse(
                Rect::from_pos_size(pos + BASE_OFFSET, Vec2::splat(BASE_DIAMETER)),
                Rotation::NONE,
                palette::TURRET_BASE,
            );
        }
        EntityKind::Missile(_) => sink.fill_ellipse(rect, Rotation::NONE, palette::missile(rng)),
        EntityKind::Bomb(_) => sink.fill_ellipse(rect, Rotation::NONE, palette::fire(rng)),
        EntityKind::Gib(gib) => sink.fill_rect(rect, Rotation::NONE, block_color(gib.block(), rng)),
        EntityKind::Smoke(smoke) => {
            let alpha = (smoke.density().clamp(0.0, 1.0) * 200.0) as u8;
            let color = Rgba { a: alpha, ..palette::SMOKE };
            sink.fill_ellipse(rect, Rotation::about(smoke.angle(), pos), color);
        }
        EntityKind::Explosion(fx) => {
            if let Some(frame) = fx.animation_frame(explosion_frames) {
                sink.draw_sprite(Sprite::Explosion { frame }, rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::settings::Settings;
    use crate::sim::block::BlockKind;
    use crate::sim::entities::{Bomb, ExplosionFx, Turret};
    use crate::sim::entity::EntityId;

    #[test]
    fn test_raster_drawn_first() {
        let mut world = World::new(Settings::with_grid(32, 32));
        world.create_block(1, 1, BlockKind::Grass);
        world.spawn(Bomb::spawn(Vec2::new(3.0, 3.0), EntityId::INVALID));

        let mut list = DrawList::new();
        world.render(&mut list);
        assert_eq!(
            list.commands[0],
            DrawCommand::Raster {
                origin: Vec2::ZERO,
                cell_size: CELL_SIZE,
                width: 32,
                height: 32,
            }
        );
        assert_eq!(list.len(), 2);
        assert_ne!(world.raster().pixel(1, 1), Rgba::TRANSPARENT);
        assert_eq!(world.grid().pending_raster_updates(), 0);
    }

    #[test]
    fn test_render_catches_up_on_large_backlog() {
        let mut world = World::new(Settings::with_grid(200, 150));
        for row in 0..150 {
            for col in 0..200 {
                world.create_block(col, row, BlockKind::Dirt);
            }
        }
        world.render(&mut DrawList::new());
        assert_eq!(world.grid().pending_raster_updates(), 0);

        // Small backlogs only get the per-pass budget
        let mut settings = Settings::with_grid(100, 100);
        settings.raster_updates_per_render = 100;
        let mut world = World::new(settings);
        for col in 0..100 {
            for row in 0..5 {
                world.create_block(col, row, BlockKind::Dirt);
            }
        }
        world.render(&mut DrawList::new());
        assert_eq!(world.grid().pending_raster_updates(), 400);
    }

    #[test]
    fn test_generated_world_starts_clean() {
        let mut world = World::new(Settings::with_grid(120, 80));
        world.generate_new_world(3);
        assert!(world.block_count() > 0);
        assert_eq!(world.grid().pending_raster_updates(), 0);
        assert!(world.grid().raster_tracking());
        // Bottom row is always terrain
        assert_ne!(world.raster().pixel(0, 79), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_turret_is_cannon_and_base() {
        let mut world = World::new(Settings::with_grid(32, 32));
        world.spawn(Turret::spawn_at(Vec2::new(10.0, 2.0)));

        let mut list = DrawList::new();
        world.render(&mut list);
        match &list.commands[1] {
            DrawCommand::Rect { rect, rotation, color } => {
                assert_eq!(*rect, Rect::new(10.0, 2.0, 4.0, 17.5));
                assert_eq!(rotation.pivot, Vec2::new(12.0, 20.5));
                assert_eq!(*color, palette::TURRET_CANNON);
            }
            other => panic!("expected cannon rect, got {other:?}"),
        }
        assert!(matches!(list.commands[2], DrawCommand::Ellipse { .. }));
    }

    #[test]
    fn test_marked_entities_are_skipped() {
        let mut world = World::new(Settings::with_grid(32, 32));
        let id = world.spawn(Bomb::spawn(Vec2::new(3.0, 3.0), EntityId::INVALID));
        world.request_removal(id);

        let mut list = DrawList::new();
        world.render(&mut list);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_explosion_needs_frames() {
        let mut settings = Settings::with_grid(32, 32);
        settings.explosion_frames = 0;
        let mut world = World::new(settings);
        world.spawn(ExplosionFx::spawn(Rect::new(0.0, 0.0, 4.0, 4.0)));

        let mut list = DrawList::new();
        world.render(&mut list);
        assert_eq!(list.len(), 1);

        let mut world = World::new(Settings::with_grid(32, 32));
        world.spawn(ExplosionFx::spawn(Rect::new(0.0, 0.0, 4.0, 4.0)));
        list.clear();
        world.render(&mut list);
        assert!(matches!(
            list.commands[1],
            DrawCommand::Sprite {
                sprite: Sprite::Explosion { frame: 0 },
                ..
            }
        ));
    }
}
