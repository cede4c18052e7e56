//! Rendering module
//!
//! The simulation draws through a [`DrawSink`]; the embedding application
//! maps its calls onto whatever graphics backend it runs. Blocks are not
//! drawn one by one: they live in a [`BlockRaster`] cache with one texel per
//! cell, refreshed incrementally from the grid's dirty list.

pub mod frame;
pub mod palette;
pub mod raster;

pub use raster::BlockRaster;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::rect::Rect;

/// 8-bit RGBA colour, laid out for direct texture upload
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scale the colour channels, leaving alpha alone
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Component-wise multiply, treating 255 as 1.0
    pub fn modulate(self, other: Rgba) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Self::new(
            mul(self.r, other.r),
            mul(self.g, other.g),
            mul(self.b, other.b),
            mul(self.a, other.a),
        )
    }
}

/// Clockwise rotation in degrees about a world-space pivot
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    pub pivot: Vec2,
}

impl Rotation {
    pub const NONE: Rotation = Rotation {
        degrees: 0.0,
        pivot: Vec2::ZERO,
    };

    pub const fn about(degrees: f32, pivot: Vec2) -> Self {
        Self { degrees, pivot }
    }
}

/// Textures the sink is expected to provide
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sprite {
    /// Frame of the explosion animation, `0..Settings::explosion_frames`
    Explosion { frame: usize },
}

/// Backend-neutral drawing surface
pub trait DrawSink {
    /// Solid rectangle, rotated about `rotation.pivot`
    fn fill_rect(&mut self, rect: Rect, rotation: Rotation, color: Rgba);

    /// Solid ellipse inscribed in `bounds`
    fn fill_ellipse(&mut self, bounds: Rect, rotation: Rotation, color: Rgba);

    /// Sprite stretched to `bounds`
    fn draw_sprite(&mut self, sprite: Sprite, bounds: Rect);

    /// The block raster, each texel covering `cell_size` world units
    fn draw_raster(&mut self, raster: &BlockRaster, origin: Vec2, cell_size: f32);
}

/// One recorded [`DrawSink`] call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        rotation: Rotation,
        color: Rgba,
    },
    Ellipse {
        bounds: Rect,
        rotation: Rotation,
        color: Rgba,
    },
    Sprite {
        sprite: Sprite,
        bounds: Rect,
    },
    Raster {
        origin: Vec2,
        cell_size: f32,
        width: u32,
        height: u32,
    },
}

/// Sink that records calls for headless runs and tests
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSink for DrawList {
    fn fill_rect(&mut self, rect: Rect, rotation: Rotation, color: Rgba) {
        self.commands.push(DrawCommand::Rect {
            rect,
            rotation,
            color,
        });
    }

    fn fill_ellipse(&mut self, bounds: Rect, rotation: Rotation, color: Rgba) {
        self.commands.push(DrawCommand::Ellipse {
            bounds,
            rotation,
            color,
        });
    }

    fn draw_sprite(&mut self, sprite: Sprite, bounds: Rect) {
        self.commands.push(DrawCommand::Sprite { sprite, bounds });
    }

    fn draw_raster(&mut self, raster: &BlockRaster, origin: Vec2, cell_size: f32) {
        self.commands.push(DrawCommand::Raster {
            origin,
            cell_size,
            width: raster.width(),
            height: raster.height(),
        });
    }
}
