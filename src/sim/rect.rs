//! Axis-aligned rectangles in world space

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin, y pointing down.
/// Width/height may be negative; see [`Rect::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Rectangle of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::from_pos_size(center - 0.5 * size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + 0.5 * self.size
    }

    /// Mirror negative extents so that width and height are non-negative
    pub fn normalized(&self) -> Self {
        let mut rect = *self;
        if rect.size.x < 0.0 {
            rect.pos.x += rect.size.x;
            rect.size.x = -rect.size.x;
        }
        if rect.size.y < 0.0 {
            rect.pos.y += rect.size.y;
            rect.size.y = -rect.size.y;
        }
        rect
    }

    /// True if the two rectangles overlap with non-zero area.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a = self.normalized();
        let b = other.normalized();

        let left = a.left().max(b.left());
        let top = a.top().max(b.top());
        let right = a.right().min(b.right());
        let bottom = a.bottom().min(b.bottom());

        left < right && top < bottom
    }
}
