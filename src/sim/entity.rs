//! Entity records shared by every entity kind
//!
//! An entity is created detached, admitted into a [`World`](super::World)
//! (which assigns its id and owner), ticked once per step until it is marked
//! for deletion, then erased at the start of the following tick pass.
//! Other entities only ever hold an [`EntityId`], never a reference.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::EntityKind;
use super::rect::Rect;

/// Process-unique entity identity. Ids increase monotonically per world and
/// are never reused while the registry holds a live entity with that id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel for "no entity"
    pub const INVALID: EntityId = EntityId(u64::MAX);

    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}

/// Identity of an owning world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(u32);

impl WorldId {
    pub(crate) fn next() -> Self {
        static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(0);
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Position, size and per-tick velocity with explicit Euler integration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    /// World units per tick
    pub velocity: Vec2,
    pub gravity: bool,
}

impl Body {
    pub fn new(size: Vec2, gravity: bool) -> Self {
        Self {
            rect: Rect::from_pos_size(Vec2::ZERO, size),
            velocity: Vec2::ZERO,
            gravity,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.rect.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec2) {
        self.rect.pos = pos;
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.rect.size
    }

    /// One explicit Euler step. Gravity feeds velocity after the position
    /// update, so it first moves the body on the following tick.
    pub fn integrate(&mut self, gravity_accel: f32, frame_time: f32) {
        let new_pos = self.rect.pos + self.velocity;
        if self.gravity {
            self.velocity.y += gravity_accel * frame_time;
        }
        self.rect.pos = new_pos;
    }
}

/// Bookkeeping common to every entity kind
#[derive(Debug, Clone)]
pub struct EntityState {
    id: EntityId,
    world: Option<WorldId>,
    fx_only: bool,
    marked_for_deletion: bool,
    pub body: Body,
}

impl EntityState {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    #[inline]
    pub fn is_fx_only(&self) -> bool {
        self.fx_only
    }

    /// Idempotent; honoured at the start of the next tick pass
    #[inline]
    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }

    #[inline]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

/// A simulation object: shared state plus per-kind behaviour
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) state: EntityState,
    pub(crate) kind: EntityKind,
}

impl Entity {
    /// Create a detached entity. The effects-only flag is fixed by the kind.
    pub fn new(kind: EntityKind, body: Body) -> Self {
        Self {
            state: EntityState {
                id: EntityId::INVALID,
                world: None,
                fx_only: kind.is_fx_only(),
                marked_for_deletion: false,
                body,
            },
            kind,
        }
    }

    /// Bind to the owning world. Happens exactly once, on admission.
    pub(crate) fn assign_world(&mut self, world: WorldId, id: EntityId) {
        assert!(
            self.state.world.is_none(),
            "entity {} ({}) admitted twice",
            self.state.id,
            self.name()
        );
        self.state.world = Some(world);
        self.state.id = id;
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.state.id
    }

    #[inline]
    pub fn world(&self) -> Option<WorldId> {
        self.state.world
    }

    #[inline]
    pub fn is_fx_only(&self) -> bool {
        self.state.fx_only
    }

    #[inline]
    pub fn mark_for_deletion(&mut self) {
        self.state.mark_for_deletion();
    }

    #[inline]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.state.is_marked_for_deletion()
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.state.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.state.body
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.state.body.rect
    }

    #[inline]
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
