//! Owning entity storage
//!
//! Entities live in a dense slot arena. An id -> slot index map backs
//! lookups, and each occupied slot holds the entity whose id must match the
//! one looked up. Non-effects entities are additionally listed in
//! `non_fx`, the only set collision queries iterate. Its order is
//! meaningless and removal uses swap-and-pop.
//!
//! While an entity ticks it is checked out of its slot so that it can be
//! handed `&mut World`. Removal requests aimed at a checked-out entity are
//! held on the slot and applied when it is restored.

use std::collections::HashMap;

use super::entity::{Entity, EntityId, WorldId};

#[derive(Debug)]
enum Slot {
    Vacant,
    Occupied(Entity),
    CheckedOut {
        id: EntityId,
        removal_requested: bool,
    },
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    index: HashMap<EntityId, usize>,
    non_fx: Vec<EntityId>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next admitted entity will receive
    #[inline]
    pub fn peek_next_id(&self) -> EntityId {
        EntityId::from_raw(self.next_id)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::from_raw(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == EntityId::INVALID.raw() {
            self.next_id = 0;
        }
        assert!(
            !self.index.contains_key(&id),
            "next entity id {id} already assigned to a live entity"
        );
        id
    }

    /// Take ownership of `entity`, returning its new id, or
    /// [`EntityId::INVALID`] for an empty handle
    pub fn admit(&mut self, entity: Option<Entity>, world: WorldId) -> EntityId {
        let Some(mut entity) = entity else {
            return EntityId::INVALID;
        };

        let id = self.allocate_id();
        entity.assign_world(world, id);

        if !entity.is_fx_only() {
            self.non_fx.push(id);
        }

        let slot = match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Slot::Occupied(entity);
                slot
            }
            None => {
                self.slots.push(Slot::Occupied(entity));
                self.slots.len() - 1
            }
        };
        self.index.insert(id, slot);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = *self.index.get(&id)?;
        match &self.slots[slot] {
            Slot::Occupied(entity) if entity.id() == id => Some(entity),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.index.get(&id)?;
        match &mut self.slots[slot] {
            Slot::Occupied(entity) if entity.id() == id => Some(entity),
            _ => None,
        }
    }

    /// Whether `id` is still held, including while it is checked out
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Flag `id` for removal on the next tick pass. Returns false if unknown.
    pub fn request_removal(&mut self, id: EntityId) -> bool {
        let Some(&slot) = self.index.get(&id) else {
            return false;
        };
        match &mut self.slots[slot] {
            Slot::Occupied(entity) => {
                entity.mark_for_deletion();
                true
            }
            Slot::CheckedOut {
                removal_requested, ..
            } => {
                *removal_requested = true;
                true
            }
            Slot::Vacant => false,
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live entities, including any currently checked out
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ids of every non-effects entity, in no particular order
    #[inline]
    pub fn non_fx_ids(&self) -> &[EntityId] {
        &self.non_fx
    }

    /// Entities resident in their slots, in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(entity) => Some(entity),
            _ => None,
        })
    }

    /// Move the entity in `slot` out so it can be ticked against the world
    pub(crate) fn checkout(&mut self, slot: usize) -> Option<Entity> {
        let id = match &self.slots[slot] {
            Slot::Occupied(entity) => entity.id(),
            _ => return None,
        };
        let taken = std::mem::replace(
            &mut self.slots[slot],
            Slot::CheckedOut {
                id,
                removal_requested: false,
            },
        );
        match taken {
            Slot::Occupied(entity) => Some(entity),
            _ => unreachable!("slot {slot} changed during checkout"),
        }
    }

    /// Check out by id, returning the slot it must be restored into
    pub(crate) fn checkout_id(&mut self, id: EntityId) -> Option<(usize, Entity)> {
        let slot = *self.index.get(&id)?;
        self.checkout(slot).map(|entity| (slot, entity))
    }

    /// Return a checked-out entity, applying any removal requested meanwhile
    pub(crate) fn restore(&mut self, slot: usize, mut entity: Entity) {
        match self.slots[slot] {
            Slot::CheckedOut {
                id,
                removal_requested,
            } => {
                assert_eq!(id, entity.id(), "entity restored into the wrong slot");
                if removal_requested {
                    entity.mark_for_deletion();
                }
            }
            _ => panic!("slot {slot} was not checked out"),
        }
        self.slots[slot] = Slot::Occupied(entity);
    }

    /// Erase a checked-out entity for good
    pub(crate) fn erase(&mut self, slot: usize, entity: Entity) {
        let id = entity.id();

        if !entity.is_fx_only() {
            let Some(pos) = self.non_fx.iter().position(|&other| other == id) else {
                panic!(
                    "non-effects entity {id} ({}) missing from collision index",
                    entity.name()
                );
            };
            log::debug!("Removing non-fx entity {} (id {})", entity.name(), id);
            self.non_fx.swap_remove(pos);
        }

        self.index.remove(&id);
        self.slots[slot] = Slot::Vacant;
        self.vacant.push(slot);
    }

    /// Drop every entity and restart id allocation
    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.index.clear();
        self.non_fx.clear();
        self.next_id = 0;
    }
}
