//! Entity liveness tracking and id recycling.

use tracing::trace;

use crate::{
    entity::{Entity, EntityId, Generation},
    error::{RegistryError, RegistryResult},
    sparse_set::SparseSet,
};

/// Records which entities are alive.
///
/// Liveness is a payload-free [`SparseSet`], so the dense entity array
/// doubles as the list of live entities. Destroyed entities go onto a free
/// list already stamped with their next generation; fresh ids come from
/// `high_water` only when the free list is empty.
#[derive(Debug, Default)]
pub struct EntityTracker {
    /// Live entities.
    live: SparseSet<()>,
    /// Retired entities, ready to be handed out again.
    free_list: Vec<Entity>,
    /// Next never-issued id.
    high_water: EntityId,
    /// Optional live-entity limit.
    limit: Option<usize>,
}

impl EntityTracker {
    /// Create an unbounded tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            live: SparseSet::new(),
            free_list: Vec::new(),
            high_water: 0,
            limit: None,
        }
    }

    /// Create a tracker with room for `capacity` entities and an optional
    /// live-entity limit.
    ///
    /// With a limit, ids never exceed it, so the free list is sized to hold
    /// every one of them and never reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize, limit: Option<usize>) -> Self {
        Self {
            live: SparseSet::with_capacity(capacity),
            free_list: Vec::with_capacity(limit.unwrap_or(capacity / 4)),
            high_water: 0,
            limit,
        }
    }

    /// Allocate an entity, reusing a retired id if one is available.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`] if a limit is set and
    /// already reached.
    ///
    /// # Panics
    ///
    /// Panics if every id below `u32::MAX` has been issued.
    pub fn allocate(&mut self) -> RegistryResult<Entity> {
        if let Some(capacity) = self.limit {
            if self.live.len() >= capacity {
                return Err(RegistryError::CapacityExceeded { capacity });
            }
        }

        let entity = match self.free_list.pop() {
            Some(entity) => entity,
            None => {
                let id = self.high_water;
                assert!(id < EntityId::MAX, "entity id space exhausted");
                self.high_water += 1;
                Entity::new(id, Generation::new())
            }
        };

        self.live.insert(entity, ());
        Ok(entity)
    }

    /// Retire a live entity and queue its id for reuse.
    ///
    /// An id whose generation is exhausted is retired for good instead, so
    /// the generation never wraps back to one a stale entity still carries.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive.
    pub fn release(&mut self, entity: Entity) {
        self.live.erase(entity);
        retire(&mut self.free_list, entity);
    }

    /// Check if an entity is currently alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.live.contains(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Check if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// The live-entity limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of ids issued so far, live or retired.
    #[must_use]
    pub const fn high_water(&self) -> EntityId {
        self.high_water
    }

    /// Live entities in dense order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.live.entities()
    }

    /// Retire every live entity.
    ///
    /// Ids go back on the free list, so numbering continues from the
    /// recycled ids while every previously issued entity becomes invalid.
    pub fn clear(&mut self) {
        for &entity in self.live.entities().iter().rev() {
            retire(&mut self.free_list, entity);
        }
        self.live.clear();
    }

    #[cfg(test)]
    pub(crate) fn free_list_capacity(&self) -> usize {
        self.free_list.capacity()
    }
}

fn retire(free_list: &mut Vec<Entity>, entity: Entity) {
    if entity.generation() == Generation::LAST {
        trace!(%entity, "generation exhausted, retiring id");
        return;
    }
    free_list.push(entity.recycled());
}
