//! Lazy iteration over registry contents.
//!
//! Nothing here caches: every iterator walks the live dense arrays it was
//! created from. The borrow on the registry keeps the arrays from changing
//! underneath it, so "destroy while iterating" has to go through a
//! snapshot (see `Registry::destroy_if`).

use std::{iter::FusedIterator, marker::PhantomData, slice};

use crate::{component::ComponentSet, entity::Entity, schema::SchemaStorage};

/// Every live entity, in the tracker's dense order.
#[derive(Clone)]
pub struct All<'r> {
    entities: slice::Iter<'r, Entity>,
}

impl<'r> All<'r> {
    pub(crate) fn new(entities: &'r [Entity]) -> Self {
        Self {
            entities: entities.iter(),
        }
    }
}

impl Iterator for All<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.entities.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entities.size_hint()
    }
}

impl ExactSizeIterator for All<'_> {}
impl FusedIterator for All<'_> {}

/// Entities holding every type of `Q`.
///
/// Walks the dense entity array of `Q`'s first type and tests membership in
/// the others, so putting the rarest type first does the least work.
pub struct View<'r, St, Q> {
    storage: &'r St,
    primary: slice::Iter<'r, Entity>,
    _marker: PhantomData<fn() -> Q>,
}

impl<'r, St: SchemaStorage, Q: ComponentSet> View<'r, St, Q> {
    pub(crate) fn new(storage: &'r St) -> Self {
        Q::assert_declared(storage);
        Self {
            storage,
            primary: Q::primary(storage).iter(),
            _marker: PhantomData,
        }
    }
}

impl<St, Q> Clone for View<'_, St, Q> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            primary: self.primary.clone(),
            _marker: PhantomData,
        }
    }
}

impl<St: SchemaStorage, Q: ComponentSet> Iterator for View<'_, St, Q> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let storage = self.storage;
        self.primary
            .by_ref()
            .copied()
            .find(|&entity| Q::has_all(storage, entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.primary.len()))
    }
}

impl<St: SchemaStorage, Q: ComponentSet> FusedIterator for View<'_, St, Q> {}

/// Shared references to the components of every entity holding all of `Q`.
pub struct ViewGet<'r, St, Q> {
    storage: &'r St,
    primary: slice::Iter<'r, Entity>,
    _marker: PhantomData<fn() -> Q>,
}

impl<'r, St: SchemaStorage, Q: ComponentSet> ViewGet<'r, St, Q> {
    pub(crate) fn new(storage: &'r St) -> Self {
        Q::assert_declared(storage);
        Self {
            storage,
            primary: Q::primary(storage).iter(),
            _marker: PhantomData,
        }
    }

    /// Pair each projection with the entity it belongs to.
    pub fn with_entities(self) -> Entries<'r, St, Q> {
        Entries { inner: self }
    }

    fn next_entry(&mut self) -> Option<(Entity, Q::Refs<'r>)> {
        let storage = self.storage;
        self.primary
            .by_ref()
            .find_map(|&entity| Q::fetch(storage, entity).map(|refs| (entity, refs)))
    }
}

impl<'r, St: SchemaStorage, Q: ComponentSet> Iterator for ViewGet<'r, St, Q> {
    type Item = Q::Refs<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|(_, refs)| refs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.primary.len()))
    }
}

impl<St: SchemaStorage, Q: ComponentSet> FusedIterator for ViewGet<'_, St, Q> {}

/// [`ViewGet`] that also yields the entity.
pub struct Entries<'r, St, Q> {
    inner: ViewGet<'r, St, Q>,
}

impl<'r, St: SchemaStorage, Q: ComponentSet> Iterator for Entries<'r, St, Q> {
    type Item = (Entity, Q::Refs<'r>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_entry()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Exclusive references to the components of every entity holding all of
/// `Q`. Only obtainable from an exclusively borrowed registry.
pub struct ViewGetMut<'r, St, Q> {
    storage: *mut St,
    index: usize,
    _marker: PhantomData<(&'r mut St, fn() -> Q)>,
}

impl<'r, St: SchemaStorage, Q: ComponentSet> ViewGetMut<'r, St, Q> {
    pub(crate) fn new(storage: &'r mut St) -> Self {
        Q::assert_declared(&*storage);
        Q::assert_disjoint();
        Self {
            storage,
            index: 0,
            _marker: PhantomData,
        }
    }

    fn primary_len(&self) -> usize {
        // SAFETY: `storage` outlives 'r and is only read here
        Q::primary(unsafe { &*self.storage }).len()
    }
}

impl<'r, St: SchemaStorage, Q: ComponentSet> Iterator for ViewGetMut<'r, St, Q> {
    type Item = Q::Muts<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // SAFETY: the exclusive borrow is held for 'r; the shared borrow
            // ends once the entity is copied out
            let entity = *Q::primary(unsafe { &*self.storage }).get(self.index)?;
            self.index += 1;

            // SAFETY: types are disjoint (checked in `new`), and the primary
            // array holds each entity once, so no two items alias
            if let Some(refs) = unsafe { Q::fetch_mut(self.storage, entity) } {
                return Some(refs);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.primary_len().saturating_sub(self.index)))
    }
}

impl<St: SchemaStorage, Q: ComponentSet> FusedIterator for ViewGetMut<'_, St, Q> {}
