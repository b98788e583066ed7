//! Sparse set - contiguous storage for a single component type.
//!
//! Three parallel arrays:
//! - `sparse[entity.id()]` holds the dense slot of the entity, or `ABSENT`
//! - `entities[slot]` holds the entity stored at that slot
//! - `values[slot]` holds its component
//!
//! For every entity `e` with `sparse[e.id()] != ABSENT`,
//! `entities[sparse[e.id()]] == e`. Both dense arrays always have the same
//! length. Removal swaps the last slot into the hole, so dense order is not
//! insertion order once anything has been erased.

use std::{
    any::type_name,
    iter::{Copied, Zip},
    ptr::NonNull,
    slice,
};

use crate::entity::Entity;

/// Marks an empty entry of the sparse index.
const ABSENT: u32 = u32::MAX;

/// Iterator over `(Entity, &T)` pairs in dense order.
pub type Iter<'a, T> = Zip<Copied<slice::Iter<'a, Entity>>, slice::Iter<'a, T>>;

/// Iterator over `(Entity, &mut T)` pairs in dense order.
pub type IterMut<'a, T> = Zip<Copied<slice::Iter<'a, Entity>>, slice::IterMut<'a, T>>;

/// Entity to component map with O(1) insert, lookup and erase and a
/// packed value array for iteration.
pub struct SparseSet<T> {
    /// Entity id -> dense slot.
    sparse: Vec<u32>,
    /// Entity stored at each dense slot.
    entities: Vec<Entity>,
    /// Component stored at each dense slot.
    values: Vec<T>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseSet<T> {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create a set that holds entities with ids below `capacity` without
    /// reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: vec![ABSENT; capacity],
            entities: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of components the dense arrays hold before reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Reserve room for at least `additional` more components.
    pub fn reserve(&mut self, additional: usize) {
        self.entities.reserve(additional);
        self.values.reserve(additional);
    }

    /// Dense slot of `entity`, if present.
    fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(entity.id() as usize)?;
        if slot == ABSENT {
            return None;
        }
        let slot = slot as usize;
        (self.entities[slot] == entity).then_some(slot)
    }

    /// Check whether `entity` has a value in this set.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Append `value` for `entity` and return a reference to the stored value.
    ///
    /// `entity` must not already be present. Growing the dense arrays
    /// invalidates every reference previously handed out by this set.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is [`Entity::NULL`]. Inserting an entity whose slot
    /// is already occupied is caught in debug builds.
    pub fn insert(&mut self, entity: Entity, value: T) -> &mut T {
        assert!(!entity.is_null(), "cannot insert the null entity");

        let index = entity.id() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, ABSENT);
        }
        debug_assert_eq!(
            self.sparse[index],
            ABSENT,
            "{entity} already occupies a slot in SparseSet<{}>",
            type_name::<T>()
        );

        let slot = self.entities.len();
        self.sparse[index] = slot as u32;
        self.entities.push(entity);
        self.values.push(value);
        &mut self.values[slot]
    }

    /// Get the value for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not present.
    #[must_use]
    pub fn get(&self, entity: Entity) -> &T {
        match self.get_if(entity) {
            Some(value) => value,
            None => missing::<T>(entity),
        }
    }

    /// Get the value for `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not present.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        match self.get_if_mut(entity) {
            Some(value) => value,
            None => missing::<T>(entity),
        }
    }

    /// Get the value for `entity`, or `None` if absent.
    #[must_use]
    pub fn get_if(&self, entity: Entity) -> Option<&T> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    /// Get the value for `entity` mutably, or `None` if absent.
    #[must_use]
    pub fn get_if_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot(entity).map(|slot| &mut self.values[slot])
    }

    /// Pointer to the value for `entity` that does not borrow the rest of
    /// the value array, so several of them can be live at once.
    pub(crate) fn value_ptr(&mut self, entity: Entity) -> Option<NonNull<T>> {
        let slot = self.slot(entity)?;
        // SAFETY: slot < values.len(), and as_mut_ptr does not create an
        // intermediate reference to the whole buffer.
        let ptr = unsafe { self.values.as_mut_ptr().add(slot) };
        NonNull::new(ptr)
    }

    /// Remove `entity` and return its value.
    ///
    /// The last slot is moved into the freed one.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not present.
    pub fn erase(&mut self, entity: Entity) -> T {
        let Some(slot) = self.slot(entity) else {
            missing::<T>(entity)
        };

        self.sparse[entity.id() as usize] = ABSENT;
        self.entities.swap_remove(slot);
        let value = self.values.swap_remove(slot);

        // Whatever used to be last now lives at `slot`
        if let Some(&moved) = self.entities.get(slot) {
            self.sparse[moved.id() as usize] = slot as u32;
        }

        debug_assert_eq!(self.entities.len(), self.values.len());
        value
    }

    /// Remove every value. Backing capacity is kept.
    pub fn clear(&mut self) {
        for entity in &self.entities {
            self.sparse[entity.id() as usize] = ABSENT;
        }
        self.entities.clear();
        self.values.clear();
    }

    /// Dense entity array.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Dense value array, aligned with [`SparseSet::entities`].
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Dense value array, mutably.
    #[must_use]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterate over `(entity, &value)` in dense order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterate over `(entity, &mut value)` in dense order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }
}

impl<'a, T> IntoIterator for &'a SparseSet<T> {
    type Item = (Entity, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SparseSet<T> {
    type Item = (Entity, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> std::fmt::Debug for SparseSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseSet")
            .field("type", &type_name::<T>())
            .field("entities", &self.entities)
            .finish()
    }
}

#[cold]
#[track_caller]
fn missing<T>(entity: Entity) -> ! {
    panic!(
        "{entity} is not present in SparseSet<{}>",
        type_name::<T>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Generation;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    fn entity(id: u32) -> Entity {
        Entity::new(id, Generation::new())
    }

    /// Every stored entity maps back to its own slot.
    fn assert_consistent<T>(set: &SparseSet<T>) {
        assert_eq!(set.entities().len(), set.values().len());
        for (slot, &e) in set.entities().iter().enumerate() {
            assert_eq!(set.slot(e), Some(slot));
        }
    }

    #[test]
    fn test_insert_get() {
        let mut set = SparseSet::new();
        set.insert(entity(3), Position { x: 1.0, y: 2.0 });
        set.insert(entity(0), Position { x: 3.0, y: 4.0 });

        assert_eq!(set.len(), 2);
        assert!(set.contains(entity(3)));
        assert!(!set.contains(entity(1)));
        assert_eq!(set.get(entity(0)), &Position { x: 3.0, y: 4.0 });
        assert_eq!(set.get_if(entity(7)), None);
        assert_consistent(&set);
    }

    #[test]
    fn test_insert_returns_stored_value() {
        let mut set = SparseSet::new();
        let stored = set.insert(entity(1), 10);
        *stored += 5;
        assert_eq!(set.get(entity(1)), &15);
    }

    #[test]
    fn test_erase_middle_moves_last() {
        let mut set = SparseSet::new();
        for id in 0..3 {
            set.insert(entity(id), id);
        }

        assert_eq!(set.erase(entity(0)), 0);

        assert_eq!(set.entities(), &[entity(2), entity(1)]);
        assert_eq!(set.values(), &[2, 1]);
        assert!(!set.contains(entity(0)));
        assert_consistent(&set);
    }

    #[test]
    fn test_erase_last() {
        let mut set = SparseSet::new();
        set.insert(entity(0), 'a');
        set.insert(entity(1), 'b');

        assert_eq!(set.erase(entity(1)), 'b');
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(entity(0)), &'a');
        assert_consistent(&set);
    }

    #[test]
    fn test_stale_generation_not_contained() {
        let mut set = SparseSet::new();
        let current = Entity::new(4, Generation::new().next());
        set.insert(current, ());

        assert!(set.contains(current));
        assert!(!set.contains(entity(4)));
        assert!(set.get_if(entity(4)).is_none());
    }

    #[test]
    fn test_null_never_contained() {
        let mut set = SparseSet::with_capacity(4);
        set.insert(entity(0), 1);
        assert!(!set.contains(Entity::NULL));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut set = SparseSet::with_capacity(16);
        for id in 0..10 {
            set.insert(entity(id), id);
        }
        set.clear();

        assert!(set.is_empty());
        assert!(set.capacity() >= 16);
        assert!(!set.contains(entity(4)));

        set.insert(entity(4), 4);
        assert_eq!(set.get(entity(4)), &4);
        assert_consistent(&set);
    }

    #[test]
    fn test_iter_mut() {
        let mut set = SparseSet::new();
        set.insert(entity(0), 1);
        set.insert(entity(5), 2);

        for (_, value) in &mut set {
            *value *= 10;
        }

        let collected: Vec<_> = set.iter().map(|(e, v)| (e.id(), *v)).collect();
        assert_eq!(collected, vec![(0, 10), (5, 20)]);
    }

    #[test]
    fn test_erase_drops_value() {
        use std::rc::Rc;

        let shared = Rc::new(());
        let mut set = SparseSet::new();
        set.insert(entity(0), Rc::clone(&shared));
        set.insert(entity(1), Rc::clone(&shared));
        assert_eq!(Rc::strong_count(&shared), 3);

        drop(set.erase(entity(0)));
        assert_eq!(Rc::strong_count(&shared), 2);

        set.clear();
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    #[should_panic(expected = "is not present")]
    fn test_get_missing_panics() {
        let set: SparseSet<u8> = SparseSet::new();
        let _ = set.get(entity(0));
    }

    #[test]
    #[should_panic(expected = "is not present")]
    fn test_erase_missing_panics() {
        let mut set: SparseSet<u8> = SparseSet::new();
        set.erase(entity(2));
    }
}
