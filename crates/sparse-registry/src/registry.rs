//! Registry - the entity tracker plus one sparse set per declared type.
//!
//! The registry owns all storage for its schema. Entities are born in the
//! tracker, pick up and drop components through the per-type sets, and on
//! `destroy` leave every set before their id goes back on the free list.

use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    component::{Component, ComponentSet},
    config::RegistryConfig,
    entity::Entity,
    error::RegistryResult,
    handle::Handle,
    schema::{CloneStorage, Schema, SchemaStorage},
    sparse_set::SparseSet,
    tracker::EntityTracker,
    view::{All, View, ViewGet, ViewGetMut},
};

/// Buffer for the matches of a bulk destroy. Small batches stay inline.
type Snapshot = SmallVec<[Entity; 16]>;

/// Storage for entities and the components of schema `S`.
///
/// ```ignore
/// let mut registry = Registry::<(Position, Velocity)>::new();
/// let e = registry.create();
/// registry.add(e, Position { x: 0.0, y: 0.0 });
/// registry.add(e, Velocity { x: 1.0, y: 0.0 });
///
/// for (pos, vel) in registry.view_get_mut::<(Position, Velocity)>() {
///     pos.x += vel.x;
/// }
/// ```
///
/// References returned by `get`, `get_if`, `get_all` and the views borrow
/// the registry, so any mutating call ends them.
pub struct Registry<S: Schema> {
    tracker: EntityTracker,
    storage: S::Storage,
}

impl<S: Schema> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Registry<S> {
    /// Create an empty, unbounded registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: EntityTracker::new(),
            storage: S::Storage::default(),
        }
    }

    /// Create an unbounded registry with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(RegistryConfig::default().with_initial_capacity(capacity))
    }

    /// Create a registry from explicit settings.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        debug!(
            initial_capacity = config.initial_capacity,
            max_entities = ?config.max_entities,
            components = S::COUNT,
            "creating registry"
        );
        Self {
            tracker: EntityTracker::with_capacity(config.initial_capacity, config.max_entities),
            storage: S::Storage::with_capacity(config.initial_capacity),
        }
    }

    // ==================== Entity Operations ====================

    /// Create an entity with no components.
    ///
    /// # Panics
    ///
    /// Panics if the registry was configured with an entity limit and it is
    /// reached. Use [`Registry::try_create`] for limited registries.
    pub fn create(&mut self) -> Entity {
        match self.try_create() {
            Ok(entity) => entity,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create an entity with no components.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if the configured entity limit is reached.
    pub fn try_create(&mut self) -> RegistryResult<Entity> {
        let entity = self
            .tracker
            .allocate()
            .inspect_err(|err| warn!(%err, "refusing to create entity"))?;
        trace!(%entity, "created entity");
        Ok(entity)
    }

    /// Destroy an entity and all of its components.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid.
    #[track_caller]
    pub fn destroy(&mut self, entity: Entity) {
        self.assert_valid(entity);
        let removed = self.storage.erase_entity(entity);
        self.tracker.release(entity);
        trace!(%entity, removed, "destroyed entity");
    }

    /// Destroy every entity of `entities`.
    ///
    /// The collection is the caller's own; a live view cannot be passed
    /// because it borrows the registry.
    ///
    /// # Panics
    ///
    /// Panics if any entity is not valid, including one listed twice.
    #[track_caller]
    pub fn destroy_many<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut count = 0_usize;
        for entity in entities {
            self.destroy(entity);
            count += 1;
        }
        debug!(count, "destroyed entities");
    }

    /// Check if `entity` is alive in this registry.
    #[must_use]
    pub fn valid(&self, entity: Entity) -> bool {
        self.tracker.contains(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tracker.len()
    }

    /// Check if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// The live-entity limit, if one was configured.
    #[must_use]
    pub fn max_entities(&self) -> Option<usize> {
        self.tracker.limit()
    }

    /// Destroy every entity and component.
    ///
    /// Ids are recycled afterwards; every entity issued before the call
    /// is invalid.
    pub fn clear(&mut self) {
        let count = self.tracker.len();
        self.storage.clear();
        self.tracker.clear();
        debug!(count, "cleared registry");
    }

    // ==================== Component Operations ====================

    /// Attach `value` to `entity`, replacing any existing `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or `T` is not declared.
    #[track_caller]
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.assert_valid(entity);
        let set = self.storage.storage_of_mut::<T>();
        if set.contains(entity) {
            let existing = set.get_mut(entity);
            *existing = value;
            existing
        } else {
            set.insert(entity, value)
        }
    }

    /// Attach a clone of `value` to `entity`, replacing any existing `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or `T` is not declared.
    #[track_caller]
    pub fn add_cloned<T: Component + Clone>(&mut self, entity: Entity, value: &T) -> &mut T {
        self.add(entity, value.clone())
    }

    /// Attach a default-constructed `T` to `entity`, replacing any existing
    /// `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or `T` is not declared.
    #[track_caller]
    pub fn emplace<T: Component + Default>(&mut self, entity: Entity) -> &mut T {
        self.add(entity, T::default())
    }

    /// Attach the `T` built by `init` to `entity`, replacing any existing `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or `T` is not declared.
    #[track_caller]
    pub fn emplace_with<T: Component>(&mut self, entity: Entity, init: impl FnOnce() -> T) -> &mut T {
        self.add(entity, init())
    }

    /// Detach and return the `T` of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or has no `T`.
    #[track_caller]
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.assert_valid(entity);
        self.storage.storage_of_mut::<T>().erase(entity)
    }

    /// Detach and return the `T` of `entity`, if it has one.
    pub fn take<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let set = self.storage.storage_of_mut::<T>();
        set.contains(entity).then(|| set.erase(entity))
    }

    /// Detach every component of `entity`. The entity stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid.
    #[track_caller]
    pub fn remove_all_components(&mut self, entity: Entity) {
        self.assert_valid(entity);
        let removed = self.storage.erase_entity(entity);
        trace!(%entity, removed, "stripped components");
    }

    /// Check if `entity` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage.storage_of::<T>().contains(entity)
    }

    /// Check if `entity` has every type of `Q`.
    #[must_use]
    pub fn has_all<Q: ComponentSet>(&self, entity: Entity) -> bool {
        Q::assert_declared(&self.storage);
        Q::has_all(&self.storage, entity)
    }

    /// Check if `entity` has at least one type of `Q`.
    #[must_use]
    pub fn has_any<Q: ComponentSet>(&self, entity: Entity) -> bool {
        Q::assert_declared(&self.storage);
        Q::has_any(&self.storage, entity)
    }

    /// Get the `T` of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `T`.
    #[must_use]
    #[track_caller]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.storage.storage_of::<T>().get(entity)
    }

    /// Get the `T` of `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `T`.
    #[must_use]
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.storage.storage_of_mut::<T>().get_mut(entity)
    }

    /// Get the `T` of `entity`, or `None`.
    #[must_use]
    pub fn get_if<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage.storage_of::<T>().get_if(entity)
    }

    /// Get the `T` of `entity` mutably, or `None`.
    #[must_use]
    pub fn get_if_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage.storage_of_mut::<T>().get_if_mut(entity)
    }

    /// Get every component of `Q` for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is missing any type of `Q`.
    #[must_use]
    #[track_caller]
    pub fn get_all<Q: ComponentSet>(&self, entity: Entity) -> Q::Refs<'_> {
        Q::assert_declared(&self.storage);
        match Q::fetch(&self.storage, entity) {
            Some(refs) => refs,
            None => panic!(
                "{entity} does not have every component of {}",
                std::any::type_name::<Q>()
            ),
        }
    }

    /// Get every component of `Q` for `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is missing any type of `Q`, or if `Q` names a type
    /// twice.
    #[must_use]
    #[track_caller]
    pub fn get_all_mut<Q: ComponentSet>(&mut self, entity: Entity) -> Q::Muts<'_> {
        Q::assert_declared(&self.storage);
        Q::assert_disjoint();
        let storage: *mut S::Storage = &mut self.storage;
        // SAFETY: `storage` comes from the exclusive borrow of `self`, which
        // the result keeps alive; the types are disjoint
        match unsafe { Q::fetch_mut(storage, entity) } {
            Some(refs) => refs,
            None => panic!(
                "{entity} does not have every component of {}",
                std::any::type_name::<Q>()
            ),
        }
    }

    /// The sparse set holding `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not declared.
    #[must_use]
    pub fn storage<T: Component>(&self) -> &SparseSet<T> {
        self.storage.storage_of::<T>()
    }

    /// Declared component type names, in schema order.
    #[must_use]
    pub fn component_names(&self) -> Vec<&'static str> {
        S::type_names()
    }

    // ==================== Iteration ====================

    /// Every live entity.
    pub fn all(&self) -> All<'_> {
        All::new(self.tracker.entities())
    }

    /// Every entity holding all types of `Q`.
    ///
    /// # Panics
    ///
    /// Panics if a type of `Q` is not declared.
    pub fn view<Q: ComponentSet>(&self) -> View<'_, S::Storage, Q> {
        View::new(&self.storage)
    }

    /// The components of `Q` for every entity holding all of them.
    ///
    /// # Panics
    ///
    /// Panics if a type of `Q` is not declared.
    pub fn view_get<Q: ComponentSet>(&self) -> ViewGet<'_, S::Storage, Q> {
        ViewGet::new(&self.storage)
    }

    /// The components of `Q`, mutably, for every entity holding all of
    /// them.
    ///
    /// # Panics
    ///
    /// Panics if a type of `Q` is not declared or appears twice.
    pub fn view_get_mut<Q: ComponentSet>(&mut self) -> ViewGetMut<'_, S::Storage, Q> {
        ViewGetMut::new(&mut self.storage)
    }

    /// First live entity satisfying `pred`, or [`Entity::NULL`].
    pub fn find(&self, mut pred: impl FnMut(Entity) -> bool) -> Entity {
        self.all().find(|&entity| pred(entity)).unwrap_or(Entity::NULL)
    }

    /// First entity holding all of `Q` whose components satisfy `pred`, or
    /// [`Entity::NULL`].
    ///
    /// Only entities holding `Q` are handed to `pred`.
    pub fn find_with<Q: ComponentSet>(
        &self,
        mut pred: impl FnMut(Entity, Q::Refs<'_>) -> bool,
    ) -> Entity {
        self.view_get::<Q>()
            .with_entities()
            .find_map(|(entity, refs)| pred(entity, refs).then_some(entity))
            .unwrap_or(Entity::NULL)
    }

    // ==================== Bulk Destruction ====================

    /// Destroy every live entity for which `pred` returns `true`.
    ///
    /// `pred` sees each entity that was alive at the call exactly once; all
    /// matches are collected before the first one is destroyed. Returns the
    /// number destroyed.
    pub fn destroy_if(&mut self, mut pred: impl FnMut(Entity) -> bool) -> usize {
        let doomed: Snapshot = self.all().filter(|&entity| pred(entity)).collect();
        self.destroy_snapshot(&doomed)
    }

    /// Same as [`Registry::destroy_if`].
    pub fn erase_if(&mut self, pred: impl FnMut(Entity) -> bool) -> usize {
        self.destroy_if(pred)
    }

    /// Destroy every entity holding all of `Q` whose components satisfy
    /// `pred`. Returns the number destroyed.
    pub fn destroy_if_with<Q: ComponentSet>(
        &mut self,
        mut pred: impl FnMut(Entity, Q::Refs<'_>) -> bool,
    ) -> usize {
        let doomed: Snapshot = self
            .view_get::<Q>()
            .with_entities()
            .filter_map(|(entity, refs)| pred(entity, refs).then_some(entity))
            .collect();
        self.destroy_snapshot(&doomed)
    }

    fn destroy_snapshot(&mut self, doomed: &[Entity]) -> usize {
        for &entity in doomed {
            self.destroy(entity);
        }
        debug!(count = doomed.len(), "destroyed matching entities");
        doomed.len()
    }

    // ==================== Copying ====================

    /// Create a new entity carrying clones of every component of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid or the entity limit is reached.
    #[track_caller]
    pub fn duplicate(&mut self, entity: Entity) -> Entity
    where
        S::Storage: CloneStorage,
    {
        match self.try_duplicate(entity) {
            Ok(copy) => copy,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`Registry::duplicate`] for capacity-limited registries.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if the entity limit is reached. Nothing is created in that case.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid.
    #[track_caller]
    pub fn try_duplicate(&mut self, entity: Entity) -> RegistryResult<Entity>
    where
        S::Storage: CloneStorage,
    {
        self.assert_valid(entity);
        let copy = self.try_create()?;
        self.storage.clone_entity_within(entity, copy);
        trace!(%entity, %copy, "duplicated entity");
        Ok(copy)
    }

    /// Pair `entity` with this registry.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid.
    #[track_caller]
    pub fn handle(&mut self, entity: Entity) -> Handle<'_, S> {
        self.assert_valid(entity);
        Handle::new(entity, self)
    }

    // ==================== Internals ====================

    #[track_caller]
    pub(crate) fn assert_valid(&self, entity: Entity) {
        assert!(
            self.valid(entity),
            "{entity} is not a valid entity of this registry"
        );
    }

    #[cfg(test)]
    pub(crate) fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    pub(crate) fn component_storage(&self) -> &S::Storage {
        &self.storage
    }

    pub(crate) fn component_storage_mut(&mut self) -> &mut S::Storage {
        &mut self.storage
    }
}

impl<S: Schema> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("size", &self.size())
            .field("components", &S::type_names())
            .field("max_entities", &self.max_entities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryError;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Health(i32);

    struct Unlisted;

    type World = Registry<(Position, Velocity, Health)>;

    #[test]
    fn test_create_is_valid_and_bare() {
        let mut reg = World::new();
        let e = reg.create();

        assert!(reg.valid(e));
        assert!(!reg.has::<Position>(e));
        assert!(!reg.has::<Velocity>(e));
        assert!(!reg.has::<Health>(e));
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn test_destroy_recycles_with_new_generation() {
        let mut reg = World::new();
        let old = reg.create();
        reg.add(old, Health(100));
        reg.destroy(old);

        let new = reg.create();
        assert_eq!(old.id(), new.id());
        assert_ne!(old, new);
        assert!(!reg.valid(old));
        assert!(!reg.has::<Health>(new));
        assert!(reg.get_if::<Health>(old).is_none());
    }

    #[test]
    fn test_add_overwrites_in_place() {
        let mut reg = World::new();
        let e = reg.create();
        reg.add(e, Health(100));
        reg.add(e, Health(50));

        assert_eq!(reg.get::<Health>(e), &Health(50));
        assert_eq!(reg.storage::<Health>().len(), 1);
    }

    #[test]
    fn test_add_returns_stored_value() {
        let mut reg = World::new();
        let e = reg.create();
        reg.add(e, Health(10)).0 += 5;
        assert_eq!(reg.get::<Health>(e), &Health(15));
    }

    #[test]
    fn test_emplace_variants() {
        let mut reg = World::new();
        let e = reg.create();

        assert_eq!(reg.emplace::<Position>(e), &Position::default());
        reg.emplace_with(e, || Velocity { x: 1.0, y: 2.0 });
        reg.add_cloned(e, &Health(3));

        assert_eq!(reg.get::<Velocity>(e), &Velocity { x: 1.0, y: 2.0 });
        assert!(reg.has_all::<(Position, Velocity, Health)>(e));
    }

    #[test]
    fn test_remove_and_take() {
        let mut reg = World::new();
        let e = reg.create();
        reg.add(e, Health(42));

        assert_eq!(reg.remove::<Health>(e), Health(42));
        assert!(!reg.has::<Health>(e));
        assert!(reg.get_if::<Health>(e).is_none());
        assert_eq!(reg.take::<Health>(e), None);
    }

    #[test]
    fn test_remove_all_components() {
        let mut reg = World::new();
        let e = reg.create();
        reg.emplace::<Position>(e);
        reg.emplace::<Velocity>(e);

        reg.remove_all_components(e);

        assert!(reg.valid(e));
        assert!(!reg.has_any::<(Position, Velocity, Health)>(e));
    }

    #[test]
    fn test_has_all_has_any() {
        let mut reg = World::new();
        let e = reg.create();
        reg.emplace::<Position>(e);

        assert!(reg.has_all::<(Position,)>(e));
        assert!(!reg.has_all::<(Position, Velocity)>(e));
        assert!(reg.has_any::<(Velocity, Position)>(e));
        assert!(!reg.has_any::<(Velocity, Health)>(e));
    }

    #[test]
    fn test_get_all_mut() {
        let mut reg = World::new();
        let e = reg.create();
        reg.add(e, Position { x: 1.0, y: 1.0 });
        reg.add(e, Velocity { x: 2.0, y: 3.0 });

        let (pos, vel) = reg.get_all_mut::<(Position, Velocity)>(e);
        pos.x += vel.x;
        pos.y += vel.y;

        let (pos, _) = reg.get_all::<(Position, Velocity)>(e);
        assert_eq!(pos, &Position { x: 3.0, y: 4.0 });
    }

    #[test]
    fn test_view_intersection() {
        let mut reg = World::new();
        let a = reg.create();
        let b = reg.create();
        let c = reg.create();
        reg.emplace::<Position>(a);
        reg.emplace::<Velocity>(a);
        reg.emplace::<Velocity>(b);
        reg.emplace::<Velocity>(c);
        reg.emplace::<Position>(c);

        let mut seen: Vec<_> = reg.view::<(Position, Velocity)>().collect();
        seen.sort();
        assert_eq!(seen, vec![a, c]);

        // Primary order does not change the result
        let mut flipped: Vec<_> = reg.view::<(Velocity, Position)>().collect();
        flipped.sort();
        assert_eq!(flipped, seen);
    }

    #[test]
    fn test_view_get_mut_updates() {
        let mut reg = World::new();
        for i in 0..4 {
            let e = reg.create();
            reg.add(e, Position { x: i as f32, y: 0.0 });
            if i % 2 == 0 {
                reg.add(e, Velocity { x: 10.0, y: 0.0 });
            }
        }

        for (pos, vel) in reg.view_get_mut::<(Position, Velocity)>() {
            pos.x += vel.x;
        }

        let mut xs: Vec<_> = reg
            .view_get::<(Position,)>()
            .map(|(pos,)| pos.x as i32)
            .collect();
        xs.sort_unstable();
        assert_eq!(xs, vec![1, 3, 10, 12]);
    }

    #[test]
    fn test_view_reflects_removals() {
        let mut reg = World::new();
        let a = reg.create();
        let b = reg.create();
        reg.emplace::<Position>(a);
        reg.emplace::<Position>(b);
        assert_eq!(reg.view::<(Position,)>().count(), 2);

        reg.remove::<Position>(a);
        assert_eq!(reg.view::<(Position,)>().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_find() {
        let mut reg = World::new();
        let a = reg.create();
        let b = reg.create();
        reg.add(b, Health(5));

        assert_eq!(reg.find(|e| e == b), b);
        assert_eq!(reg.find(|e| e != a && e != b), Entity::NULL);
        assert_eq!(reg.find_with::<(Health,)>(|_, (hp,)| hp.0 == 5), b);
        assert_eq!(reg.find_with::<(Health,)>(|_, (hp,)| hp.0 == 6), Entity::NULL);
    }

    #[test]
    fn test_destroy_if_with_filters_by_component() {
        let mut reg = World::new();
        let mut alive = Vec::new();
        for hp in [0, 10, -5, 20] {
            let e = reg.create();
            reg.add(e, Health(hp));
            if hp > 0 {
                alive.push(e);
            }
        }
        let bare = reg.create();

        let destroyed = reg.destroy_if_with::<(Health,)>(|_, (hp,)| hp.0 <= 0);

        assert_eq!(destroyed, 2);
        assert_eq!(reg.size(), 3);
        assert!(reg.valid(bare));
        for e in alive {
            assert!(reg.valid(e));
        }
    }

    #[test]
    fn test_destroy_if_calls_pred_once_per_entity() {
        let mut reg = World::new();
        for _ in 0..6 {
            reg.create();
        }

        let mut calls = 0;
        let destroyed = reg.destroy_if(|_| {
            calls += 1;
            true
        });

        assert_eq!(calls, 6);
        assert_eq!(destroyed, 6);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut reg = World::new();
        let e = reg.create();
        reg.emplace::<Position>(e);
        reg.clear();

        assert_eq!(reg.size(), 0);
        assert!(!reg.valid(e));
        assert!(reg.storage::<Position>().is_empty());

        let next = reg.create();
        assert!(!reg.has::<Position>(next));
    }

    #[test]
    fn test_duplicate() {
        let mut reg = World::new();
        let e = reg.create();
        reg.add(e, Health(7));

        let copy = reg.duplicate(e);
        reg.get_mut::<Health>(e).0 = 1;

        assert_ne!(copy, e);
        assert_eq!(reg.get::<Health>(copy), &Health(7));
        assert!(!reg.has::<Position>(copy));
    }

    #[test]
    fn test_try_duplicate_at_limit() {
        let mut reg = World::with_config(RegistryConfig::fixed(1));
        let e = reg.create();
        reg.add(e, Health(7));

        assert_eq!(
            reg.try_duplicate(e),
            Err(RegistryError::CapacityExceeded { capacity: 1 })
        );
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn test_limited_registry() {
        let mut reg = World::with_config(RegistryConfig::default().with_max_entities(1));
        reg.create();
        assert_eq!(
            reg.try_create(),
            Err(RegistryError::CapacityExceeded { capacity: 1 })
        );
    }

    #[test]
    fn test_component_names() {
        let reg = World::new();
        let names = reg.component_names();
        assert_eq!(names.len(), 3);
        assert!(names[2].ends_with("Health"));
    }

    #[test]
    #[should_panic(expected = "is not a valid entity")]
    fn test_add_to_destroyed_panics() {
        let mut reg = World::new();
        let e = reg.create();
        reg.destroy(e);
        reg.add(e, Health(1));
    }

    #[test]
    #[should_panic(expected = "is not present")]
    fn test_get_missing_panics() {
        let mut reg = World::new();
        let e = reg.create();
        let _ = reg.get::<Health>(e);
    }

    #[test]
    #[should_panic(expected = "is not present")]
    fn test_remove_missing_panics() {
        let mut reg = World::new();
        let e = reg.create();
        reg.remove::<Health>(e);
    }

    #[test]
    #[should_panic(expected = "is not declared")]
    fn test_undeclared_type_panics() {
        let reg = World::new();
        let _ = reg.view::<(Position, Unlisted)>();
    }

    #[test]
    #[should_panic(expected = "names the same type more than once")]
    fn test_view_get_mut_rejects_aliasing() {
        let mut reg = World::new();
        let _ = reg.view_get_mut::<(Position, Position)>();
    }

    #[test]
    #[should_panic(expected = "is not a valid entity")]
    fn test_destroy_twice_panics() {
        let mut reg = World::new();
        let e = reg.create();
        reg.destroy_many([e, e]);
    }
}
