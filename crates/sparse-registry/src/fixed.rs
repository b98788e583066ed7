//! Fixed-capacity registry.
//!
//! All storage is allocated up front for `N` entities and never grows.
//! Every operation that creates an entity reports exhaustion instead of
//! reallocating or panicking.

use std::{fmt, ops::Deref};

use crate::{
    component::{Component, ComponentSet},
    config::RegistryConfig,
    copy::try_copy,
    entity::Entity,
    error::RegistryResult,
    handle::{CreateFrom, Handle, try_create_from},
    registry::Registry,
    schema::{CloneStorage, Schema},
    view::ViewGetMut,
};

/// Default capacity of a [`FixedRegistry`].
pub const DEFAULT_FIXED_CAPACITY: usize = 1024;

/// A [`Registry`] holding at most `N` live entities.
///
/// Read-only registry operations are available through `Deref`. Mutating
/// ones are forwarded here, with every entity-creating call (`create`,
/// `create_handle`, `duplicate`, `copy_from` and [`create_from`]) returning
/// a `Result`. There is no `DerefMut`, so the panicking creators of
/// [`Registry`] cannot be reached.
///
/// ```ignore
/// let mut registry = FixedRegistry::<(Position,), 128>::new();
/// let e = registry.create()?;
/// registry.add(e, Position::default());
/// ```
///
/// [`create_from`]: crate::create_from
pub struct FixedRegistry<S: Schema, const N: usize = DEFAULT_FIXED_CAPACITY> {
    inner: Registry<S>,
}

impl<S: Schema, const N: usize> Default for FixedRegistry<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema, const N: usize> FixedRegistry<S, N> {
    /// Allocate storage for `N` entities.
    #[must_use]
    pub fn new() -> Self {
        let config = RegistryConfig::fixed(N);
        debug_assert!(config.is_fixed());
        Self {
            inner: Registry::with_config(config),
        }
    }

    /// Maximum number of live entities.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    // ==================== Entity Operations ====================

    /// Create an entity with no components.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if `N` entities are already alive.
    pub fn create(&mut self) -> RegistryResult<Entity> {
        self.inner.try_create()
    }

    /// Create an entity and return a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if `N` entities are already alive.
    pub fn create_handle(&mut self) -> RegistryResult<Handle<'_, S>> {
        try_create_from(&mut self.inner)
    }

    /// Create a new entity carrying clones of every component of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if `N` entities are already alive.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid.
    #[track_caller]
    pub fn duplicate(&mut self, entity: Entity) -> RegistryResult<Entity>
    where
        S::Storage: CloneStorage,
    {
        self.inner.try_duplicate(entity)
    }

    /// Create an entity carrying clones of every component `entity` has in
    /// `source`. See [`try_copy`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
    /// if `N` entities are already alive.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not valid in `source`.
    #[track_caller]
    pub fn copy_from(&mut self, entity: Entity, source: &Registry<S>) -> RegistryResult<Entity>
    where
        S::Storage: CloneStorage,
    {
        try_copy(entity, source, &mut self.inner)
    }

    /// See [`Registry::destroy`].
    #[track_caller]
    pub fn destroy(&mut self, entity: Entity) {
        self.inner.destroy(entity);
    }

    /// See [`Registry::destroy_many`].
    #[track_caller]
    pub fn destroy_many<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        self.inner.destroy_many(entities);
    }

    /// See [`Registry::clear`].
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// See [`Registry::handle`].
    #[track_caller]
    pub fn handle(&mut self, entity: Entity) -> Handle<'_, S> {
        self.inner.handle(entity)
    }

    // ==================== Component Operations ====================

    /// See [`Registry::add`].
    #[track_caller]
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.inner.add(entity, value)
    }

    /// See [`Registry::add_cloned`].
    #[track_caller]
    pub fn add_cloned<T: Component + Clone>(&mut self, entity: Entity, value: &T) -> &mut T {
        self.inner.add_cloned(entity, value)
    }

    /// See [`Registry::emplace`].
    #[track_caller]
    pub fn emplace<T: Component + Default>(&mut self, entity: Entity) -> &mut T {
        self.inner.emplace(entity)
    }

    /// See [`Registry::emplace_with`].
    #[track_caller]
    pub fn emplace_with<T: Component>(&mut self, entity: Entity, init: impl FnOnce() -> T) -> &mut T {
        self.inner.emplace_with(entity, init)
    }

    /// See [`Registry::remove`].
    #[track_caller]
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.inner.remove(entity)
    }

    /// See [`Registry::take`].
    pub fn take<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.inner.take(entity)
    }

    /// See [`Registry::remove_all_components`].
    #[track_caller]
    pub fn remove_all_components(&mut self, entity: Entity) {
        self.inner.remove_all_components(entity);
    }

    /// See [`Registry::get_mut`].
    #[must_use]
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.inner.get_mut(entity)
    }

    /// See [`Registry::get_if_mut`].
    #[must_use]
    pub fn get_if_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.inner.get_if_mut(entity)
    }

    /// See [`Registry::get_all_mut`].
    #[must_use]
    #[track_caller]
    pub fn get_all_mut<Q: ComponentSet>(&mut self, entity: Entity) -> Q::Muts<'_> {
        self.inner.get_all_mut::<Q>(entity)
    }

    // ==================== Iteration & Bulk Destruction ====================

    /// See [`Registry::view_get_mut`].
    pub fn view_get_mut<Q: ComponentSet>(&mut self) -> ViewGetMut<'_, S::Storage, Q> {
        self.inner.view_get_mut::<Q>()
    }

    /// See [`Registry::destroy_if`].
    pub fn destroy_if(&mut self, pred: impl FnMut(Entity) -> bool) -> usize {
        self.inner.destroy_if(pred)
    }

    /// See [`Registry::erase_if`].
    pub fn erase_if(&mut self, pred: impl FnMut(Entity) -> bool) -> usize {
        self.inner.erase_if(pred)
    }

    /// See [`Registry::destroy_if_with`].
    pub fn destroy_if_with<Q: ComponentSet>(
        &mut self,
        pred: impl FnMut(Entity, Q::Refs<'_>) -> bool,
    ) -> usize {
        self.inner.destroy_if_with::<Q>(pred)
    }

    /// The underlying registry. It keeps the limit of `N` entities.
    #[must_use]
    pub fn into_inner(self) -> Registry<S> {
        self.inner
    }
}

impl<S: Schema, const N: usize> CreateFrom for FixedRegistry<S, N> {
    type Output<'r>
        = RegistryResult<Handle<'r, S>>
    where
        Self: 'r;

    fn create_from(&mut self) -> Self::Output<'_> {
        self.create_handle()
    }
}

impl<S: Schema, const N: usize> Deref for FixedRegistry<S, N> {
    type Target = Registry<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: Schema, const N: usize> fmt::Debug for FixedRegistry<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedRegistry")
            .field("capacity", &N)
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegistryError, create_from};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Foo(u32);

    #[test]
    fn test_capacity_exceeded() {
        let mut reg = FixedRegistry::<(Foo,), 3>::new();
        for _ in 0..3 {
            reg.create().unwrap();
        }

        assert_eq!(reg.create(), Err(RegistryError::CapacityExceeded { capacity: 3 }));
        assert_eq!(reg.size(), 3);
    }

    #[test]
    fn test_destroy_frees_capacity() {
        let mut reg = FixedRegistry::<(Foo,), 2>::new();
        let a = reg.create().unwrap();
        reg.create().unwrap();
        reg.destroy(a);

        let c = reg.create().unwrap();
        assert_eq!(c.id(), a.id());
        assert!(!reg.valid(a));
    }

    #[test]
    fn test_storage_never_grows() {
        let mut reg = FixedRegistry::<(Foo,), 8>::new();
        let values = reg.storage::<Foo>().capacity();
        let free_list = reg.tracker().free_list_capacity();

        for _ in 0..3 {
            while let Ok(e) = reg.create() {
                reg.add(e, Foo(e.id()));
            }
            assert_eq!(reg.size(), 8);

            // Retire half one by one, then the rest in bulk
            let half: Vec<_> = reg.all().take(4).collect();
            reg.destroy_many(half);
            reg.clear();
        }

        assert!(reg.is_empty());
        assert_eq!(reg.storage::<Foo>().capacity(), values);
        assert_eq!(reg.tracker().free_list_capacity(), free_list);
        assert!(reg.tracker().high_water() <= 8);
    }

    #[test]
    fn test_default_capacity() {
        let reg = FixedRegistry::<(Foo,)>::default();
        assert_eq!(reg.capacity(), DEFAULT_FIXED_CAPACITY);
        assert_eq!(reg.max_entities(), Some(DEFAULT_FIXED_CAPACITY));
    }

    #[test]
    fn test_create_handle() {
        let mut reg = FixedRegistry::<(Foo,), 1>::new();
        let e = {
            let mut h = reg.create_handle().unwrap();
            h.emplace::<Foo>();
            h.entity()
        };

        assert!(reg.has::<Foo>(e));
        assert!(reg.create_handle().is_err());
    }

    #[test]
    fn test_creators_report_exhaustion() {
        let mut reg = FixedRegistry::<(Foo,), 1>::new();
        let e = reg.create().unwrap();
        reg.add(e, Foo(1));
        let full = Err(RegistryError::CapacityExceeded { capacity: 1 });

        assert_eq!(reg.duplicate(e), full);
        assert_eq!(create_from(&mut reg).map(|h| h.entity()), full);

        let source = {
            let mut source = Registry::<(Foo,)>::new();
            source.create();
            source
        };
        let other = source.all().next().unwrap();
        assert_eq!(reg.copy_from(other, &source), full);
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn test_duplicate_with_room() {
        let mut reg = FixedRegistry::<(Foo,), 2>::new();
        let e = reg.create().unwrap();
        reg.add(e, Foo(5));

        let copy = reg.duplicate(e).unwrap();
        assert_eq!(reg.get::<Foo>(copy), &Foo(5));
    }
}
