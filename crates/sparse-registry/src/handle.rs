//! Entity handles - an entity paired with the registry it lives in.
//!
//! A handle is a borrow, not an owner. It does no validity tracking of its
//! own: every call forwards to the registry with the captured entity.

use std::fmt;

use crate::{
    component::{Component, ComponentSet},
    entity::Entity,
    error::RegistryResult,
    registry::Registry,
    schema::Schema,
};

/// Registries an entity handle can be created from.
///
/// A [`Registry`] hands the handle out directly. A
/// [`FixedRegistry`](crate::FixedRegistry) wraps it in a `Result`, since it
/// may be full.
pub trait CreateFrom {
    /// What [`create_from`] returns for this registry.
    type Output<'r>
    where
        Self: 'r;

    /// Create an entity and pair it with `self`.
    fn create_from(&mut self) -> Self::Output<'_>;
}

impl<S: Schema> CreateFrom for Registry<S> {
    type Output<'r>
        = Handle<'r, S>
    where
        Self: 'r;

    #[track_caller]
    fn create_from(&mut self) -> Handle<'_, S> {
        let entity = self.create();
        Handle::new(entity, self)
    }
}

/// Create an entity in `registry` and return a handle to it.
///
/// ```ignore
/// let mut registry = Registry::<(Position,)>::new();
/// let mut h = create_from(&mut registry);
/// h.emplace::<Position>();
///
/// let mut fixed = FixedRegistry::<(Position,), 16>::new();
/// let mut h = create_from(&mut fixed)?;
/// ```
///
/// # Panics
///
/// Panics if `registry` is a [`Registry`] with an entity limit and the
/// limit is reached. Use [`try_create_from`] for those.
#[track_caller]
pub fn create_from<R: CreateFrom>(registry: &mut R) -> R::Output<'_> {
    registry.create_from()
}

/// Fallible [`create_from`] for capacity-limited registries.
///
/// # Errors
///
/// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
/// if the registry cannot take another entity.
pub fn try_create_from<S: Schema>(registry: &mut Registry<S>) -> RegistryResult<Handle<'_, S>> {
    let entity = registry.try_create()?;
    Ok(Handle::new(entity, registry))
}

/// An entity together with an exclusive borrow of its registry.
pub struct Handle<'r, S: Schema> {
    entity: Entity,
    registry: &'r mut Registry<S>,
}

impl<'r, S: Schema> Handle<'r, S> {
    pub(crate) fn new(entity: Entity, registry: &'r mut Registry<S>) -> Self {
        Self { entity, registry }
    }

    /// The wrapped entity.
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    /// The owning registry.
    #[must_use]
    pub fn registry(&self) -> &Registry<S> {
        &*self.registry
    }

    /// The owning registry, mutably.
    pub fn registry_mut(&mut self) -> &mut Registry<S> {
        &mut *self.registry
    }

    /// See [`Registry::valid`].
    #[must_use]
    pub fn valid(&self) -> bool {
        self.registry.valid(self.entity)
    }

    /// See [`Registry::add`].
    #[track_caller]
    pub fn add<T: Component>(&mut self, value: T) -> &mut T {
        self.registry.add(self.entity, value)
    }

    /// See [`Registry::add_cloned`].
    #[track_caller]
    pub fn add_cloned<T: Component + Clone>(&mut self, value: &T) -> &mut T {
        self.registry.add_cloned(self.entity, value)
    }

    /// See [`Registry::emplace`].
    #[track_caller]
    pub fn emplace<T: Component + Default>(&mut self) -> &mut T {
        self.registry.emplace(self.entity)
    }

    /// See [`Registry::emplace_with`].
    #[track_caller]
    pub fn emplace_with<T: Component>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.registry.emplace_with(self.entity, init)
    }

    /// See [`Registry::remove`].
    #[track_caller]
    pub fn remove<T: Component>(&mut self) -> T {
        self.registry.remove(self.entity)
    }

    /// See [`Registry::take`].
    pub fn take<T: Component>(&mut self) -> Option<T> {
        self.registry.take(self.entity)
    }

    /// See [`Registry::remove_all_components`].
    #[track_caller]
    pub fn remove_all_components(&mut self) {
        self.registry.remove_all_components(self.entity);
    }

    /// See [`Registry::has`].
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.registry.has::<T>(self.entity)
    }

    /// See [`Registry::has_all`].
    #[must_use]
    pub fn has_all<Q: ComponentSet>(&self) -> bool {
        self.registry.has_all::<Q>(self.entity)
    }

    /// See [`Registry::has_any`].
    #[must_use]
    pub fn has_any<Q: ComponentSet>(&self) -> bool {
        self.registry.has_any::<Q>(self.entity)
    }

    /// See [`Registry::get`].
    #[must_use]
    #[track_caller]
    pub fn get<T: Component>(&self) -> &T {
        self.registry.get(self.entity)
    }

    /// See [`Registry::get_mut`].
    #[must_use]
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self) -> &mut T {
        self.registry.get_mut(self.entity)
    }

    /// See [`Registry::get_if`].
    #[must_use]
    pub fn get_if<T: Component>(&self) -> Option<&T> {
        self.registry.get_if(self.entity)
    }

    /// See [`Registry::get_if_mut`].
    #[must_use]
    pub fn get_if_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.registry.get_if_mut(self.entity)
    }

    /// See [`Registry::get_all`].
    #[must_use]
    #[track_caller]
    pub fn get_all<Q: ComponentSet>(&self) -> Q::Refs<'_> {
        self.registry.get_all::<Q>(self.entity)
    }

    /// See [`Registry::get_all_mut`].
    #[must_use]
    #[track_caller]
    pub fn get_all_mut<Q: ComponentSet>(&mut self) -> Q::Muts<'_> {
        self.registry.get_all_mut::<Q>(self.entity)
    }

    /// Destroy the entity, giving the registry borrow back.
    #[track_caller]
    pub fn destroy(self) -> &'r mut Registry<S> {
        self.registry.destroy(self.entity);
        self.registry
    }
}

impl<S: Schema> fmt::Debug for Handle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.entity).finish()
    }
}
