//! Closed component schemas.
//!
//! A registry's component types are fixed by its type parameter: a tuple
//! such as `(Position, Velocity)`. The tuple's [`Schema::Storage`] is the
//! matching tuple of [`SparseSet`]s, and every "for each declared type"
//! operation is unrolled over its fields by the macros below.

use std::any::{Any, TypeId, type_name};

use crate::{component::Component, entity::Entity, sparse_set::SparseSet};

/// A closed list of component types.
pub trait Schema: 'static {
    /// One [`SparseSet`] per declared type.
    type Storage: SchemaStorage;

    /// Number of declared types.
    const COUNT: usize;

    /// Declared type names, in declaration order.
    fn type_names() -> Vec<&'static str>;
}

mod sealed {
    pub trait Sealed {}
}

/// Per-type storage of a [`Schema`].
///
/// Sealed: only the unit and tuple storages below implement it, since
/// exclusive views trust [`SchemaStorage::set_ptr`] to return distinct
/// fields for distinct types.
pub trait SchemaStorage: sealed::Sealed + Default + 'static {
    /// Storage with every set sized for entity ids below `capacity`.
    fn with_capacity(capacity: usize) -> Self;

    /// The set holding `T`, or `None` if `T` is not declared.
    fn set<T: Component>(&self) -> Option<&SparseSet<T>>;

    /// The set holding `T` mutably, or `None` if `T` is not declared.
    fn set_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>>;

    /// Raw pointer to the set holding `T`, derived from `this` without
    /// creating a reference to the whole storage.
    ///
    /// # Safety
    ///
    /// `this` must point to a live storage value.
    unsafe fn set_ptr<T: Component>(this: *mut Self) -> Option<*mut SparseSet<T>>;

    /// Remove `entity` from every set that holds it. Returns how many
    /// components were dropped.
    fn erase_entity(&mut self, entity: Entity) -> usize;

    /// Number of sets holding `entity`.
    fn component_count(&self, entity: Entity) -> usize;

    /// Empty every set.
    fn clear(&mut self);

    /// The set holding `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not declared.
    #[track_caller]
    fn storage_of<T: Component>(&self) -> &SparseSet<T> {
        match self.set::<T>() {
            Some(set) => set,
            None => undeclared::<T>(),
        }
    }

    /// The set holding `T` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not declared.
    #[track_caller]
    fn storage_of_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        match self.set_mut::<T>() {
            Some(set) => set,
            None => undeclared::<T>(),
        }
    }

    /// Raw pointer to the set holding `T`.
    ///
    /// # Safety
    ///
    /// `this` must point to a live storage value.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not declared.
    #[track_caller]
    unsafe fn storage_ptr_of<T: Component>(this: *mut Self) -> *mut SparseSet<T> {
        // SAFETY: forwarded from the caller
        match unsafe { Self::set_ptr::<T>(this) } {
            Some(set) => set,
            None => undeclared::<T>(),
        }
    }
}

/// Storage whose every component type is `Clone`, which is what copying an
/// entity needs.
pub trait CloneStorage: SchemaStorage {
    /// Clone every component of `from` into `dst` under `to`.
    ///
    /// `to` must not hold any component in `dst` yet.
    fn clone_entity_into(&self, from: Entity, dst: &mut Self, to: Entity);

    /// Clone every component of `from` onto `to` within this storage.
    ///
    /// `to` must not hold any component yet.
    fn clone_entity_within(&mut self, from: Entity, to: Entity);
}

#[cold]
#[track_caller]
fn undeclared<T>() -> ! {
    panic!(
        "component type {} is not declared in this registry's schema",
        type_name::<T>()
    )
}

impl Schema for () {
    type Storage = ();

    const COUNT: usize = 0;

    fn type_names() -> Vec<&'static str> {
        Vec::new()
    }
}

impl sealed::Sealed for () {}

impl SchemaStorage for () {
    fn with_capacity(_capacity: usize) -> Self {}

    fn set<T: Component>(&self) -> Option<&SparseSet<T>> {
        None
    }

    fn set_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        None
    }

    unsafe fn set_ptr<T: Component>(_this: *mut Self) -> Option<*mut SparseSet<T>> {
        None
    }

    fn erase_entity(&mut self, _entity: Entity) -> usize {
        0
    }

    fn component_count(&self, _entity: Entity) -> usize {
        0
    }

    fn clear(&mut self) {}
}

impl CloneStorage for () {
    fn clone_entity_into(&self, _from: Entity, _dst: &mut Self, _to: Entity) {}

    fn clone_entity_within(&mut self, _from: Entity, _to: Entity) {}
}

macro_rules! impl_schema {
    ($( ($ty:ident, $idx:tt) ),+) => {
        impl<$( $ty: Component ),+> Schema for ($( $ty, )+) {
            type Storage = ($( SparseSet<$ty>, )+);

            const COUNT: usize = [$( $idx ),+].len();

            fn type_names() -> Vec<&'static str> {
                vec![$( type_name::<$ty>() ),+]
            }
        }

        impl<$( $ty: Component ),+> sealed::Sealed for ($( SparseSet<$ty>, )+) {}

        impl<$( $ty: Component ),+> SchemaStorage for ($( SparseSet<$ty>, )+) {
            fn with_capacity(capacity: usize) -> Self {
                ($( SparseSet::<$ty>::with_capacity(capacity), )+)
            }

            fn set<T: Component>(&self) -> Option<&SparseSet<T>> {
                $(
                    if let Some(set) = (&self.$idx as &dyn Any).downcast_ref::<SparseSet<T>>() {
                        return Some(set);
                    }
                )+
                None
            }

            fn set_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
                $(
                    if TypeId::of::<T>() == TypeId::of::<$ty>() {
                        return (&mut self.$idx as &mut dyn Any).downcast_mut::<SparseSet<T>>();
                    }
                )+
                None
            }

            unsafe fn set_ptr<T: Component>(this: *mut Self) -> Option<*mut SparseSet<T>> {
                $(
                    if TypeId::of::<T>() == TypeId::of::<$ty>() {
                        // SAFETY: `this` is live; T == $ty so the cast is exact
                        let field = unsafe { std::ptr::addr_of_mut!((*this).$idx) };
                        return Some(field.cast::<SparseSet<T>>());
                    }
                )+
                None
            }

            fn erase_entity(&mut self, entity: Entity) -> usize {
                let mut removed = 0;
                $(
                    if self.$idx.contains(entity) {
                        self.$idx.erase(entity);
                        removed += 1;
                    }
                )+
                removed
            }

            fn component_count(&self, entity: Entity) -> usize {
                0 $( + usize::from(self.$idx.contains(entity)) )+
            }

            fn clear(&mut self) {
                $( self.$idx.clear(); )+
            }
        }

        impl<$( $ty: Component + Clone ),+> CloneStorage for ($( SparseSet<$ty>, )+) {
            fn clone_entity_into(&self, from: Entity, dst: &mut Self, to: Entity) {
                $(
                    if let Some(value) = self.$idx.get_if(from) {
                        dst.$idx.insert(to, value.clone());
                    }
                )+
            }

            fn clone_entity_within(&mut self, from: Entity, to: Entity) {
                $(
                    if let Some(value) = self.$idx.get_if(from).cloned() {
                        self.$idx.insert(to, value);
                    }
                )+
            }
        }
    };
}

impl_schema!((A, 0));
impl_schema!((A, 0), (B, 1));
impl_schema!((A, 0), (B, 1), (C, 2));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));
impl_schema!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8));
impl_schema!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9)
);
impl_schema!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9),
    (K, 10)
);
impl_schema!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9),
    (K, 10), (L, 11)
);
