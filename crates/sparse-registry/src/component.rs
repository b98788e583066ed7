//! Component marker trait and component sets.
//!
//! A [`ComponentSet`] is a tuple of component types used to ask about
//! several types at once: `has_all::<(Position, Velocity)>`,
//! `view::<(Position, Velocity)>` and friends. The first element is the
//! *primary* type, whose dense array drives view iteration.

use std::any::{TypeId, type_name};

use crate::{entity::Entity, schema::SchemaStorage};

/// Marker trait for types that can be used as components.
///
/// ```ignore
/// struct Position { x: f32, y: f32, z: f32 }
/// let registry = Registry::<(Position,)>::new();
/// ```
pub trait Component: 'static {}

// Blanket implementation for all suitable types
impl<T: 'static> Component for T {}

mod sealed {
    pub trait Sealed {}
}

/// A tuple of component types queried together.
///
/// Implemented for tuples of up to twelve component types and sealed: the
/// exclusive views rely on [`ComponentSet::assert_disjoint`] and
/// [`ComponentSet::fetch_mut`] behaving exactly as the tuple impls do.
///
/// ```compile_fail
/// use sparse_registry::{ComponentSet, Entity, SchemaStorage};
///
/// struct Custom;
///
/// impl ComponentSet for Custom {
///     type Refs<'a> = ();
///     type Muts<'a> = ();
///     const COUNT: usize = 0;
///
///     fn primary<St: SchemaStorage>(_: &St) -> &[Entity] { &[] }
///     fn has_all<St: SchemaStorage>(_: &St, _: Entity) -> bool { true }
///     fn has_any<St: SchemaStorage>(_: &St, _: Entity) -> bool { true }
///     fn fetch<St: SchemaStorage>(_: &St, _: Entity) -> Option<()> { Some(()) }
///     unsafe fn fetch_mut<'a, St: SchemaStorage>(_: *mut St, _: Entity) -> Option<()> { Some(()) }
///     fn assert_declared<St: SchemaStorage>(_: &St) {}
///     fn assert_disjoint() {}
/// }
/// ```
pub trait ComponentSet: sealed::Sealed + 'static {
    /// Shared references to each component, in tuple order.
    type Refs<'a>;
    /// Exclusive references to each component, in tuple order.
    type Muts<'a>;

    /// Number of types in the set.
    const COUNT: usize;

    /// Dense entity array of the primary type.
    fn primary<St: SchemaStorage>(storage: &St) -> &[Entity];

    /// Whether `entity` has every type of the set.
    fn has_all<St: SchemaStorage>(storage: &St, entity: Entity) -> bool;

    /// Whether `entity` has at least one type of the set.
    fn has_any<St: SchemaStorage>(storage: &St, entity: Entity) -> bool;

    /// References to every component of `entity`, or `None` if one is
    /// missing.
    fn fetch<St: SchemaStorage>(storage: &St, entity: Entity) -> Option<Self::Refs<'_>>;

    /// Exclusive references to every component of `entity`, or `None` if one
    /// is missing.
    ///
    /// # Safety
    ///
    /// - `storage` must be valid for reads and writes for `'a`.
    /// - The types of the set must be distinct (see
    ///   [`ComponentSet::assert_disjoint`]).
    /// - No other reference to these components of `entity` may be live
    ///   during `'a`.
    unsafe fn fetch_mut<'a, St: SchemaStorage>(
        storage: *mut St,
        entity: Entity,
    ) -> Option<Self::Muts<'a>>;

    /// Panic if a type of the set is not declared in `storage`'s schema.
    fn assert_declared<St: SchemaStorage>(storage: &St);

    /// Panic if a type appears twice in the set.
    fn assert_disjoint();
}

macro_rules! component_set_tuple {
    ($head_ty:ident) => {
        impl_component_set_tuple!($head_ty);
    };
    ($head_ty:ident, $( $tail_ty:ident ),*) => (
        impl_component_set_tuple!($head_ty, $( $tail_ty ),*);
        component_set_tuple!($( $tail_ty ),*);
    );
}

macro_rules! impl_component_set_tuple {
    ($primary:ident $(, $ty:ident )*) => {
        impl<$primary: Component $(, $ty: Component )*> sealed::Sealed for ($primary, $( $ty, )*) {}

        impl<$primary: Component $(, $ty: Component )*> ComponentSet for ($primary, $( $ty, )*) {
            type Refs<'a> = (&'a $primary, $( &'a $ty, )*);
            type Muts<'a> = (&'a mut $primary, $( &'a mut $ty, )*);

            const COUNT: usize = [stringify!($primary) $(, stringify!($ty) )*].len();

            fn primary<St: SchemaStorage>(storage: &St) -> &[Entity] {
                storage.storage_of::<$primary>().entities()
            }

            fn has_all<St: SchemaStorage>(storage: &St, entity: Entity) -> bool {
                storage.storage_of::<$primary>().contains(entity)
                    $( && storage.storage_of::<$ty>().contains(entity) )*
            }

            fn has_any<St: SchemaStorage>(storage: &St, entity: Entity) -> bool {
                storage.storage_of::<$primary>().contains(entity)
                    $( || storage.storage_of::<$ty>().contains(entity) )*
            }

            fn fetch<St: SchemaStorage>(storage: &St, entity: Entity) -> Option<Self::Refs<'_>> {
                Some((
                    storage.storage_of::<$primary>().get_if(entity)?,
                    $( storage.storage_of::<$ty>().get_if(entity)?, )*
                ))
            }

            #[allow(non_snake_case)]
            unsafe fn fetch_mut<'a, St: SchemaStorage>(
                storage: *mut St,
                entity: Entity,
            ) -> Option<Self::Muts<'a>> {
                // SAFETY: `storage` is valid per the caller; each set is only
                // borrowed for the duration of the lookup
                let $primary = unsafe { (*St::storage_ptr_of::<$primary>(storage)).value_ptr(entity)? };
                $(
                    // SAFETY: as above
                    let $ty = unsafe { (*St::storage_ptr_of::<$ty>(storage)).value_ptr(entity)? };
                )*
                // SAFETY: distinct types live in distinct sets, so these
                // pointers never alias
                Some(unsafe { (&mut *$primary.as_ptr(), $( &mut *$ty.as_ptr(), )*) })
            }

            fn assert_declared<St: SchemaStorage>(storage: &St) {
                let _ = storage.storage_of::<$primary>();
                $( let _ = storage.storage_of::<$ty>(); )*
            }

            fn assert_disjoint() {
                let ids = [TypeId::of::<$primary>() $(, TypeId::of::<$ty>() )*];
                for (i, id) in ids.iter().enumerate() {
                    assert!(
                        !ids[i + 1..].contains(id),
                        "component set {} names the same type more than once",
                        type_name::<Self>()
                    );
                }
            }
        }
    };
}

component_set_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
