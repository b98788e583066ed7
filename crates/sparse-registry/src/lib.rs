// Raw pointers are needed to hand out several exclusive component borrows at once
#![allow(unsafe_code)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_fields_in_debug)]

//! Sparse Registry - fixed-schema sparse-set Entity Component storage
//!
//! A [`Registry`] is declared with a closed tuple of component types and
//! keeps one [`SparseSet`] per type next to an [`EntityTracker`].
//!
//! # Key Concepts
//!
//! - **Entity**: A generational identifier; recycled ids never alias
//! - **Component**: Any `'static` value attached to an entity
//! - **Schema**: The tuple of component types a registry may hold
//! - **View**: A lazy intersection over several component types
//!
//! # Example
//!
//! ```ignore
//! let mut registry = Registry::<(Position, Velocity)>::new();
//!
//! let e = registry.create();
//! registry.add(e, Position { x: 0.0, y: 0.0 });
//! registry.add(e, Velocity { x: 1.0, y: 0.5 });
//!
//! for (pos, vel) in registry.view_get_mut::<(Position, Velocity)>() {
//!     pos.x += vel.x;
//!     pos.y += vel.y;
//! }
//!
//! registry.destroy_if(|entity| entity == e);
//! ```
//!
//! # Contract Violations
//!
//! Operating on a destroyed entity, reading or removing a missing component,
//! or naming a type outside the schema panics. The `has*`, `get_if*`,
//! `take` and `find*` operations report absence instead.

mod component;
mod config;
mod copy;
mod entity;
mod error;
mod fixed;
mod handle;
mod registry;
mod schema;
mod sparse_set;
mod tracker;
mod view;

pub use component::{Component, ComponentSet};
pub use config::RegistryConfig;
pub use copy::{copy, try_copy};
pub use entity::{Entity, EntityId, Generation};
pub use error::{RegistryError, RegistryResult};
pub use fixed::{DEFAULT_FIXED_CAPACITY, FixedRegistry};
pub use handle::{CreateFrom, Handle, create_from, try_create_from};
pub use registry::Registry;
pub use schema::{CloneStorage, Schema, SchemaStorage};
pub use sparse_set::{Iter, IterMut, SparseSet};
pub use tracker::EntityTracker;
pub use view::{All, Entries, View, ViewGet, ViewGetMut};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Entity, FixedRegistry, Handle, Registry, RegistryConfig, RegistryError, copy, create_from,
    };
}
