//! Copying entities between registries of the same schema.

use tracing::trace;

use crate::{
    entity::Entity,
    error::RegistryResult,
    registry::Registry,
    schema::{CloneStorage, Schema},
};

/// Create an entity in `destination` carrying clones of every component
/// `entity` has in `source`.
///
/// The copy is independent: later changes to either side are not seen by
/// the other. To copy within one registry use [`Registry::duplicate`].
///
/// # Panics
///
/// Panics if `entity` is not valid in `source`, or if `destination` has an
/// entity limit and it is reached.
#[track_caller]
pub fn copy<S>(entity: Entity, source: &Registry<S>, destination: &mut Registry<S>) -> Entity
where
    S: Schema,
    S::Storage: CloneStorage,
{
    match try_copy(entity, source, destination) {
        Ok(copy) => copy,
        Err(err) => panic!("{err}"),
    }
}

/// Fallible [`copy`] for capacity-limited destinations.
///
/// # Errors
///
/// Returns [`RegistryError::CapacityExceeded`](crate::RegistryError::CapacityExceeded)
/// if `destination` cannot take another entity. Nothing is created in that
/// case.
///
/// # Panics
///
/// Panics if `entity` is not valid in `source`.
#[track_caller]
pub fn try_copy<S>(
    entity: Entity,
    source: &Registry<S>,
    destination: &mut Registry<S>,
) -> RegistryResult<Entity>
where
    S: Schema,
    S::Storage: CloneStorage,
{
    source.assert_valid(entity);
    let copy = destination.try_create()?;
    source
        .component_storage()
        .clone_entity_into(entity, destination.component_storage_mut(), copy);
    trace!(%entity, %copy, "copied entity across registries");
    Ok(copy)
}
