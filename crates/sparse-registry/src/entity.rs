//! Entity identifiers with generational indices.
//!
//! An id is recycled through the tracker's free list once its entity is
//! destroyed. Every recycle bumps the generation, so an identifier kept
//! around after `destroy` never aliases the entity that reuses its slot.

use std::fmt;

/// Generation counter to detect stale entity references.
/// Incremented each time an entity slot is recycled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u32);

impl Generation {
    /// The last generation a slot can reach. The tracker retires an id
    /// instead of recycling it past this point.
    pub const LAST: Generation = Generation(u32::MAX);

    /// Create a new generation (starts at 0).
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Increment the generation counter.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw generation value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Raw entity index, used to address the sparse arrays.
pub type EntityId = u32;

/// An opaque identifier for one logical object in a registry.
///
/// Ordering follows the packed bit value and carries no meaning beyond
/// making entities usable as sorted keys.
///
/// Each id can be issued `u32::MAX + 1` times, once per generation. After
/// that it is never issued again, so a stale entity never becomes valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    /// Generation counter for this slot. Declared first so the derived
    /// ordering matches `to_bits`.
    generation: Generation,
    /// Index into the sparse arrays.
    id: EntityId,
}

impl Entity {
    /// The "no entity" sentinel.
    ///
    /// Never issued by a registry, never valid, and returned by `find` when
    /// nothing matches.
    pub const NULL: Entity = Entity {
        generation: Generation(0),
        id: EntityId::MAX,
    };

    /// Create a new entity with the given ID and generation.
    #[must_use]
    pub const fn new(id: EntityId, generation: Generation) -> Self {
        Self { generation, id }
    }

    /// Get the entity's index.
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }

    /// Get the entity's generation.
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Whether this is the [`Entity::NULL`] sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.id == EntityId::MAX
    }

    /// The same slot one generation later, as handed out after a recycle.
    #[must_use]
    pub(crate) const fn recycled(self) -> Self {
        Self {
            generation: self.generation.next(),
            id: self.id,
        }
    }

    /// Pack entity into a single u64.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation.0 as u64) << 32) | (self.id as u64)
    }

    /// Unpack entity from a u64.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            generation: Generation((bits >> 32) as u32),
            id: bits as u32,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Entity(null)");
        }
        write!(f, "Entity({}v{})", self.id, self.generation.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }
        write!(f, "{}v{}", self.id, self.generation.0)
    }
}
