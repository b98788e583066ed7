//! Registry construction settings.

/// Settings consumed by [`Registry::with_config`](crate::Registry::with_config).
///
/// ```ignore
/// let config = RegistryConfig::default()
///     .with_initial_capacity(4096)
///     .with_max_entities(4096);
/// let registry = Registry::<(Position, Velocity)>::with_config(config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Entities (and components per type) to allocate room for up front.
    pub initial_capacity: usize,
    /// Upper bound on live entities. `None` means the registry grows freely.
    pub max_entities: Option<usize>,
}

impl RegistryConfig {
    /// Config for a registry that never grows past `capacity` entities and
    /// allocates all of its storage at construction.
    #[must_use]
    pub const fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            max_entities: Some(capacity),
        }
    }

    /// Set the up-front allocation size.
    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the live entity limit.
    #[must_use]
    pub const fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = Some(max);
        self
    }

    /// Whether storage is sized once and never reallocated.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        match self.max_entities {
            Some(max) => max <= self.initial_capacity,
            None => false,
        }
    }
}
