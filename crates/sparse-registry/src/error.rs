//! Registry error types.
//!
//! Only expected, recoverable outcomes live here. Contract violations
//! (invalid entity, missing component, undeclared type) panic instead.

use thiserror::Error;

/// Registry error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A capacity-limited registry has no room for another entity.
    #[error("entity capacity exceeded: registry holds at most {capacity} entities")]
    CapacityExceeded {
        /// The configured entity limit.
        capacity: usize,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
