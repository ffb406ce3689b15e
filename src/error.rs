//! Error types for the physics core.
//!
//! Registry bookkeeping never fails; this covers operations that address
//! objects or generators by id and world configuration.

use std::fmt;

use crate::dynamics::registry::GeneratorId;
use crate::utils::allocator::EntityId;

/// Main error type for the physics core.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The object id is unknown or refers to a destroyed object.
    UnknownObject(EntityId),
    /// The generator id is not registered (or was already removed).
    UnknownGenerator(GeneratorId),
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownObject(id) => write!(
                f,
                "Unknown object: index {} generation {}",
                id.index(),
                id.generation()
            ),
            Self::UnknownGenerator(id) => write!(f, "Unknown force generator: {id}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Convenient result alias for physics operations.
pub type Result<T> = std::result::Result<T, PhysicsError>;
