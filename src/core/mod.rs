//! Core types describing simulated objects and their shared data.

pub mod rigidbody;
pub mod types;

pub use rigidbody::RigidBody;
pub use types::{MassProperties, Transform, Velocity};
