//! Simulation dynamics: force generators, the force registry and integration.

pub mod forces;
pub mod integrator;
pub mod registry;

pub use forces::{DragForce, ForceGenerator, FrictionForce, GravityForce, SpringForce, ThrustForce};
pub use integrator::Integrator;
pub use registry::{ForceRegistry, ForceTargets, GeneratorId, Ownership, Registration};
