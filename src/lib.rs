//! MiniCore – the physics core of a 2D racing engine.
//!
//! Objects live in a [`PhysicsWorld`]. Force generators are registered per
//! object in a [`ForceRegistry`], which the world runs once per fixed tick
//! before integrating the accumulated forces. Rendering, input and menus sit
//! on top of this crate and only read back object state.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use config::WorldConfig;
pub use crate::core::{
    rigidbody::RigidBody,
    types::{MassProperties, Transform, Velocity},
};
pub use dynamics::{
    forces::{DragForce, ForceGenerator, FrictionForce, GravityForce, SpringForce, ThrustForce},
    integrator::Integrator,
    registry::{
        ForceRegistry, ForceTargets, GeneratorId, Ownership, Registration, SharedForceGenerator,
    },
};
pub use error::{PhysicsError, Result};
pub use utils::allocator::{Arena, ArenaKey, EntityId, GenerationalId};
pub use world::{ObjectSet, PhysicsWorld};
