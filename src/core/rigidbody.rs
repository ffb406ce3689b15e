use crate::config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING};
use crate::utils::allocator::EntityId;

use super::types::{MassProperties, Transform, Velocity};
use glam::Vec2;

/// A simulated object: kinematic state, mass data and force accumulators.
///
/// Objects are created outside the simulation and only take part in it while
/// the owning [`PhysicsWorld`](crate::PhysicsWorld) lists them as members.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: EntityId,
    pub name: String,
    pub transform: Transform,
    pub velocity: Velocity,
    pub force: Vec2,
    pub torque: f32,
    pub mass_properties: MassProperties,
    pub gravity_scale: f32,
    pub is_static: bool,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Speed cap in m/s; `None` leaves the speed unbounded.
    pub max_speed: Option<f32>,
    inverse_mass: f32,
    inverse_inertia: f32,
    in_world: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        let mut body = Self {
            id: EntityId::default(),
            name: String::new(),
            transform: Transform::default(),
            velocity: Velocity::default(),
            force: Vec2::ZERO,
            torque: 0.0,
            mass_properties: MassProperties::default(),
            gravity_scale: 1.0,
            is_static: false,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            max_speed: None,
            inverse_mass: 1.0,
            inverse_inertia: 1.0,
            in_world: false,
        };
        body.recompute_inverses();
        body
    }
}

impl RigidBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_mass_properties(mut self, props: MassProperties) -> Self {
        self.set_mass_properties(props);
        self
    }

    /// Whether the object currently takes part in the simulation.
    pub fn is_in_world(&self) -> bool {
        self.in_world
    }

    pub(crate) fn set_in_world(&mut self, in_world: bool) {
        self.in_world = in_world;
    }

    pub fn mass(&self) -> f32 {
        self.mass_properties.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    pub fn speed(&self) -> f32 {
        self.velocity.linear.length()
    }

    pub fn set_velocity(&mut self, linear: Vec2, angular: f32) {
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    /// Accumulates a force through the center of mass.
    pub fn add_force(&mut self, force: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
    }

    /// Accumulates a force applied at a world-space point, producing torque
    /// about the center of mass.
    pub fn add_force_at(&mut self, force: Vec2, point: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
        self.torque += (point - self.transform.position).perp_dot(force);
    }

    pub fn add_torque(&mut self, torque: f32) {
        if self.is_static {
            return;
        }
        self.torque += torque;
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.mass_properties = props;
        self.recompute_inverses();
    }

    fn recompute_inverses(&mut self) {
        self.inverse_mass = if self.mass_properties.mass.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.mass_properties.mass
        };
        self.inverse_inertia = if self.mass_properties.inertia.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.mass_properties.inertia
        };
    }
}
