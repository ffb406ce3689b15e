use crate::config::DEFAULT_GRAVITY;
use crate::core::rigidbody::RigidBody;
use glam::Vec2;

/// Capability that contributes a force or torque to an object for one step.
///
/// Generators carry their own enabled flag. A disabled generator is skipped by
/// the [`ForceRegistry`](super::registry::ForceRegistry) without being called.
pub trait ForceGenerator: Send + Sync {
    fn apply(&mut self, body: &mut RigidBody, dt: f32);

    fn is_enabled(&self) -> bool;

    fn enable(&mut self, enabled: bool);
}

/// Constant gravity scaled per body.
#[derive(Debug, Clone)]
pub struct GravityForce {
    pub gravity: Vec2,
    enabled: bool,
}

impl Default for GravityForce {
    fn default() -> Self {
        Self::new(Vec2::from_array(DEFAULT_GRAVITY))
    }
}

impl GravityForce {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            enabled: true,
        }
    }
}

impl ForceGenerator for GravityForce {
    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        if body.is_static {
            return;
        }
        let force = self.gravity * body.mass() * body.gravity_scale;
        body.add_force(force);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Air resistance with linear and quadratic terms opposing motion.
#[derive(Debug, Clone)]
pub struct DragForce {
    pub linear: f32,
    pub quadratic: f32,
    enabled: bool,
}

impl DragForce {
    pub fn new(linear: f32, quadratic: f32) -> Self {
        Self {
            linear,
            quadratic,
            enabled: true,
        }
    }
}

impl ForceGenerator for DragForce {
    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        if body.is_static {
            return;
        }

        let speed = body.speed();
        if speed < 1e-6 {
            return;
        }

        let magnitude = self.linear * speed + self.quadratic * speed * speed;
        body.add_force(-body.velocity.linear / speed * magnitude);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Kinetic ground friction for top-down vehicles.
///
/// The force opposes the current velocity and is clamped so that it can at
/// most bring the object to rest within one step.
#[derive(Debug, Clone)]
pub struct FrictionForce {
    pub coefficient: f32,
    pub angular_coefficient: f32,
    /// Magnitude of the normal acceleration pressing the object onto the ground.
    pub gravity: f32,
    enabled: bool,
}

impl FrictionForce {
    pub fn new(coefficient: f32, angular_coefficient: f32) -> Self {
        Self {
            coefficient,
            angular_coefficient,
            gravity: Vec2::from_array(DEFAULT_GRAVITY).length(),
            enabled: true,
        }
    }
}

impl ForceGenerator for FrictionForce {
    fn apply(&mut self, body: &mut RigidBody, dt: f32) {
        if body.is_static || dt <= 0.0 {
            return;
        }

        let speed = body.speed();
        if speed > 1e-6 {
            let stopping = speed * body.mass() / dt;
            let magnitude = (self.coefficient * body.mass() * self.gravity).min(stopping);
            body.add_force(-body.velocity.linear / speed * magnitude);
        }

        let spin = body.velocity.angular;
        if spin.abs() > 1e-6 {
            let stopping = spin.abs() * body.mass_properties.inertia / dt;
            let magnitude =
                (self.angular_coefficient * body.mass_properties.inertia * self.gravity)
                    .min(stopping);
            body.add_torque(-spin.signum() * magnitude);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Hookean spring connecting a body to a fixed anchor point.
#[derive(Debug, Clone)]
pub struct SpringForce {
    pub anchor: Vec2,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
    enabled: bool,
}

impl SpringForce {
    pub fn new(anchor: Vec2, rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            anchor,
            rest_length,
            stiffness,
            damping,
            enabled: true,
        }
    }
}

impl ForceGenerator for SpringForce {
    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        let displacement = body.transform.position - self.anchor;
        let distance = displacement.length();
        if distance < 1e-6 {
            return;
        }

        let extension = distance - self.rest_length;
        let spring_force = -self.stiffness * extension * (displacement / distance);
        let damping_force = -self.damping * body.velocity.linear;

        body.add_force(spring_force + damping_force);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Engine force pushing along the object's heading.
#[derive(Debug, Clone)]
pub struct ThrustForce {
    pub magnitude: f32,
    enabled: bool,
}

impl ThrustForce {
    pub fn new(magnitude: f32) -> Self {
        Self {
            magnitude,
            enabled: true,
        }
    }
}

impl ForceGenerator for ThrustForce {
    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        let heading = body.transform.heading();
        body.add_force(heading * self.magnitude);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
