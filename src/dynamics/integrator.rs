#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::rigidbody::RigidBody;
use crate::world::ObjectSet;

/// Semi-implicit Euler integrator turning accumulated forces into motion.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    parallel: bool,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Advances one live object by `dt` and clears its force accumulators.
    pub fn integrate_body(body: &mut RigidBody, dt: f32) {
        if !body.is_in_world() {
            return;
        }
        if body.is_static {
            body.clear_accumulators();
            return;
        }

        body.velocity.linear += body.force * body.inverse_mass() * dt;
        body.velocity.angular += body.torque * body.inverse_inertia() * dt;

        body.velocity.linear *= (1.0 - body.linear_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - body.angular_damping * dt).max(0.0);

        if let Some(max_speed) = body.max_speed {
            let speed = body.speed();
            if speed > max_speed && speed > 0.0 {
                body.velocity.linear *= max_speed / speed;
            }
        }

        body.transform.position += body.velocity.linear * dt;
        body.transform.rotation += body.velocity.angular * dt;

        body.clear_accumulators();
    }

    pub fn step(&self, objects: &mut ObjectSet, dt: f32) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                objects
                    .par_bodies_mut()
                    .for_each(|body| Self::integrate_body(body, dt));
                return;
            }
        }

        for body in objects.bodies_mut() {
            Self::integrate_body(body, dt);
        }
    }
}
