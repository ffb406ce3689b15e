//! The simulation world: object storage, membership and the fixed-step loop.

mod object_set;

pub use object_set::ObjectSet;

use glam::Vec2;
use log::{debug, warn};

use crate::{
    config::WorldConfig,
    core::rigidbody::RigidBody,
    dynamics::{
        forces::GravityForce,
        integrator::Integrator,
        registry::{ForceRegistry, GeneratorId},
    },
    error::Result,
    utils::{allocator::EntityId, logging::ScopedTimer},
};

/// Central simulation container orchestrating forces and integration.
///
/// Each fixed tick first lets the [`ForceRegistry`] accumulate forces on live
/// objects, then integrates them. Membership changes made between ticks are
/// visible to the next tick.
pub struct PhysicsWorld {
    pub objects: ObjectSet,
    pub force_registry: ForceRegistry,
    pub integrator: Integrator,
    pub time_accumulated: f32,
    time_step: f32,
    max_substeps: u32,
    frame_budget_ms: f32,
    ticks_run: u64,
}

impl PhysicsWorld {
    /// Creates a world with default settings and the given tick length.
    /// Non-positive values fall back to the default timestep.
    pub fn new(time_step: f32) -> Self {
        let defaults = WorldConfig::default();
        let time_step = if time_step > 0.0 && time_step.is_finite() {
            time_step
        } else {
            defaults.time_step
        };
        Self::build(WorldConfig {
            time_step,
            ..defaults
        })
    }

    pub fn from_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let mut integrator = Integrator::new();
        integrator.set_parallel(config.parallel);
        Self {
            objects: ObjectSet::new(),
            force_registry: ForceRegistry::new(),
            integrator,
            time_accumulated: 0.0,
            time_step: config.time_step,
            max_substeps: config.max_substeps,
            frame_budget_ms: config.frame_budget_ms,
            ticks_run: 0,
        }
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Number of fixed ticks simulated so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks_run
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.integrator.parallel()
    }

    /// Stores an object without adding it to the simulation.
    pub fn create_object(&mut self, body: RigidBody) -> EntityId {
        self.objects.insert(body)
    }

    /// Adds a stored object to the simulation.
    pub fn add_object(&mut self, id: EntityId) -> Result<()> {
        self.objects.activate(id)
    }

    /// Takes an object out of the simulation. Its force registrations stay in place.
    pub fn remove_object(&mut self, id: EntityId) -> Result<()> {
        self.objects.deactivate(id)
    }

    /// Deletes an object. Registrations that still name it are skipped from
    /// then on, since its id no longer resolves.
    pub fn destroy_object(&mut self, id: EntityId) -> Option<RigidBody> {
        let body = self.objects.remove(id)?;
        debug!("object '{}' destroyed", body.name);
        Some(body)
    }

    pub fn is_object_active(&self, id: EntityId) -> bool {
        self.objects.is_active(id)
    }

    pub fn object(&self, id: EntityId) -> Option<&RigidBody> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.objects.get_mut(id)
    }

    /// Registers an owned gravity generator for `id`.
    pub fn add_gravity(&mut self, id: EntityId, gravity: Vec2) -> GeneratorId {
        self.force_registry
            .add_owned_force_generator(GravityForce::new(gravity), id)
    }

    /// Advances the simulation using a fixed timestep accumulator.
    ///
    /// At most `max_substeps` ticks run per call; leftover time beyond that
    /// is discarded. Negative or non-finite `dt` advances nothing. Returns the
    /// number of ticks executed.
    pub fn step(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            if !dt.is_finite() {
                warn!("ignoring non-finite step of {dt} s");
            }
            return 0;
        }
        self.time_accumulated += dt;

        let mut ticks = 0;
        while self.time_accumulated >= self.time_step && ticks < self.max_substeps {
            self.time_accumulated -= self.time_step;
            self.tick();
            ticks += 1;
        }

        if self.time_accumulated >= self.time_step {
            debug!(
                "dropping {:.4} s of simulation time after {ticks} ticks",
                self.time_accumulated
            );
            self.time_accumulated %= self.time_step;
        }
        if !self.time_accumulated.is_finite() {
            self.time_accumulated = 0.0;
        }
        ticks
    }

    /// Runs exactly one fixed tick: force accumulation, then integration.
    pub fn tick(&mut self) {
        let _timer = ScopedTimer::with_budget("world::tick", self.frame_budget_ms);
        self.force_registry.update(&mut self.objects, self.time_step);
        {
            let _timer = ScopedTimer::new("integrator");
            self.integrator.step(&mut self.objects, self.time_step);
        }
        self.ticks_run += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::error::PhysicsError;

    #[test]
    fn step_runs_whole_ticks_only() {
        let mut world = PhysicsWorld::new(0.1);
        assert_eq!(world.step(0.25), 2);
        assert_eq!(world.tick_count(), 2);
        assert!(world.time_accumulated > 0.0 && world.time_accumulated < 0.1);
    }

    #[test]
    fn step_is_bounded_by_max_substeps() {
        let mut world = PhysicsWorld::from_config(WorldConfig {
            time_step: 0.1,
            max_substeps: 3,
            ..WorldConfig::default()
        })
        .expect("valid config");

        assert_eq!(world.step(10.0), 3);
        assert!(world.time_accumulated < 0.1);
    }

    #[test]
    fn non_finite_step_leaves_the_world_running() {
        let mut world = PhysicsWorld::new(0.1);

        assert_eq!(world.step(f32::INFINITY), 0);
        assert_eq!(world.step(f32::NAN), 0);
        assert_eq!(world.step(f32::NEG_INFINITY), 0);
        assert_eq!(world.step(-1.0), 0);
        assert!(world.time_accumulated.is_finite());

        assert_eq!(world.step(0.1), 1);
        assert_eq!(world.step(0.25), 2);
        assert_eq!(world.tick_count(), 3);
    }

    #[test]
    fn huge_step_keeps_the_accumulator_finite() {
        let mut world = PhysicsWorld::new(0.1);

        assert_eq!(world.step(f32::MAX), crate::config::DEFAULT_MAX_SUBSTEPS);
        assert!(world.time_accumulated.is_finite());
        assert_eq!(world.step(0.1), 1);
    }

    #[test]
    fn invalid_time_step_falls_back_to_default() {
        let world = PhysicsWorld::new(-1.0);
        assert_eq!(world.time_step(), crate::config::DEFAULT_TIME_STEP);
    }

    #[test]
    fn from_config_rejects_invalid_settings() {
        let result = PhysicsWorld::from_config(WorldConfig {
            max_substeps: 0,
            ..WorldConfig::default()
        });
        assert!(matches!(result, Err(PhysicsError::InvalidConfig(_))));
    }
}
