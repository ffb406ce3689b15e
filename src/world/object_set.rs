use log::debug;

use crate::core::rigidbody::RigidBody;
use crate::dynamics::registry::ForceTargets;
use crate::error::{PhysicsError, Result};
use crate::utils::allocator::{Arena, EntityId};

/// Storage for simulated objects plus their world membership.
///
/// Objects can exist here without being live; only live objects receive
/// forces and get integrated.
#[derive(Default)]
pub struct ObjectSet {
    bodies: Arena<EntityId, RigidBody>,
    active: usize,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body` outside the simulation and returns its id.
    pub fn insert(&mut self, mut body: RigidBody) -> EntityId {
        body.set_in_world(false);
        let id = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(id) {
            stored.id = id;
        }
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<RigidBody> {
        let mut body = self.bodies.remove(id)?;
        if body.is_in_world() {
            self.active -= 1;
            body.set_in_world(false);
        }
        Some(body)
    }

    /// Makes the object live. Activating a live object is a no-op.
    pub fn activate(&mut self, id: EntityId) -> Result<()> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(PhysicsError::UnknownObject(id))?;
        if !body.is_in_world() {
            body.set_in_world(true);
            self.active += 1;
            debug!("object '{}' joined the world", body.name);
        }
        Ok(())
    }

    pub fn deactivate(&mut self, id: EntityId) -> Result<()> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(PhysicsError::UnknownObject(id))?;
        if body.is_in_world() {
            body.set_in_world(false);
            self.active -= 1;
            debug!("object '{}' left the world", body.name);
        }
        Ok(())
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.bodies
            .get(id)
            .map(RigidBody::is_in_world)
            .unwrap_or(false)
    }

    pub fn get(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut RigidBody> + '_ {
        self.bodies.values_mut()
    }

    #[cfg(feature = "parallel")]
    pub fn par_bodies_mut(
        &mut self,
    ) -> impl rayon::iter::ParallelIterator<Item = &mut RigidBody> + '_ {
        self.bodies.par_values_mut()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of live objects.
    pub fn active_len(&self) -> usize {
        self.active
    }
}

impl ForceTargets for ObjectSet {
    fn is_object_active(&self, id: EntityId) -> bool {
        self.is_active(id)
    }

    fn object_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_tracked_per_object() {
        let mut objects = ObjectSet::new();
        let a = objects.insert(RigidBody::new("a"));
        let b = objects.insert(RigidBody::new("b"));

        objects.activate(a).expect("a exists");
        objects.activate(a).expect("a exists");
        assert!(objects.is_active(a));
        assert!(!objects.is_active(b));
        assert_eq!(objects.active_len(), 1);

        objects.deactivate(a).expect("a exists");
        assert_eq!(objects.active_len(), 0);
    }

    #[test]
    fn removed_objects_are_never_active() {
        let mut objects = ObjectSet::new();
        let id = objects.insert(RigidBody::new("car"));
        objects.activate(id).expect("car exists");

        let body = objects.remove(id).expect("car exists");
        assert!(!body.is_in_world());
        assert!(!objects.is_active(id));
        assert_eq!(objects.active_len(), 0);
        assert_eq!(objects.activate(id), Err(PhysicsError::UnknownObject(id)));
    }

    #[test]
    fn insert_assigns_id() {
        let mut objects = ObjectSet::new();
        let id = objects.insert(RigidBody::new("car"));
        assert_eq!(objects.get(id).map(|b| b.id), Some(id));
    }
}
