//! Registration bookkeeping between force generators and the objects they act on.
//!
//! The registry stores every unique generator instance once, in a generational
//! arena slot, and keeps a separate ordered list of (generator, object)
//! registrations. Owned generators live inside their slot and are dropped when
//! the slot is released; borrowed generators are held through a [`Weak`] so the
//! caller keeps sole ownership.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use log::{debug, trace};
use parking_lot::RwLock;

use crate::core::rigidbody::RigidBody;
use crate::error::{PhysicsError, Result};
use crate::utils::allocator::{Arena, ArenaKey, EntityId, GenerationalId};
use crate::utils::logging::ScopedTimer;

use super::forces::ForceGenerator;

/// Caller-owned generator that can be toggled or tuned while registered.
pub type SharedForceGenerator = Arc<RwLock<dyn ForceGenerator>>;

/// Handle to a generator stored in a [`ForceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(GenerationalId);

impl ArenaKey for GeneratorId {
    fn from_raw(raw: GenerationalId) -> Self {
        Self(raw)
    }

    fn raw(&self) -> GenerationalId {
        self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index, self.0.generation)
    }
}

/// Who is responsible for dropping a registered generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Moved into the registry; dropped when its last registration goes away.
    Owned,
    /// Held by the caller; the registry only keeps a weak reference.
    Borrowed,
}

/// One generator acting on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub generator: GeneratorId,
    pub object: EntityId,
    pub ownership: Ownership,
}

/// World-side view the registry needs during [`ForceRegistry::update`].
pub trait ForceTargets {
    /// Whether the object is currently part of the simulation. Must be cheap
    /// and free of side effects; it is queried once per registration per update.
    fn is_object_active(&self, id: EntityId) -> bool;

    fn object_mut(&mut self, id: EntityId) -> Option<&mut RigidBody>;
}

enum GeneratorSlot {
    Owned(Box<dyn ForceGenerator>),
    Borrowed {
        generator: Weak<RwLock<dyn ForceGenerator>>,
        /// Address of the shared allocation; the weak reference keeps it from being reused.
        address: usize,
    },
}

fn shared_address(generator: &SharedForceGenerator) -> usize {
    Arc::as_ptr(generator) as *const () as usize
}

impl GeneratorSlot {
    fn ownership(&self) -> Ownership {
        match self {
            Self::Owned(_) => Ownership::Owned,
            Self::Borrowed { .. } => Ownership::Borrowed,
        }
    }

    fn is_dangling(&self) -> bool {
        match self {
            Self::Owned(_) => false,
            Self::Borrowed { generator, .. } => generator.strong_count() == 0,
        }
    }

    /// Returns `true` when the generator ran.
    fn apply_if_enabled(&mut self, body: &mut RigidBody, dt: f32) -> bool {
        match self {
            Self::Owned(generator) => {
                if !generator.is_enabled() {
                    return false;
                }
                generator.apply(body, dt);
                true
            }
            Self::Borrowed { generator: weak, .. } => {
                let Some(shared) = weak.upgrade() else {
                    return false;
                };
                let mut generator = shared.write();
                if !generator.is_enabled() {
                    return false;
                }
                generator.apply(body, dt);
                true
            }
        }
    }

    fn is_enabled(&self) -> Option<bool> {
        match self {
            Self::Owned(generator) => Some(generator.is_enabled()),
            Self::Borrowed { generator, .. } => generator
                .upgrade()
                .map(|shared| shared.read().is_enabled()),
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> bool {
        match self {
            Self::Owned(generator) => {
                generator.enable(enabled);
                true
            }
            Self::Borrowed { generator, .. } => match generator.upgrade() {
                Some(shared) => {
                    shared.write().enable(enabled);
                    true
                }
                None => false,
            },
        }
    }
}

/// Maps force generators to the objects they act on and applies them once per step.
///
/// Registrations fire in insertion order, so a fixed sequence of calls yields a
/// reproducible simulation. Dropping the registry drops every owned generator
/// exactly once, the same as [`ForceRegistry::clear`].
pub struct ForceRegistry {
    generators: Arena<GeneratorId, GeneratorSlot>,
    borrowed: HashMap<usize, GeneratorId>,
    registrations: Vec<Registration>,
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ForceRegistry")
            .field("generators", &self.generators.len())
            .field("registrations", &self.registrations)
            .finish()
    }
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self {
            generators: Arena::new(),
            borrowed: HashMap::new(),
            registrations: Vec::new(),
        }
    }

    /// Registers a caller-owned generator for `object`.
    ///
    /// The caller keeps its handle and with it the generator's lifetime; the
    /// registry only holds a weak reference. Passing the same `Arc` again
    /// reuses its id, so removing that id later removes every registration
    /// made through it. Duplicate pairs are kept as independent registrations
    /// and each fires once per update.
    pub fn add_force_generator<G>(
        &mut self,
        generator: &Arc<RwLock<G>>,
        object: EntityId,
    ) -> GeneratorId
    where
        G: ForceGenerator + 'static,
    {
        let shared: SharedForceGenerator = generator.clone();
        self.add_shared_force_generator(&shared, object)
    }

    /// Same as [`ForceRegistry::add_force_generator`] for an already type-erased handle.
    pub fn add_shared_force_generator(
        &mut self,
        generator: &SharedForceGenerator,
        object: EntityId,
    ) -> GeneratorId {
        let address = shared_address(generator);
        let id = match self.borrowed.get(&address) {
            Some(id) => *id,
            None => {
                let id = self.generators.insert(GeneratorSlot::Borrowed {
                    generator: Arc::downgrade(generator),
                    address,
                });
                self.borrowed.insert(address, id);
                id
            }
        };
        self.push_registration(id, object, Ownership::Borrowed);
        id
    }

    /// Moves `generator` into the registry and registers it for `object`.
    ///
    /// Use [`ForceRegistry::attach`] with the returned id to let the same
    /// instance act on further objects.
    pub fn add_owned_force_generator<G>(&mut self, generator: G, object: EntityId) -> GeneratorId
    where
        G: ForceGenerator + 'static,
    {
        let id = self
            .generators
            .insert(GeneratorSlot::Owned(Box::new(generator)));
        self.push_registration(id, object, Ownership::Owned);
        id
    }

    /// Adds another registration for an already registered generator.
    pub fn attach(&mut self, generator: GeneratorId, object: EntityId) -> Result<()> {
        let ownership = self
            .generators
            .get(generator)
            .map(GeneratorSlot::ownership)
            .ok_or(PhysicsError::UnknownGenerator(generator))?;
        self.push_registration(generator, object, ownership);
        Ok(())
    }

    /// Removes every registration of `generator`, dropping it if owned.
    ///
    /// Returns `false` when the generator was not registered.
    pub fn remove_force_generator(&mut self, generator: GeneratorId) -> bool {
        let Some(slot) = self.release(generator) else {
            return false;
        };
        let before = self.registrations.len();
        self.registrations.retain(|r| r.generator != generator);
        debug!(
            "force generator {generator} removed ({:?}, {} registrations)",
            slot.ownership(),
            before - self.registrations.len()
        );
        true
    }

    /// Removes the registrations pairing `generator` with `object`.
    ///
    /// Once a generator has no registrations left its slot is released and an
    /// owned generator is dropped. Returns the number of registrations removed.
    pub fn detach(&mut self, generator: GeneratorId, object: EntityId) -> usize {
        let before = self.registrations.len();
        self.registrations
            .retain(|r| !(r.generator == generator && r.object == object));
        let removed = before - self.registrations.len();

        if removed > 0 && !self.registrations.iter().any(|r| r.generator == generator) {
            self.release(generator);
            debug!("force generator {generator} released after last detach");
        }
        removed
    }

    /// Applies every enabled generator to its object, skipping objects that are
    /// not live in `targets`. Returns how many generator invocations ran.
    pub fn update<T>(&mut self, targets: &mut T, dt: f32) -> usize
    where
        T: ForceTargets + ?Sized,
    {
        let _timer = ScopedTimer::new("force_registry::update");
        let mut applied = 0;

        for registration in &self.registrations {
            if !targets.is_object_active(registration.object) {
                continue;
            }
            let Some(slot) = self.generators.get_mut(registration.generator) else {
                continue;
            };
            let Some(body) = targets.object_mut(registration.object) else {
                continue;
            };
            if slot.apply_if_enabled(body, dt) {
                applied += 1;
            }
        }

        trace!(
            "force_registry::update applied {applied}/{} registrations",
            self.registrations.len()
        );
        applied
    }

    /// Removes all registrations and drops every owned generator.
    pub fn clear(&mut self) {
        if self.registrations.is_empty() && self.generators.is_empty() {
            return;
        }
        debug!(
            "force registry cleared ({} generators, {} registrations)",
            self.generators.len(),
            self.registrations.len()
        );
        self.registrations.clear();
        self.borrowed.clear();
        self.generators.clear();
    }

    /// Drops registrations whose borrowed generator no longer exists.
    /// Returns the number of generators pruned.
    pub fn prune_dropped(&mut self) -> usize {
        let dangling: Vec<GeneratorId> = self
            .generators
            .iter()
            .filter(|(_, slot)| slot.is_dangling())
            .map(|(id, _)| id)
            .collect();
        for id in &dangling {
            self.remove_force_generator(*id);
        }
        dangling.len()
    }

    pub fn set_generator_enabled(&mut self, generator: GeneratorId, enabled: bool) -> Result<()> {
        match self.generators.get_mut(generator) {
            Some(slot) => {
                if slot.set_enabled(enabled) {
                    Ok(())
                } else {
                    Err(PhysicsError::UnknownGenerator(generator))
                }
            }
            None => Err(PhysicsError::UnknownGenerator(generator)),
        }
    }

    /// `None` if unknown or if a borrowed generator has been dropped.
    pub fn is_generator_enabled(&self, generator: GeneratorId) -> Option<bool> {
        self.generators
            .get(generator)
            .and_then(GeneratorSlot::is_enabled)
    }

    /// Mutable access to a generator the registry owns.
    pub fn owned_generator_mut(
        &mut self,
        generator: GeneratorId,
    ) -> Option<&mut (dyn ForceGenerator + 'static)> {
        match self.generators.get_mut(generator)? {
            GeneratorSlot::Owned(boxed) => Some(boxed.as_mut()),
            GeneratorSlot::Borrowed { .. } => None,
        }
    }

    pub fn ownership(&self, generator: GeneratorId) -> Option<Ownership> {
        self.generators.get(generator).map(GeneratorSlot::ownership)
    }

    pub fn contains(&self, generator: GeneratorId) -> bool {
        self.generators.contains(generator)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn registrations_for(&self, object: EntityId) -> impl Iterator<Item = &Registration> + '_ {
        self.registrations
            .iter()
            .filter(move |r| r.object == object)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Number of distinct generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Frees a generator slot, dropping an owned generator.
    fn release(&mut self, generator: GeneratorId) -> Option<GeneratorSlot> {
        let slot = self.generators.remove(generator)?;
        if let GeneratorSlot::Borrowed { address, .. } = &slot {
            self.borrowed.remove(address);
        }
        Some(slot)
    }

    fn push_registration(&mut self, generator: GeneratorId, object: EntityId, ownership: Ownership) {
        debug!(
            "force generator {generator} registered for object {} ({ownership:?})",
            object.index()
        );
        self.registrations.push(Registration {
            generator,
            object,
            ownership,
        });
    }
}
