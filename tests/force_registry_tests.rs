use minicore::*;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DT: f32 = 1.0 / 60.0;

struct TestForceGenerator {
    updated: bool,
    calls: usize,
    enabled: bool,
    drops: Arc<AtomicUsize>,
}

impl TestForceGenerator {
    fn new(drops: &Arc<AtomicUsize>) -> Self {
        Self {
            updated: false,
            calls: 0,
            enabled: true,
            drops: Arc::clone(drops),
        }
    }

    fn shared(drops: &Arc<AtomicUsize>) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::new(drops)))
    }
}

impl Drop for TestForceGenerator {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl ForceGenerator for TestForceGenerator {
    fn apply(&mut self, _body: &mut RigidBody, _dt: f32) {
        self.updated = true;
        self.calls += 1;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

fn update(world: &mut PhysicsWorld) -> usize {
    world.force_registry.update(&mut world.objects, DT)
}

#[test]
fn add_update_remove() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let force = TestForceGenerator::shared(&drops);
    let object = world.create_object(RigidBody::new("TestObject"));

    let id = world.force_registry.add_force_generator(&force, object);
    update(&mut world);
    assert!(!force.read().updated, "object is not in the world yet");

    world.add_object(object).expect("object exists");
    update(&mut world);
    assert!(force.read().updated);

    force.write().updated = false;
    assert!(world.force_registry.remove_force_generator(id));
    update(&mut world);
    assert!(!force.read().updated);
    assert_eq!(drops.load(Ordering::SeqCst), 0, "borrowed generator must survive removal");
}

#[test]
fn owned_generators_are_dropped_exactly_once() {
    for count in [0usize, 1, 100] {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut world = PhysicsWorld::new(DT);
            let mut ids = Vec::with_capacity(count);
            for _ in 0..count {
                let object = world.create_object(RigidBody::new("TestObject"));
                world.add_object(object).expect("object exists");
                ids.push(
                    world
                        .force_registry
                        .add_owned_force_generator(TestForceGenerator::new(&drops), object),
                );
            }

            assert_eq!(update(&mut world), count);
            for id in &ids {
                assert_eq!(world.force_registry.ownership(*id), Some(Ownership::Owned));
            }
            assert_eq!(drops.load(Ordering::SeqCst), 0);
        }
        assert_eq!(drops.load(Ordering::SeqCst), count, "count = {count}");
    }
}

#[test]
fn clear_drops_owned_generators_once() {
    for count in [0usize, 1, 100] {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut registry = ForceRegistry::new();
        for i in 0..count {
            registry.add_owned_force_generator(
                TestForceGenerator::new(&drops),
                EntityId::from_index(i as u32),
            );
        }

        registry.clear();
        assert_eq!(drops.load(Ordering::SeqCst), count);
        assert!(registry.is_empty());
        assert_eq!(registry.generator_count(), 0);

        drop(registry);
        assert_eq!(drops.load(Ordering::SeqCst), count, "no second drop");
    }
}

#[test]
fn update_with_enable() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let force = TestForceGenerator::shared(&drops);
    let object = world.create_object(RigidBody::new("TestObject"));
    world.force_registry.add_force_generator(&force, object);
    world.add_object(object).expect("object exists");

    update(&mut world);
    assert!(force.read().updated);

    force.write().updated = false;
    force.write().enable(false);
    update(&mut world);
    assert!(!force.read().updated);

    force.write().enable(true);
    update(&mut world);
    assert!(force.read().updated);
}

#[test]
fn clear_stops_all_updates() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let force = TestForceGenerator::shared(&drops);
    let object = world.create_object(RigidBody::new("TestObject"));
    world.force_registry.add_force_generator(&force, object);
    world.add_object(object).expect("object exists");

    world.force_registry.clear();
    assert_eq!(update(&mut world), 0);
    assert!(!force.read().updated);
    assert!(world.force_registry.is_empty());
    assert_eq!(world.force_registry.generator_count(), 0);
}

#[test]
fn inactive_objects_are_skipped_regardless_of_enabled_state() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let enabled = TestForceGenerator::shared(&drops);
    let disabled = TestForceGenerator::shared(&drops);
    disabled.write().enable(false);
    let object = world.create_object(RigidBody::new("TestObject"));
    world.force_registry.add_force_generator(&enabled, object);
    world.force_registry.add_force_generator(&disabled, object);

    assert_eq!(update(&mut world), 0);
    world.add_object(object).expect("object exists");
    world.remove_object(object).expect("object exists");
    assert_eq!(update(&mut world), 0);

    assert_eq!(enabled.read().calls, 0);
    assert_eq!(disabled.read().calls, 0);
}

#[test]
fn each_live_registration_fires_once_per_update() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let shared = TestForceGenerator::shared(&drops);
    let objects: Vec<EntityId> = (0..5)
        .map(|i| world.create_object(RigidBody::new(format!("car-{i}"))))
        .collect();
    for object in &objects {
        world.add_object(*object).expect("object exists");
        world.force_registry.add_force_generator(&shared, *object);
    }

    for _ in 0..3 {
        update(&mut world);
    }
    assert_eq!(shared.read().calls, 15);
}

#[test]
fn owned_generator_shared_across_objects_is_dropped_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut world = PhysicsWorld::new(DT);
    let a = world.create_object(RigidBody::new("a"));
    let b = world.create_object(RigidBody::new("b"));
    world.add_object(a).expect("object exists");
    world.add_object(b).expect("object exists");

    let id = world
        .force_registry
        .add_owned_force_generator(TestForceGenerator::new(&drops), a);
    world.force_registry.attach(id, b).expect("generator registered");
    assert_eq!(update(&mut world), 2);

    assert!(world.force_registry.remove_force_generator(id));
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert!(!world.force_registry.remove_force_generator(id), "second removal is a no-op");
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn removing_unknown_generator_is_a_no_op() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut registry = ForceRegistry::new();
    let id = registry.add_owned_force_generator(TestForceGenerator::new(&drops), EntityId::from_index(0));
    registry.remove_force_generator(id);

    assert!(!registry.remove_force_generator(id));
    assert_eq!(registry.detach(id, EntityId::from_index(0)), 0);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn destroyed_objects_no_longer_receive_forces() {
    let mut world = PhysicsWorld::new(DT);
    let drops = Arc::new(AtomicUsize::new(0));
    let force = TestForceGenerator::shared(&drops);
    let object = world.create_object(RigidBody::new("TestObject"));
    world.add_object(object).expect("object exists");
    world.force_registry.add_force_generator(&force, object);

    world.destroy_object(object).expect("object exists");
    let replacement = world.create_object(RigidBody::new("Replacement"));
    world.add_object(replacement).expect("object exists");
    assert_eq!(replacement.index(), object.index(), "slot is reused");

    assert_eq!(update(&mut world), 0);
    assert_eq!(force.read().calls, 0);
}

#[test]
fn world_step_applies_forces_before_integration() {
    let mut world = PhysicsWorld::new(DT);
    let mut body = RigidBody::new("car");
    body.linear_damping = 0.0;
    let object = world.create_object(body);
    world.add_object(object).expect("object exists");
    world
        .force_registry
        .add_owned_force_generator(ThrustForce::new(60.0), object);

    assert_eq!(world.step(DT), 1);

    let body = world.object(object).expect("object exists");
    approx::assert_relative_eq!(body.velocity.linear.x, 1.0, epsilon = 1e-5);
    assert_eq!(body.force, Vec2::ZERO, "accumulators are consumed");
}
