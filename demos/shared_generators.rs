use minicore::*;
use parking_lot::RwLock;
use std::sync::Arc;

fn main() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);

    // One caller-owned wind generator acting on several objects.
    let wind: Arc<RwLock<ThrustForce>> = Arc::new(RwLock::new(ThrustForce::new(2.0)));
    let mut balloons = Vec::new();
    for i in 0..4 {
        let id = world.create_object(RigidBody::new(format!("balloon-{i}")));
        world.add_object(id).expect("balloon exists");
        world.force_registry.add_force_generator(&wind, id);
        balloons.push(id);
    }
    println!(
        "{} registrations, {} generator",
        world.force_registry.len(),
        world.force_registry.generator_count()
    );

    world.step(1.0);
    wind.write().enable(false);
    world.step(1.0);
    wind.write().magnitude = -2.0;
    wind.write().enable(true);
    world.step(1.0);

    // Dropping the caller's handle leaves the registrations dangling; prune them.
    drop(wind);
    println!("pruned {} generator(s)", world.force_registry.prune_dropped());

    for id in balloons {
        if let Some(balloon) = world.object(id) {
            println!("{} at {:?}", balloon.name, balloon.transform.position);
        }
    }
}
