use minicore::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mut world = PhysicsWorld::new(DT);

    let mut cars = Vec::new();
    for lane in 0..3 {
        let mut car = RigidBody::new(format!("car-{lane}"))
            .with_position(Vec2::new(0.0, lane as f32 * 3.0))
            .with_mass_properties(MassProperties::rectangle(1000.0, 2.0, 4.5));
        car.max_speed = Some(60.0);
        let id = world.create_object(car);
        world
            .force_registry
            .add_owned_force_generator(FrictionForce::new(0.05, 0.5), id);
        world
            .force_registry
            .add_owned_force_generator(DragForce::new(2.0, 0.4), id);
        let engine = world
            .force_registry
            .add_owned_force_generator(ThrustForce::new(4000.0 + lane as f32 * 500.0), id);
        world
            .force_registry
            .set_generator_enabled(engine, false)
            .expect("engine registered");
        cars.push((id, engine));
    }

    // Cars join the grid one by one; the engines fire when the lights go out.
    for (id, _) in &cars {
        world.add_object(*id).expect("car exists");
        world.step(DT);
    }
    for (_, engine) in &cars {
        world
            .force_registry
            .set_generator_enabled(*engine, true)
            .expect("engine registered");
    }

    for _ in 0..(5 * 60) {
        world.step(DT);
    }

    for (id, _) in &cars {
        if let Some(car) = world.object(*id) {
            println!(
                "{}: x = {:.1} m, speed = {:.1} m/s",
                car.name,
                car.transform.position.x,
                car.speed()
            );
        }
    }
}
