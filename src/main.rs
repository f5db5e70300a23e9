//! Headless demo driver
//!
//! Stands in for the GUI collaborator: loads config, builds a small lesson
//! scene, then drives the simulator at ~60 Hz and logs body state. Useful
//! for eyeballing the physics without any front end.

use std::path::Path;
use std::thread;
use std::time::Duration;

use glam::Vec2;
use log::info;

use kinelab::sim::{Constraint, ObjectFactory, Simulator};
use kinelab::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(Path::new("kinelab.json"));
    let factory = ObjectFactory::from_config(&config);

    let mut sim = Simulator::new();
    sim.set_gravity(Vec2::from(config.physics.gravity));
    sim.set_time_scale(config.physics.time_scale);
    sim.set_collision_detection_enabled(config.physics.collision_detection);

    // A ball dropped onto a ramp, a box resting on the floor, and a
    // spring-tethered pendulum bob.
    let ball = factory
        .add_circle(&mut sim, Vec2::new(0.5, 4.0))
        .expect("valid circle");
    factory.add_ramp(&mut sim, Vec2::new(0.0, 0.0));
    let crate_box = factory
        .add_box(&mut sim, Vec2::new(4.0, 0.5))
        .expect("valid box");

    let anchor = factory
        .add_circle(&mut sim, Vec2::new(-3.0, 4.0))
        .expect("valid circle");
    sim.body_mut(anchor).expect("anchor exists").fixed = true;
    let bob = factory
        .add_circle(&mut sim, Vec2::new(-3.0, 2.0))
        .expect("valid circle");

    sim.add_constraint(Constraint::floor(0.0, 0.5));
    let (a, b) = (
        sim.body(anchor).expect("anchor exists").clone(),
        sim.body(bob).expect("bob exists").clone(),
    );
    sim.add_constraint(Constraint::spring(&a, &b, 10.0, Some(1.5)));

    sim.start();
    info!("scene: {} bodies, {} constraints", sim.bodies().len(), sim.constraints().len());

    for frame in 0..600u32 {
        let dt = sim.update();
        if frame % 60 == 0 {
            let ball_pos = sim.body(ball).map(|b| b.position).unwrap_or_default();
            let box_pos = sim.body(crate_box).map(|b| b.position).unwrap_or_default();
            let bob_pos = sim.body(bob).map(|b| b.position).unwrap_or_default();
            info!(
                "t={:6.2}s dt={dt:.4} ball=({:5.2},{:5.2}) box=({:5.2},{:5.2}) bob=({:5.2},{:5.2})",
                sim.simulation_time(),
                ball_pos.x,
                ball_pos.y,
                box_pos.x,
                box_pos.y,
                bob_pos.x,
                bob_pos.y,
            );
        }
        thread::sleep(Duration::from_millis(16));
    }

    sim.stop();
    info!("done after {:.2}s simulated", sim.simulation_time());
}
