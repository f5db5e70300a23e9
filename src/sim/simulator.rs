//! Simulation stepping and the collision pipeline
//!
//! The simulator owns the ordered body collection (insertion order is
//! z-order for hit-testing) and the constraint list. It is single-threaded
//! and cooperative: the external driver calls [`Simulator::update`] once per
//! frame, and every step runs to completion before the next.
//!
//! Gravity is accumulated into each body's acceleration every step; the
//! matching reset discipline is that `start()` and `reset()` zero all
//! accelerations. Clearing per-step instead would also work, but the
//! additive behavior is kept for compatibility with the tool's lesson
//! scripts.

use std::time::Instant;

use glam::Vec2;
use log::{debug, info};

use super::body::{Body, BodyId};
use super::collision::{check_collision, resolve_pair};
use super::constraint::Constraint;

pub struct Simulator {
    bodies: Vec<Body>,
    constraints: Vec<Constraint>,
    gravity: Vec2,
    time_scale: f32,
    running: bool,
    simulation_time: f32,
    collision_detection_enabled: bool,
    last_update: Option<Instant>,
    next_id: u32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            constraints: Vec::new(),
            gravity: Vec2::new(0.0, crate::consts::GRAVITY_Y),
            time_scale: 1.0,
            running: false,
            simulation_time: 0.0,
            collision_detection_enabled: true,
            last_update: None,
            next_id: 1,
        }
    }

    // --- body management ---

    /// Add a body, returning its handle, or None when the body violates the
    /// model invariants (negative/non-finite mass, coefficients outside
    /// [0, 1], non-finite position).
    pub fn add_body(&mut self, mut body: Body) -> Option<BodyId> {
        if !body.is_valid() {
            debug!("rejected invalid body: {body:?}");
            return None;
        }
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        Some(id)
    }

    /// Remove a body by handle. Constraints referencing it become no-ops.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        self.bodies.len() != before
    }

    /// Remove all bodies and constraints and zero the simulation clock
    pub fn clear_all(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.simulation_time = 0.0;
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    // --- constraint management ---

    /// Append a constraint; returns its index for later enable()/disable()
    pub fn add_constraint(&mut self, constraint: Constraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint_mut(&mut self, index: usize) -> Option<&mut Constraint> {
        self.constraints.get_mut(index)
    }

    // --- lifecycle ---

    /// Begin running. The next `update()` call establishes the clock
    /// baseline and performs no physics. Accelerations are zeroed so the
    /// additive gravity never inherits stale values.
    pub fn start(&mut self) {
        self.running = true;
        self.last_update = None;
        for body in &mut self.bodies {
            body.acceleration = Vec2::ZERO;
        }
        info!("simulation started");
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("simulation stopped at t={:.3}s", self.simulation_time);
    }

    /// Zero the simulation clock and force the stopped state
    pub fn reset(&mut self) {
        self.simulation_time = 0.0;
        self.running = false;
        self.last_update = None;
        for body in &mut self.bodies {
            body.acceleration = Vec2::ZERO;
        }
        info!("simulation reset");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    pub fn set_collision_detection_enabled(&mut self, enabled: bool) {
        self.collision_detection_enabled = enabled;
    }

    // --- stepping ---

    /// Wall-clock driver entry, called once per external frame tick.
    ///
    /// Returns the scaled dt that was simulated. While stopped this is a
    /// no-op returning 0. The first call after `start()` only establishes
    /// the clock baseline, preventing a large initial dt spike.
    pub fn update(&mut self) -> f32 {
        if !self.running {
            return 0.0;
        }

        let now = Instant::now();
        let Some(last) = self.last_update.replace(now) else {
            return 0.0;
        };

        self.step(now.duration_since(last).as_secs_f32())
    }

    /// Advance the simulation by `real_elapsed` seconds of wall time
    /// (scaled by the time-scale factor). Deterministic entry used by tests
    /// and scripted drivers.
    pub fn step(&mut self, real_elapsed: f32) -> f32 {
        if !self.running {
            return 0.0;
        }

        let dt = real_elapsed * self.time_scale;
        self.simulation_time += dt;

        // Integrate: gravity accumulates into acceleration, then a
        // semi-implicit Euler step. Massless and fixed bodies are skipped.
        for body in &mut self.bodies {
            if body.mass > 0.0 && !body.fixed {
                body.acceleration += self.gravity;
                body.advance(dt);
            }
        }

        for constraint in &self.constraints {
            constraint.apply(&mut self.bodies);
        }

        if self.collision_detection_enabled {
            self.handle_collisions();
        }

        dt
    }

    /// O(n²) pair loop; fine for teaching-scene sizes, no spatial index
    fn handle_collisions(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                if !a.collidable() || !b.collidable() || a.no_collision || b.no_collision {
                    continue;
                }
                if check_collision(a, b) {
                    resolve_pair(a, b);
                }
            }
        }
    }

    // --- queries ---

    /// Topmost body containing the point, searching newest-first
    pub fn object_at(&self, p: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .rev()
            .find(|b| b.contains_point(p))
            .map(|b| b.id)
    }
}
