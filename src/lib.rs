//! Kinelab - physics core for a 2D kinematics teaching tool
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, constraints, collisions)
//! - `math`: Geometry helpers shared by shape queries and collisions
//! - `config`: Persisted physics/default-object configuration
//!
//! The surrounding application (window, panels, undo, rendering) is an
//! external collaborator that drives the core through [`sim::Simulator`].

pub mod config;
pub mod math;
pub mod sim;

pub use config::{Config, ObjectDefaults, PhysicsConfig};
pub use sim::{Body, BodyId, Constraint, ConstraintKind, ObjectFactory, Shape, Simulator};

/// Physics configuration constants
pub mod consts {
    /// Standard gravity (m/s², y points up)
    pub const GRAVITY_Y: f32 = -9.8;

    /// Default per-body coefficients
    pub const DEFAULT_FRICTION: f32 = 0.5;
    pub const DEFAULT_RESTITUTION: f32 = 0.7;

    /// Factory fallbacks when a config key is absent
    pub const BOX_WIDTH: f32 = 1.0;
    pub const BOX_HEIGHT: f32 = 1.0;
    pub const CIRCLE_RADIUS: f32 = 0.5;
    pub const SPRING_K: f32 = 10.0;
    pub const ROPE_SEGMENTS: u32 = 10;
    pub const RAMP_WIDTH: f32 = 2.0;
    pub const RAMP_HEIGHT: f32 = 1.0;

    /// Below this separation two centers are treated as coincident and the
    /// collision normal falls back to an axis tie-break.
    pub const COINCIDENT_EPS: f32 = 1e-4;

    /// Positional correction overshoot so separated pairs do not re-collide
    /// on the next step.
    pub const CORRECTION_FACTOR: f32 = 1.01;

    /// Guard against division by zero on degenerate axes
    pub const LENGTH_EPS: f32 = 1e-6;
}
