//! Deterministic physics core
//!
//! All simulation logic lives here. This module must stay pure and
//! single-threaded:
//! - Stepping is driven externally, one `update()` per frame
//! - Stable body order (insertion order = z-order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod constraint;
pub mod factory;
pub mod simulator;

pub use body::{Aabb, Body, BodyId, Shape};
pub use collision::{
    broad_phase, check_collision, collision_normal, correct_positions, narrow_phase, resolve_pair,
    resolve_velocities,
};
pub use constraint::{Constraint, ConstraintKind};
pub use factory::{ObjectFactory, ShapeKind};
pub use simulator::Simulator;
