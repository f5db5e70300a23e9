//! Collision detection and response
//!
//! Broad phase rejects pairs by bounding box. The narrow phase is exact for
//! circle pairs and treats bounding-box overlap as contact for everything
//! else - an accepted approximation for boxes, triangles and ramps at
//! teaching-scene scales. Response is a single impulse along the contact
//! normal followed by positional de-penetration; neither is iterated to
//! convergence.

use glam::Vec2;

use super::body::{Body, Shape};
use crate::consts::{COINCIDENT_EPS, CORRECTION_FACTOR};

/// Broad phase: bounding boxes must overlap
#[inline]
pub fn broad_phase(a: &Body, b: &Body) -> bool {
    a.bounding_box().overlaps(&b.bounding_box())
}

/// Narrow phase, assuming the broad phase already passed.
///
/// Circle pairs get an exact distance test; any other combination keeps the
/// bounding-box verdict.
pub fn narrow_phase(a: &Body, b: &Body) -> bool {
    if let (Shape::Circle { radius: r1 }, Shape::Circle { radius: r2 }) = (&a.shape, &b.shape) {
        let sum = r1 + r2;
        (b.position - a.position).length_squared() <= sum * sum
    } else {
        true
    }
}

/// Full pair test: broad then narrow
pub fn check_collision(a: &Body, b: &Body) -> bool {
    broad_phase(a, b) && narrow_phase(a, b)
}

/// Unit contact normal pointing from `a` toward `b`.
///
/// Rectangular pairs (box/ramp) pick the axis of minimum directional
/// penetration between the bounding boxes. Everything else uses the
/// normalized center delta. Coincident centers fall back to a
/// vertical-then-horizontal tie-break, which keeps a ball resting exactly
/// atop a surface stable.
pub fn collision_normal(a: &Body, b: &Body) -> Vec2 {
    if a.shape.rect_extents().is_some() && b.shape.rect_extents().is_some() {
        let (right, left, top, bottom) = directional_overlaps(a, b);

        let min = right.min(left).min(top).min(bottom);
        return if min == right {
            Vec2::new(1.0, 0.0)
        } else if min == left {
            Vec2::new(-1.0, 0.0)
        } else if min == top {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::new(0.0, -1.0)
        };
    }

    let delta = b.position - a.position;
    let dist = delta.length();
    if dist < COINCIDENT_EPS {
        // Centers coincide; break the tie by relative y, then x
        if delta.y.abs() > 0.0 {
            Vec2::new(0.0, delta.y.signum())
        } else if delta.x.abs() > 0.0 {
            Vec2::new(delta.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, 1.0)
        }
    } else {
        delta / dist
    }
}

/// Directional penetration depths between the two bounding boxes, in the
/// order (right, left, top, bottom) as seen from `a`.
fn directional_overlaps(a: &Body, b: &Body) -> (f32, f32, f32, f32) {
    let ba = a.bounding_box();
    let bb = b.bounding_box();
    (
        ba.max.x - bb.min.x,
        bb.max.x - ba.min.x,
        ba.max.y - bb.min.y,
        bb.max.y - ba.min.y,
    )
}

/// Reduced mass `m1·m2/(m1+m2)` vanishes when an unfixed participant is
/// massless, and such pairs exchange no impulse and no push. A fixed body
/// instead counts as infinitely massive and stays an immovable collider.
#[inline]
fn zero_reduced_mass(a: &Body, b: &Body) -> bool {
    (!a.fixed && a.mass <= 0.0) || (!b.fixed && b.mass <= 0.0)
}

/// Impulse resolution along the contact normal.
///
/// A fixed body contributes zero inverse mass (infinite effective mass).
/// When the reduced mass is zero, both bodies are immovable, or the pair is
/// already separating, nothing happens.
pub fn resolve_velocities(a: &mut Body, b: &mut Body, normal: Vec2) {
    if zero_reduced_mass(a, b) {
        return;
    }

    let restitution = a.restitution.min(b.restitution);

    let vn = (b.velocity - a.velocity).dot(normal);
    if vn > 0.0 {
        return;
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let impulse = -(1.0 + restitution) * vn / inv_sum;
    a.velocity -= normal * impulse * inv_a;
    b.velocity += normal * impulse * inv_b;
}

/// Characteristic half-extent used by the mixed-shape penetration heuristic
fn characteristic_size(body: &Body) -> f32 {
    match body.shape {
        Shape::Circle { radius } => radius,
        Shape::Box { width, height } | Shape::Ramp { width, height, .. } => (width + height) / 4.0,
        Shape::Triangle { .. } => {
            let bb = body.bounding_box();
            (bb.width() + bb.height()) / 4.0
        }
        // Not collidable; never reaches the pipeline
        Shape::Spring { .. } | Shape::Rope { .. } => 0.0,
    }
}

/// Estimated penetration depth along the contact normal
fn penetration_depth(a: &Body, b: &Body, normal: Vec2) -> f32 {
    let dist = (b.position - a.position).length();

    let depth = match (&a.shape, &b.shape) {
        (Shape::Circle { radius: r1 }, Shape::Circle { radius: r2 }) => r1 + r2 - dist,
        _ if a.shape.rect_extents().is_some() && b.shape.rect_extents().is_some() => {
            let (right, left, top, bottom) = directional_overlaps(a, b);
            // Overlap along the dominant normal axis
            if normal.x.abs() > normal.y.abs() {
                right.min(left)
            } else {
                top.min(bottom)
            }
        }
        _ => characteristic_size(a) + characteristic_size(b) - dist,
    };

    depth.max(0.0)
}

/// Positional correction: push the pair apart along the normal by slightly
/// more than the penetration, split by inverse mass. A fixed body absorbs
/// none of the push; two immovable bodies stay put, and a zero-reduced-mass
/// pair is skipped entirely.
pub fn correct_positions(a: &mut Body, b: &mut Body, normal: Vec2) {
    if zero_reduced_mass(a, b) {
        return;
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let push = penetration_depth(a, b, normal) * CORRECTION_FACTOR;
    a.position -= normal * push * (inv_a / inv_sum);
    b.position += normal * push * (inv_b / inv_sum);
}

/// Resolve one colliding pair: impulse, then de-penetration
pub fn resolve_pair(a: &mut Body, b: &mut Body) {
    let normal = collision_normal(a, b);
    resolve_velocities(a, b, normal);
    correct_positions(a, b, normal);
}
