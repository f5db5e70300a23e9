//! Constraints applied once per simulation step
//!
//! Each constraint holds [`BodyId`] handles rather than references, so a
//! removed body simply makes the constraint a no-op. Application mutates
//! position/velocity only, in insertion order, single pass per tick - no
//! fixed-point iteration. Residual drift under stacked constraints is a
//! known approximation of this tool.
//!
//! Fixed bodies are never moved: they carry zero inverse mass and absorb
//! none of a correction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use crate::consts::LENGTH_EPS;

/// Constraint parameters by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Snap a body to a stored target and zero its velocity
    FixedPosition { body: BodyId, target: Vec2 },
    /// Keep two bodies at a fixed separation
    Distance {
        a: BodyId,
        b: BodyId,
        distance: f32,
    },
    /// Keep each body at its captured radial distance from a shared pivot
    PinJoint {
        a: BodyId,
        b: BodyId,
        pivot: Vec2,
        radius_a: f32,
        radius_b: f32,
    },
    /// Hookean spring force between two bodies, applied as velocity deltas
    Spring {
        a: BodyId,
        b: BodyId,
        k: f32,
        rest_length: f32,
    },
    /// Keep every body's bounding box above a horizontal floor
    Floor { floor_y: f32, restitution: f32 },
}

/// A constraint plus its enabled toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub enabled: bool,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            enabled: true,
            kind,
        }
    }

    /// Pin a body at `target`, or at its current position when None
    pub fn fixed_position(body: &Body, target: Option<Vec2>) -> Self {
        Self::new(ConstraintKind::FixedPosition {
            body: body.id,
            target: target.unwrap_or(body.position),
        })
    }

    /// Fix the separation of two bodies; None captures the current distance
    pub fn distance(a: &Body, b: &Body, distance: Option<f32>) -> Self {
        Self::new(ConstraintKind::Distance {
            a: a.id,
            b: b.id,
            distance: distance.unwrap_or_else(|| (b.position - a.position).length()),
        })
    }

    /// Joint both bodies to a pivot; None uses the midpoint between them.
    /// Radial distances are captured now and held for the joint's lifetime.
    pub fn pin_joint(a: &Body, b: &Body, pivot: Option<Vec2>) -> Self {
        let pivot = pivot.unwrap_or((a.position + b.position) / 2.0);
        Self::new(ConstraintKind::PinJoint {
            a: a.id,
            b: b.id,
            pivot,
            radius_a: (a.position - pivot).length(),
            radius_b: (b.position - pivot).length(),
        })
    }

    /// Spring between two bodies; None captures the current distance as rest
    pub fn spring(a: &Body, b: &Body, k: f32, rest_length: Option<f32>) -> Self {
        Self::new(ConstraintKind::Spring {
            a: a.id,
            b: b.id,
            k,
            rest_length: rest_length.unwrap_or_else(|| (b.position - a.position).length()),
        })
    }

    pub fn floor(floor_y: f32, restitution: f32) -> Self {
        Self::new(ConstraintKind::Floor {
            floor_y,
            restitution,
        })
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Apply the constraint to the body set. Disabled constraints and
    /// degenerate geometry (zero distances, missing bodies) are no-ops.
    pub fn apply(&self, bodies: &mut [Body]) {
        if !self.enabled {
            return;
        }

        match self.kind {
            ConstraintKind::FixedPosition { body, target } => {
                if let Some(b) = find_mut(bodies, body) {
                    b.position = target;
                    b.velocity = Vec2::ZERO;
                }
            }
            ConstraintKind::Distance { a, b, distance } => {
                apply_distance(bodies, a, b, distance);
            }
            ConstraintKind::PinJoint {
                a,
                b,
                pivot,
                radius_a,
                radius_b,
            } => {
                apply_pin_joint(bodies, a, b, pivot, radius_a, radius_b);
            }
            ConstraintKind::Spring {
                a,
                b,
                k,
                rest_length,
            } => {
                apply_spring(bodies, a, b, k, rest_length);
            }
            ConstraintKind::Floor {
                floor_y,
                restitution,
            } => {
                apply_floor(bodies, floor_y, restitution);
            }
        }
    }
}

fn find_index(bodies: &[Body], id: BodyId) -> Option<usize> {
    bodies.iter().position(|b| b.id == id)
}

fn find_mut(bodies: &mut [Body], id: BodyId) -> Option<&mut Body> {
    bodies.iter_mut().find(|b| b.id == id)
}

/// Borrow two distinct bodies mutably by id
fn pair_mut(bodies: &mut [Body], a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
    let ia = find_index(bodies, a)?;
    let ib = find_index(bodies, b)?;
    if ia == ib {
        return None;
    }
    let (lo, hi) = (ia.min(ib), ia.max(ib));
    let (head, tail) = bodies.split_at_mut(hi);
    let (first, second) = (&mut head[lo], &mut tail[0]);
    if ia < ib {
        Some((first, second))
    } else {
        Some((second, first))
    }
}

fn apply_distance(bodies: &mut [Body], a: BodyId, b: BodyId, target: f32) {
    let Some((a, b)) = pair_mut(bodies, a, b) else {
        return;
    };

    let delta = b.position - a.position;
    let current = delta.length();
    if current < LENGTH_EPS {
        return;
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    // Half-step correction toward the target, split so the heavier body
    // moves less (inverse-mass weighting).
    let correction = delta * ((target - current) / current) * 0.5;
    a.position -= correction * (inv_a / inv_sum);
    b.position += correction * (inv_b / inv_sum);
}

fn apply_pin_joint(
    bodies: &mut [Body],
    a: BodyId,
    b: BodyId,
    pivot: Vec2,
    radius_a: f32,
    radius_b: f32,
) {
    let Some((a, b)) = pair_mut(bodies, a, b) else {
        return;
    };

    let rel_a = a.position - pivot;
    let rel_b = b.position - pivot;
    let dist_a = rel_a.length();
    let dist_b = rel_b.length();
    if dist_a < LENGTH_EPS || dist_b < LENGTH_EPS {
        return;
    }

    if !a.fixed {
        a.position = pivot + rel_a / dist_a * radius_a;
    }
    if !b.fixed {
        b.position = pivot + rel_b / dist_b * radius_b;
    }
}

fn apply_spring(bodies: &mut [Body], a: BodyId, b: BodyId, k: f32, rest_length: f32) {
    let Some((a, b)) = pair_mut(bodies, a, b) else {
        return;
    };

    let delta = b.position - a.position;
    let current = delta.length();
    if current < LENGTH_EPS {
        return;
    }

    // F = k * (current - rest) along the axis; positive pulls the bodies
    // together. Applied directly as a velocity delta per tick.
    let force = delta / current * (k * (current - rest_length));

    if !a.fixed && a.mass > 0.0 {
        a.velocity += force / a.mass;
    }
    if !b.fixed && b.mass > 0.0 {
        b.velocity -= force / b.mass;
    }
}

fn apply_floor(bodies: &mut [Body], floor_y: f32, restitution: f32) {
    for body in bodies.iter_mut() {
        if body.fixed {
            continue;
        }

        let bottom = body.bounding_box().min.y;
        if bottom >= floor_y {
            continue;
        }

        let penetration = floor_y - bottom;
        body.position.y += penetration;
        body.velocity.y = -body.velocity.y * restitution;
        body.velocity.x *= 1.0 - body.friction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Shape;

    fn circle(id: u32, x: f32, y: f32, mass: f32) -> Body {
        let mut b = Body::new(Vec2::new(x, y), mass, Shape::Circle { radius: 0.5 });
        b.id = BodyId(id);
        b
    }

    #[test]
    fn test_fixed_position_snaps_and_zeroes_velocity() {
        let mut bodies = vec![circle(1, 5.0, 5.0, 1.0)];
        bodies[0].velocity = Vec2::new(3.0, -2.0);

        let c = Constraint::fixed_position(&bodies[0].clone(), Some(Vec2::new(1.0, 2.0)));
        c.apply(&mut bodies);

        assert_eq!(bodies[0].position, Vec2::new(1.0, 2.0));
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_distance_converges_symmetrically() {
        let d = 1.0_f32;
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0), circle(2, 2.0 * d, 0.0, 1.0)];
        let c = Constraint::distance(&bodies[0].clone(), &bodies[1].clone(), Some(d));

        c.apply(&mut bodies);

        let new_dist = (bodies[1].position - bodies[0].position).length();
        // Strictly closer to the target, but a single pass does not land on it
        assert!(new_dist < 2.0 * d);
        assert!(new_dist > d);
        // Equal masses split the half-step correction evenly: 0.25 each
        assert!((bodies[0].position.x - 0.25).abs() < 1e-5);
        assert!((bodies[1].position.x - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_distance_heavier_body_moves_less() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 3.0), circle(2, 2.0, 0.0, 1.0)];
        let c = Constraint::distance(&bodies[0].clone(), &bodies[1].clone(), Some(1.0));

        c.apply(&mut bodies);

        let moved_a = bodies[0].position.x.abs();
        let moved_b = (2.0 - bodies[1].position.x).abs();
        assert!(moved_a < moved_b);
    }

    #[test]
    fn test_distance_zero_separation_no_op() {
        let mut bodies = vec![circle(1, 1.0, 1.0, 1.0), circle(2, 1.0, 1.0, 1.0)];
        let c = Constraint::new(ConstraintKind::Distance {
            a: BodyId(1),
            b: BodyId(2),
            distance: 1.0,
        });
        c.apply(&mut bodies);
        assert_eq!(bodies[0].position, Vec2::new(1.0, 1.0));
        assert_eq!(bodies[1].position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_distance_fixed_partner_takes_no_correction() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0), circle(2, 2.0, 0.0, 1.0)];
        bodies[0].fixed = true;
        let c = Constraint::distance(&bodies[0].clone(), &bodies[1].clone(), Some(1.0));

        c.apply(&mut bodies);

        assert_eq!(bodies[0].position, Vec2::ZERO);
        assert!(bodies[1].position.x < 2.0);
    }

    #[test]
    fn test_pin_joint_renormalizes_offsets() {
        let mut bodies = vec![circle(1, -1.0, 0.0, 1.0), circle(2, 1.0, 0.0, 1.0)];
        let c = Constraint::pin_joint(&bodies[0].clone(), &bodies[1].clone(), None);

        // Drift body 1 outward; the joint should pull it back to radius 1
        bodies[0].position = Vec2::new(-2.0, 0.0);
        c.apply(&mut bodies);

        assert!((bodies[0].position - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((bodies[1].position - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_pin_joint_zero_pivot_distance_no_op() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0), circle(2, 2.0, 0.0, 1.0)];
        let c = Constraint::new(ConstraintKind::PinJoint {
            a: BodyId(1),
            b: BodyId(2),
            pivot: Vec2::ZERO, // body 1 sits exactly on the pivot
            radius_a: 1.0,
            radius_b: 1.0,
        });
        c.apply(&mut bodies);
        assert_eq!(bodies[0].position, Vec2::ZERO);
        assert_eq!(bodies[1].position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_spring_pulls_stretched_bodies_together() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0), circle(2, 2.0, 0.0, 1.0)];
        let c = Constraint::spring(&bodies[0].clone(), &bodies[1].clone(), 10.0, Some(1.0));

        c.apply(&mut bodies);

        // Stretched by 1 at k=10: each unit-mass endpoint gains |dv| = 10
        assert!((bodies[0].velocity.x - 10.0).abs() < 1e-4);
        assert!((bodies[1].velocity.x - -10.0).abs() < 1e-4);
    }

    #[test]
    fn test_spring_skips_fixed_endpoint() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0), circle(2, 2.0, 0.0, 1.0)];
        bodies[1].fixed = true;
        let c = Constraint::spring(&bodies[0].clone(), &bodies[1].clone(), 10.0, Some(1.0));

        c.apply(&mut bodies);

        assert!(bodies[0].velocity.x > 0.0);
        assert_eq!(bodies[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_floor_reflects_and_damps() {
        let mut bodies = vec![circle(1, 0.0, 0.0, 1.0)]; // r=0.5, bottom at -0.5
        bodies[0].velocity = Vec2::new(2.0, -4.0);
        bodies[0].friction = 0.5;

        let c = Constraint::floor(0.0, 0.5);
        c.apply(&mut bodies);

        // Bottom pushed up to exactly the floor line
        assert!((bodies[0].bounding_box().min.y - 0.0).abs() < 1e-6);
        // Vertical velocity flipped and scaled by the floor's restitution
        assert!((bodies[0].velocity.y - 2.0).abs() < 1e-5);
        // Horizontal damped by (1 - friction)
        assert!((bodies[0].velocity.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_floor_ignores_bodies_above() {
        let mut bodies = vec![circle(1, 0.0, 3.0, 1.0)];
        bodies[0].velocity = Vec2::new(0.0, -1.0);
        let c = Constraint::floor(0.0, 0.5);
        c.apply(&mut bodies);
        assert_eq!(bodies[0].position, Vec2::new(0.0, 3.0));
        assert_eq!(bodies[0].velocity, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_disabled_constraint_is_no_op() {
        let mut bodies = vec![circle(1, 0.0, -5.0, 1.0)];
        let mut c = Constraint::floor(0.0, 0.5);
        c.disable();
        c.apply(&mut bodies);
        assert_eq!(bodies[0].position, Vec2::new(0.0, -5.0));

        c.enable();
        c.apply(&mut bodies);
        assert!(bodies[0].position.y > -5.0);
    }

    #[test]
    fn test_removed_body_makes_constraint_no_op() {
        let a = circle(1, 0.0, 0.0, 1.0);
        let b = circle(2, 2.0, 0.0, 1.0);
        let c = Constraint::distance(&a, &b, Some(1.0));

        // Body 2 was removed; the surviving body must not move
        let mut bodies = vec![a];
        c.apply(&mut bodies);
        assert_eq!(bodies[0].position, Vec2::ZERO);
    }
}
