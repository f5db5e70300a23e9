//! Rigid body model
//!
//! A body is a kinematic state (position/velocity/acceleration, mass,
//! contact coefficients) plus a closed set of shape kinds. Shape queries
//! (containment, bounding box) are pure; only [`Body::advance`] mutates.
//!
//! Massless kinds (Spring, Rope, Ramp) carry no inertia: they are excluded
//! from gravity and never receive collision impulses, but a Ramp can still
//! act as a one-sided immovable collider when flagged `fixed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::point_in_triangle;

/// Handle to a body owned by a [`super::Simulator`].
///
/// Constraints hold these instead of references; lookups on a removed id are
/// silent no-ops, so removal can never dangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Axis-aligned bounding box in physical meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether two boxes overlap (touching edges count as overlap)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// The closed set of primitive shape kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box centered on the body position
    Box { width: f32, height: f32 },
    /// Circle centered on the body position
    Circle { radius: f32 },
    /// Triangle given by three vertex offsets from the body position
    Triangle { vertices: [Vec2; 3] },
    /// Massless spring between two anchors; body position is the midpoint
    Spring {
        start: Vec2,
        end: Vec2,
        k: f32,
        rest_length: f32,
    },
    /// Massless rope between two anchors; body position is the midpoint
    Rope {
        start: Vec2,
        end: Vec2,
        segments: u32,
        length: f32,
    },
    /// Static right-triangle ramp anchored at its lower-left corner
    Ramp {
        width: f32,
        height: f32,
        angle: f32,
    },
}

impl Shape {
    /// Default equilateral triangle with side length 1, centroid at origin
    pub fn equilateral_triangle() -> Self {
        let side = 1.0_f32;
        let height = side * 3.0_f32.sqrt() / 2.0;
        Shape::Triangle {
            vertices: [
                Vec2::new(-side / 2.0, -height / 3.0),
                Vec2::new(side / 2.0, -height / 3.0),
                Vec2::new(0.0, height * 2.0 / 3.0),
            ],
        }
    }

    /// Ramp with slope angle derived from its footprint
    pub fn ramp(width: f32, height: f32) -> Self {
        Shape::Ramp {
            width,
            height,
            angle: height.atan2(width),
        }
    }

    /// Ramp from a slope angle; the height follows as `width·tan(angle)`
    pub fn ramp_from_angle(width: f32, angle: f32) -> Self {
        Shape::Ramp {
            width,
            height: width * angle.tan(),
            angle,
        }
    }

    /// Spring with rest length equal to the initial anchor separation
    pub fn spring(start: Vec2, end: Vec2, k: f32) -> Self {
        Shape::Spring {
            start,
            end,
            k,
            rest_length: (end - start).length(),
        }
    }

    /// Rope spanning the given anchors
    pub fn rope(start: Vec2, end: Vec2, segments: u32) -> Self {
        Shape::Rope {
            start,
            end,
            segments,
            length: (end - start).length(),
        }
    }

    /// Whether this kind carries inertia. Massless kinds are constructed
    /// with `mass == 0` and must stay that way.
    pub fn is_massless_kind(&self) -> bool {
        matches!(
            self,
            Shape::Spring { .. } | Shape::Rope { .. } | Shape::Ramp { .. }
        )
    }

    /// Rectangular extents, for shapes that expose a width/height pair.
    /// Used by the min-axis collision normal.
    pub fn rect_extents(&self) -> Option<(f32, f32)> {
        match *self {
            Shape::Box { width, height } | Shape::Ramp { width, height, .. } => {
                Some((width, height))
            }
            _ => None,
        }
    }
}

/// A rigid body owned by the simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    /// Center of mass for Box/Circle/Triangle, anchor midpoint for
    /// Spring/Rope, lower-left corner for Ramp. Meters.
    pub position: Vec2,
    /// m/s
    pub velocity: Vec2,
    /// m/s². Gravity is accumulated here each step; the simulator zeroes it
    /// on start()/reset().
    pub acceleration: Vec2,
    /// kg; 0 marks a kinematically inert body
    pub mass: f32,
    /// Contact friction coefficient in [0, 1]
    pub friction: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
    /// Immovable: infinite effective mass, never integrated
    pub fixed: bool,
    /// Excluded from the collision pipeline entirely
    pub no_collision: bool,
    /// Display color, carried for the UI collaborator; physics ignores it
    pub color: [u8; 3],
    pub shape: Shape,
}

impl Body {
    pub fn new(position: Vec2, mass: f32, shape: Shape) -> Self {
        Self {
            id: BodyId(0),
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: if shape.is_massless_kind() { 0.0 } else { mass },
            friction: crate::consts::DEFAULT_FRICTION,
            restitution: crate::consts::DEFAULT_RESTITUTION,
            fixed: false,
            no_collision: false,
            color: [200, 200, 255],
            shape,
        }
    }

    /// Invariants checked when a body enters the simulator
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.mass >= 0.0
            && self.mass.is_finite()
            && (0.0..=1.0).contains(&self.friction)
            && (0.0..=1.0).contains(&self.restitution)
    }

    /// Semi-implicit Euler step. Fixed bodies are skipped entirely and keep
    /// zero velocity/acceleration.
    pub fn advance(&mut self, dt: f32) {
        if self.fixed {
            self.velocity = Vec2::ZERO;
            self.acceleration = Vec2::ZERO;
            return;
        }
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Zero inverse mass means immovable in collision and constraint math
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.fixed || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Whether the narrow phase may consider this body. Springs and ropes
    /// have no containment test and never collide.
    pub fn collidable(&self) -> bool {
        !matches!(self.shape, Shape::Spring { .. } | Shape::Rope { .. })
    }

    /// Point containment in physical coordinates. Pure.
    pub fn contains_point(&self, p: Vec2) -> bool {
        match self.shape {
            Shape::Box { width, height } => {
                let d = p - self.position;
                d.x.abs() <= width / 2.0 && d.y.abs() <= height / 2.0
            }
            Shape::Circle { radius } => (p - self.position).length_squared() <= radius * radius,
            Shape::Triangle { vertices } => {
                let [a, b, c] = vertices;
                point_in_triangle(p, self.position + a, self.position + b, self.position + c)
            }
            Shape::Ramp { width, height, .. } => {
                // Ramp-local coordinates, anchor at lower-left
                let rel = p - self.position;
                if rel.x < 0.0 || rel.x > width || rel.y < 0.0 || rel.y > height {
                    return false;
                }
                rel.y <= height * (1.0 - rel.x / width)
            }
            Shape::Spring { .. } | Shape::Rope { .. } => false,
        }
    }

    /// Axis-aligned bounding box derived from position + shape attributes
    pub fn bounding_box(&self) -> Aabb {
        match self.shape {
            Shape::Box { width, height } => {
                let half = Vec2::new(width / 2.0, height / 2.0);
                Aabb::new(self.position - half, self.position + half)
            }
            Shape::Circle { radius } => Aabb::new(
                self.position - Vec2::splat(radius),
                self.position + Vec2::splat(radius),
            ),
            Shape::Triangle { vertices } => {
                let mut min = self.position + vertices[0];
                let mut max = min;
                for v in &vertices[1..] {
                    let abs = self.position + *v;
                    min = min.min(abs);
                    max = max.max(abs);
                }
                Aabb::new(min, max)
            }
            Shape::Ramp { width, height, .. } => Aabb::new(
                self.position,
                self.position + Vec2::new(width, height),
            ),
            Shape::Spring { start, end, .. } | Shape::Rope { start, end, .. } => {
                Aabb::new(start.min(end), start.max(end))
            }
        }
    }

    /// Hooke force a spring body exerts at its end anchor. Zero for other
    /// kinds and for degenerate (zero-length) springs.
    pub fn axial_force(&self) -> Vec2 {
        if let Shape::Spring {
            start,
            end,
            k,
            rest_length,
        } = self.shape
        {
            let delta = end - start;
            let current = delta.length();
            if current < crate::consts::LENGTH_EPS {
                return Vec2::ZERO;
            }
            // F = k * (rest - current), along the axis toward rest
            (delta / current) * (k * (rest_length - current))
        } else {
            Vec2::ZERO
        }
    }

    /// Normal force a ramp exerts on a resting mass: m·g·cos(angle).
    /// Teaching query; zero for non-ramp shapes.
    pub fn normal_force(&self, mass: f32, gravity: f32) -> f32 {
        if let Shape::Ramp { angle, .. } = self.shape {
            mass * gravity * angle.cos()
        } else {
            0.0
        }
    }

    /// Kinetic friction force along a ramp surface: μ·N
    pub fn friction_force(&self, mass: f32, gravity: f32) -> f32 {
        self.friction * self.normal_force(mass, gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_at(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(Vec2::new(x, y), 1.0, Shape::Box { width: w, height: h })
    }

    #[test]
    fn test_box_bounding_box_round_trip() {
        let b = box_at(2.0, 3.0, 1.0, 1.0);
        let bb = b.bounding_box();
        assert_eq!(bb.min, Vec2::new(1.5, 2.5));
        assert_eq!(bb.max, Vec2::new(2.5, 3.5));
    }

    #[test]
    fn test_box_contains_point() {
        let b = box_at(0.0, 0.0, 2.0, 1.0);
        assert!(b.contains_point(Vec2::new(0.9, 0.4)));
        assert!(b.contains_point(Vec2::new(1.0, 0.5))); // edge counts
        assert!(!b.contains_point(Vec2::new(1.1, 0.0)));
    }

    #[test]
    fn test_circle_contains_point() {
        let c = Body::new(Vec2::new(1.0, 1.0), 1.0, Shape::Circle { radius: 0.5 });
        assert!(c.contains_point(Vec2::new(1.3, 1.3)));
        assert!(!c.contains_point(Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn test_triangle_contains_point() {
        let t = Body::new(Vec2::ZERO, 1.0, Shape::equilateral_triangle());
        assert!(t.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!t.contains_point(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_degenerate_triangle() {
        let t = Body::new(
            Vec2::ZERO,
            1.0,
            Shape::Triangle {
                vertices: [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
            },
        );
        assert!(!t.contains_point(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_ramp_contains_point() {
        let r = Body::new(Vec2::ZERO, 0.0, Shape::ramp(2.0, 1.0));
        // Under the hypotenuse
        assert!(r.contains_point(Vec2::new(0.5, 0.5)));
        // Inside the footprint but above the hypotenuse
        assert!(!r.contains_point(Vec2::new(1.5, 0.9)));
        // Outside the footprint
        assert!(!r.contains_point(Vec2::new(-0.1, 0.1)));
    }

    #[test]
    fn test_ramp_from_angle_derives_height() {
        let s = Shape::ramp_from_angle(2.0, std::f32::consts::FRAC_PI_4);
        match s {
            Shape::Ramp {
                width,
                height,
                angle,
            } => {
                assert_eq!(width, 2.0);
                assert!((height - 2.0).abs() < 1e-5);
                assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
            }
            _ => panic!("expected ramp"),
        }
    }

    #[test]
    fn test_ramp_bounding_box_spans_vertices() {
        let r = Body::new(Vec2::new(1.0, 2.0), 0.0, Shape::ramp(2.0, 1.0));
        let bb = r.bounding_box();
        assert_eq!(bb.min, Vec2::new(1.0, 2.0));
        assert_eq!(bb.max, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_advance_semi_implicit_euler() {
        let mut b = box_at(0.0, 0.0, 1.0, 1.0);
        b.acceleration = Vec2::new(0.0, -10.0);
        b.advance(0.1);
        // Velocity updates first, then position uses the new velocity
        assert!((b.velocity.y - -1.0).abs() < 1e-6);
        assert!((b.position.y - -0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_body_never_moves() {
        let mut b = box_at(0.0, 0.0, 1.0, 1.0);
        b.fixed = true;
        b.velocity = Vec2::new(5.0, 5.0);
        b.acceleration = Vec2::new(0.0, -9.8);
        b.advance(0.1);
        assert_eq!(b.position, Vec2::ZERO);
        assert_eq!(b.velocity, Vec2::ZERO);
        assert_eq!(b.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_massless_kinds_get_zero_mass() {
        let s = Body::new(
            Vec2::ZERO,
            5.0,
            Shape::spring(Vec2::ZERO, Vec2::new(1.0, 0.0), 10.0),
        );
        assert_eq!(s.mass, 0.0);
        assert_eq!(s.inverse_mass(), 0.0);
        assert!(!s.collidable());
    }

    #[test]
    fn test_spring_axial_force() {
        // Rest length 1, stretched to 2: pull anchors together with |F| = k
        let mut shape = Shape::spring(Vec2::ZERO, Vec2::new(1.0, 0.0), 10.0);
        if let Shape::Spring { ref mut end, .. } = shape {
            *end = Vec2::new(2.0, 0.0);
        }
        let s = Body::new(Vec2::ZERO, 0.0, shape);
        let f = s.axial_force();
        assert!((f.x - -10.0).abs() < 1e-4);
        assert!(f.y.abs() < 1e-6);
    }

    #[test]
    fn test_ramp_forces() {
        let r = Body::new(Vec2::ZERO, 0.0, Shape::ramp(1.0, 1.0));
        let n = r.normal_force(2.0, 9.8);
        assert!((n - 2.0 * 9.8 * (std::f32::consts::FRAC_PI_4).cos()).abs() < 1e-4);
        assert!((r.friction_force(2.0, 9.8) - 0.5 * n).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_bodies_rejected() {
        let mut b = box_at(0.0, 0.0, 1.0, 1.0);
        assert!(b.is_valid());
        b.mass = -1.0;
        assert!(!b.is_valid());
        b.mass = 1.0;
        b.restitution = 1.5;
        assert!(!b.is_valid());
        b.restitution = 0.5;
        b.position = Vec2::new(f32::NAN, 0.0);
        assert!(!b.is_valid());
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));
        let c = Aabb::new(Vec2::new(1.5, 1.5), Vec2::new(2.0, 2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching edges count
        let d = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.overlaps(&d));
    }
}
