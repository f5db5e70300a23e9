//! Geometry helpers
//!
//! Small pure functions shared by shape containment tests and the collision
//! pipeline. Everything degrades gracefully on degenerate input (zero-length
//! vectors, zero-area triangles, parallel segments) instead of failing.

use glam::Vec2;

use crate::consts::LENGTH_EPS;

/// Signed doubled area of triangle (a, b, c).
///
/// Positive for counter-clockwise winding; ~0 means the triangle is
/// degenerate and containment tests must bail out.
#[inline]
pub fn triangle_area2(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Barycentric point-in-triangle test.
///
/// Returns false for zero-area triangles.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let area2 = triangle_area2(a, b, c);
    if area2.abs() < LENGTH_EPS {
        return false;
    }

    let inv = 1.0 / area2;
    let s = inv * ((a.y * c.x - a.x * c.y) + (c.y - a.y) * p.x + (a.x - c.x) * p.y);
    let t = inv * ((a.x * b.y - a.y * b.x) + (a.y - b.y) * p.x + (b.x - a.x) * p.y);

    s >= 0.0 && t >= 0.0 && 1.0 - s - t >= 0.0
}

/// Project a point onto segment [a, b], clamped to the segment.
///
/// A degenerate segment projects everything onto `a`.
pub fn project_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < LENGTH_EPS {
        return a;
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    a + seg * t
}

/// Distance from a point to segment [a, b]
#[inline]
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p - project_point_to_segment(p, a, b)).length()
}

/// Intersection point of two segments, or None when they are parallel or the
/// crossing falls outside either segment.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let da = a2 - a1;
    let db = b2 - b1;

    let denom = db.y * da.x - db.x * da.y;
    if denom.abs() < LENGTH_EPS {
        return None;
    }

    let ua = (db.x * (a1.y - b1.y) - db.y * (a1.x - b1.x)) / denom;
    let ub = (da.x * (a1.y - b1.y) - da.y * (a1.x - b1.x)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1 + da * ua)
    } else {
        None
    }
}

/// Angle between two vectors in radians. Zero-length input yields 0.
pub fn angle_between(v1: Vec2, v2: Vec2) -> f32 {
    let len1 = v1.length();
    let len2 = v2.length();
    if len1 < LENGTH_EPS || len2 < LENGTH_EPS {
        return 0.0;
    }
    let cos = (v1.dot(v2) / (len1 * len2)).clamp(-1.0, 1.0);
    cos.acos()
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_point_in_triangle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);

        assert!(point_in_triangle(Vec2::new(0.25, 0.25), a, b, c));
        assert!(!point_in_triangle(Vec2::new(0.75, 0.75), a, b, c));
        // Vertices count as inside
        assert!(point_in_triangle(a, a, b, c));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 1.0);
        let c = Vec2::new(2.0, 2.0);
        assert!(!point_in_triangle(Vec2::new(1.0, 1.0), a, b, c));
    }

    #[test]
    fn test_project_point_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let p = project_point_to_segment(Vec2::new(5.0, 3.0), a, b);
        assert!((p - Vec2::new(5.0, 0.0)).length() < 1e-5);

        // Clamped past the end
        let p = project_point_to_segment(Vec2::new(20.0, 3.0), a, b);
        assert!((p - b).length() < 1e-5);

        // Degenerate segment
        let p = project_point_to_segment(Vec2::new(5.0, 5.0), a, a);
        assert!((p - a).length() < 1e-5);
    }

    #[test]
    fn test_segment_intersection() {
        let hit = segment_intersection(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        );
        assert!(hit.is_some());
        assert!(hit.unwrap().length() < 1e-5);

        // Parallel
        assert!(
            segment_intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            )
            .is_none()
        );

        // Crossing outside the segments
        assert!(
            segment_intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(5.0, -1.0),
                Vec2::new(5.0, 1.0),
            )
            .is_none()
        );
    }

    #[test]
    fn test_angle_between() {
        let right = Vec2::new(1.0, 0.0);
        let up = Vec2::new(0.0, 1.0);
        assert!((angle_between(right, up) - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(angle_between(right, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_rotate() {
        let v = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!((v - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }
}
