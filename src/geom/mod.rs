//! Planar geometry primitives for rotated-rectangle collision.
//!
//! Movement is confined to the ground plane, so everything here works on
//! (x, z) pairs. Overlap detection between rotated quadrilaterals uses the
//! Separating Axis Theorem. All functions are pure, division-free, and
//! total over degenerate (zero-area) inputs.

use serde::{Deserialize, Serialize};

/// A point or offset on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Squared planar distance to another point.
    pub fn distance_sq(&self, other: &Vec2) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }
}

/// Corner offsets of an axis-aligned box relative to its center,
/// before any rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBox {
    pub back_left: Vec2,
    pub back_right: Vec2,
    pub front_left: Vec2,
    pub front_right: Vec2,
}

impl LocalBox {
    /// A square box with the given half extent.
    pub const fn square(half: f32) -> Self {
        Self {
            back_left: Vec2::new(-half, half),
            back_right: Vec2::new(half, half),
            front_left: Vec2::new(-half, -half),
            front_right: Vec2::new(half, -half),
        }
    }

    /// Corner offsets in traversal order. Every quadrilateral in the crate
    /// walks its corners in this same order so edges are well-defined.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.back_left,
            self.back_right,
            self.front_right,
            self.front_left,
        ]
    }
}

/// World-space corners of a rotated box, in `LocalBox::corners` order.
pub type Quad = [Vec2; 4];

/// Rotate a point about an arbitrary center.
///
/// Positive angles rotate from +z toward +x; the same convention is used
/// everywhere a rotation is applied or produced.
pub fn rotate_point(point: Vec2, center: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dz = point.z - center.z;
    Vec2 {
        x: center.x + dx * cos - dz * sin,
        z: center.z + dx * sin + dz * cos,
    }
}

/// Build the world-space quadrilateral of a box positioned at `center`
/// and rotated by `rotation` about it.
pub fn oriented_quad(center: Vec2, rotation: f32, local: &LocalBox) -> Quad {
    local.corners().map(|offset| {
        let corner = Vec2::new(center.x + offset.x, center.z + offset.z);
        rotate_point(corner, center, rotation)
    })
}

/// Project all corners of a quad onto an axis, returning the covered interval.
fn project(quad: &Quad, axis: Vec2) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for corner in quad {
        let dot = corner.x * axis.x + corner.z * axis.z;
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

/// Separating Axis Theorem overlap test for two convex quadrilaterals.
///
/// Tests the edge normals of both quads; disjoint projections on any axis
/// mean the quads do not overlap. Axes are left unnormalized, which keeps
/// the test division-free. A zero-area quad projects to a single point on
/// every axis and still yields a definite answer.
pub fn quads_intersect(a: &Quad, b: &Quad) -> bool {
    for quad in [a, b] {
        for i in 0..4 {
            let j = (i + 1) % 4;
            let ex = quad[j].x - quad[i].x;
            let ez = quad[j].z - quad[i].z;
            let axis = Vec2::new(-ez, ex);
            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }
    true
}

/// Test whether two line segments intersect, excluding shared endpoints.
///
/// Used to reject self-intersecting obstacle quads at world load time.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let denominator = (b2.z - b1.z) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.z - a1.z);
    if denominator == 0.0 {
        return false;
    }

    let ua = ((b2.x - b1.x) * (a1.z - b1.z) - (b2.z - b1.z) * (a1.x - b1.x)) / denominator;
    if ua <= 0.0 || ua >= 1.0 {
        return false;
    }

    let ub = ((a2.x - a1.x) * (a1.z - b1.z) - (a2.z - a1.z) * (a1.x - b1.x)) / denominator;
    0.0 < ub && ub < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, PI};

    fn square_at(x: f32, z: f32, half: f32, rotation: f32) -> Quad {
        oriented_quad(Vec2::new(x, z), rotation, &LocalBox::square(half))
    }

    #[test]
    fn rotation_round_trip() {
        let center = Vec2::new(1.5, -2.0);
        let point = Vec2::new(4.0, 3.0);
        let rotated = rotate_point(point, center, FRAC_PI_3);
        let back = rotate_point(rotated, center, -FRAC_PI_3);
        assert!((back.x - point.x).abs() < 1e-5);
        assert!((back.z - point.z).abs() < 1e-5);
    }

    #[test]
    fn rotation_about_self_is_identity() {
        let p = Vec2::new(2.0, 7.0);
        let r = rotate_point(p, p, PI);
        assert!((r.x - p.x).abs() < 1e-6);
        assert!((r.z - p.z).abs() < 1e-6);
    }

    #[test]
    fn separated_quads_do_not_intersect() {
        let a = square_at(0.0, 0.0, 1.0, 0.0);
        let b = square_at(5.0, 0.0, 1.0, 0.0);
        assert!(!quads_intersect(&a, &b));
    }

    #[test]
    fn overlapping_quads_intersect() {
        let a = square_at(0.0, 0.0, 1.0, 0.0);
        let b = square_at(1.5, 0.0, 1.0, 0.0);
        assert!(quads_intersect(&a, &b));
    }

    #[test]
    fn rotated_quads_at_same_center_intersect() {
        let a = square_at(0.0, 0.0, 1.0, 0.0);
        let b = square_at(0.0, 0.0, 1.0, FRAC_PI_4);
        assert!(quads_intersect(&a, &b));
    }

    #[test]
    fn sat_is_symmetric() {
        let cases = [
            (square_at(0.0, 0.0, 1.0, 0.3), square_at(1.2, 0.8, 1.0, 1.1)),
            (square_at(0.0, 0.0, 1.0, 0.0), square_at(9.0, 9.0, 2.0, 0.7)),
            (square_at(-3.0, 2.0, 0.5, PI), square_at(-3.1, 2.2, 0.5, 0.0)),
        ];
        for (a, b) in cases {
            assert_eq!(quads_intersect(&a, &b), quads_intersect(&b, &a));
        }
    }

    #[test]
    fn zero_area_quad_returns_definite_answer() {
        let degenerate = square_at(0.0, 0.0, 0.0, 0.0);
        let normal = square_at(0.0, 0.0, 1.0, 0.0);
        // No panic, no NaN surprises: a point quad never overlaps.
        assert!(!quads_intersect(&degenerate, &normal));
        assert!(!quads_intersect(&degenerate, &degenerate));
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        ));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ));
    }

    #[test]
    fn oriented_quad_rotates_about_center() {
        let quad = square_at(2.0, 2.0, 1.0, PI);
        // A half-turn maps back-left onto front-right.
        assert!((quad[0].x - 3.0).abs() < 1e-5);
        assert!((quad[0].z - 1.0).abs() < 1e-5);
    }
}
