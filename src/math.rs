//! Small 2D math helpers shared by shapes, triangulation and collision.
//!
//! Vectors and affine transforms come from `bevy::math` (glam); this module
//! only adds the few conventions the geometry code relies on.

use bevy::math::{Affine2, Vec2};
use std::f32::consts::{PI, TAU};

/// Wrap an angle (radians) into the principal range (-π, π].
///
/// `%` is exact for floats, so the only rounding is the final ±2π shift.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle % TAU;
    if wrapped <= -PI {
        wrapped + TAU
    } else if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Compose the local → world transform: scale, then rotate about Z, then translate.
pub fn world_transform(position: Vec2, rotation: f32, scale: f32) -> Affine2 {
    Affine2::from_translation(position)
        * Affine2::from_angle(rotation)
        * Affine2::from_scale(Vec2::splat(scale))
}

/// Cross product to determine turn direction at `o` going from `a` to `b`.
///
/// Positive for a counter-clockwise turn in a y-up frame.
pub fn cross_product(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

/// Edge normal: the edge vector rotated by 90°. Not normalised.
pub fn edge_normal(edge: Vec2) -> Vec2 {
    Vec2::new(edge.y, -edge.x)
}

/// Relative float comparison; falls back to an absolute `epsilon²` check when
/// either side is zero.
pub fn almost_equal(a: f32, b: f32, epsilon: f32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if a * b == 0.0 {
        diff < epsilon * epsilon
    } else {
        diff / (a.abs() + b.abs()) < epsilon
    }
}

/// Signed area of a polygon ring (shoelace). Positive for counter-clockwise
/// winding in a y-up frame.
pub fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.perp_dot(q);
    }
    twice / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // ── wrap_angle ────────────────────────────────────────────────────────────

    #[test]
    fn wrap_angle_keeps_principal_values() {
        for a in [0.0, 1.0, -1.0, 3.0, -3.0] {
            assert!((wrap_angle(a) - a).abs() < 1e-6, "angle {a} should be unchanged");
        }
    }

    #[test]
    fn wrap_angle_maps_minus_pi_to_plus_pi() {
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_is_periodic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            // Stay away from ±π where the two ends of the range meet.
            let theta: f32 = rng.gen_range(-3.0..3.0);
            let k: i32 = rng.gen_range(-50..50);
            let shifted = theta + TAU * k as f32;
            let diff = (wrap_angle(shifted) - wrap_angle(theta)).abs();
            assert!(
                diff < 1e-3,
                "theta={theta} k={k}: wrapped {} vs {}",
                wrap_angle(shifted),
                wrap_angle(theta)
            );
        }
    }

    #[test]
    fn wrap_angle_always_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let a: f32 = rng.gen_range(-1000.0..1000.0);
            let w = wrap_angle(a);
            assert!(w > -PI && w <= PI, "wrap_angle({a}) = {w} out of range");
        }
    }

    #[test]
    fn wrap_angle_non_finite_is_zero() {
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        assert_eq!(wrap_angle(f32::INFINITY), 0.0);
    }

    // ── world_transform ───────────────────────────────────────────────────────

    #[test]
    fn world_transform_scales_before_rotating_and_translating() {
        let t = world_transform(Vec2::new(10.0, 20.0), std::f32::consts::FRAC_PI_2, 2.0);
        let p = t.transform_point2(Vec2::new(1.0, 0.0));
        // (1,0) → scale (2,0) → rotate 90° (0,2) → translate (10,22)
        assert!((p - Vec2::new(10.0, 22.0)).length() < 1e-5, "got {p:?}");
    }

    #[test]
    fn world_transform_identity() {
        let t = world_transform(Vec2::ZERO, 0.0, 1.0);
        let p = Vec2::new(3.5, -2.0);
        assert!((t.transform_point2(p) - p).length() < 1e-6);
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn cross_product_sign_follows_turn_direction() {
        let o = Vec2::ZERO;
        assert!(cross_product(o, Vec2::X, Vec2::Y) > 0.0);
        assert!(cross_product(o, Vec2::Y, Vec2::X) < 0.0);
        assert_eq!(cross_product(o, Vec2::X, Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn edge_normal_is_perpendicular() {
        let e = Vec2::new(3.0, 4.0);
        assert_eq!(e.dot(edge_normal(e)), 0.0);
        assert_eq!(edge_normal(e).length(), 5.0);
    }

    #[test]
    fn almost_equal_handles_zero_and_relative_cases() {
        assert!(almost_equal(1.0, 1.00001, 1e-4));
        assert!(!almost_equal(1.0, 1.1, 1e-4));
        assert!(almost_equal(0.0, 1e-9, 1e-4));
        assert!(!almost_equal(0.0, 1e-3, 1e-4));
    }

    #[test]
    fn signed_area_of_unit_square() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-6);
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 1.0).abs() < 1e-6);
    }
}
