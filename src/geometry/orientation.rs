//! Fiber orientation relative to an ellipse.
//!
//! Perpendicular fibers point along the normal from the nearest point of the
//! ellipse boundary; parallel fibers are that normal turned a quarter turn
//! counter-clockwise. The nearest point minimizes
//! d(θ) = (u - a cos θ)² + (v - b sin θ)²
//! in the ellipse's local frame.
//!
//! The nearest point always lies in the same quadrant as the query point, so
//! the search reflects into the first quadrant and bisects the single root of
//! the stationary-point equation there.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::prelude::*;

use super::EllipseGeometry;

/// Bisection cap; enough halvings to exhaust f64 precision
const MAX_BISECTIONS: usize = 1100;
/// Distance below which a point is treated as lying on the boundary
const DEGENERATE_DISTANCE: f64 = 1e-12;

/// Root of g(s) = (r0 z0 / (s + r0))² + (z1 / (s + 1))² - 1 for s > -1
///
/// g is strictly decreasing there, so plain bisection on a bracket that
/// straddles the sign change converges to it.
fn bisect_stationary_root(r0: f64, z: DVec2, g: f64) -> f64 {
    let n0 = r0 * z.x;
    let mut s0 = z.y - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z.y) - 1.0 };
    let mut s = 0.0;

    for _ in 0..MAX_BISECTIONS {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z.y / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

/// Nearest boundary point for `y` with non-negative coordinates, `e0 >= e1`
fn nearest_in_first_quadrant(e0: f64, e1: f64, y: DVec2) -> DVec2 {
    if y.y > 0.0 {
        if y.x > 0.0 {
            let z = DVec2::new(y.x / e0, y.y / e1);
            let g = z.length_squared() - 1.0;
            if g == 0.0 {
                return y;
            }
            let r0 = (e0 / e1).powi(2);
            let s = bisect_stationary_root(r0, z, g);
            DVec2::new(r0 * y.x / (s + r0), y.y / (s + 1.0))
        } else {
            // On the minor axis
            DVec2::new(0.0, e1)
        }
    } else {
        // On the major axis: inside the evolute cusp the nearest point leaves the axis
        let numer = e0 * y.x;
        let denom = e0 * e0 - e1 * e1;
        if numer < denom {
            let xde = numer / denom;
            DVec2::new(e0 * xde, e1 * (1.0 - xde * xde).sqrt())
        } else {
            DVec2::new(e0, 0.0)
        }
    }
}

/// Parametric angle in (-π, π] of the ellipse boundary point nearest to `q`
///
/// `q` is in the local frame of an axis-aligned ellipse with semi-axes `a`, `b`.
/// Falls back to `atan2(v, u)` if the search produces a non-finite result.
pub fn closest_boundary_angle(q: DVec2, a: f64, b: f64) -> f64 {
    let swapped = a < b;
    let (major, minor, p) = if swapped {
        (b, a, DVec2::new(q.y, q.x))
    } else {
        (a, b, q)
    };

    let nearest = nearest_in_first_quadrant(major, minor, p.abs());
    let nearest = DVec2::new(nearest.x.copysign(p.x), nearest.y.copysign(p.y));
    let nearest = if swapped {
        DVec2::new(nearest.y, nearest.x)
    } else {
        nearest
    };

    let theta = (nearest.y / b).atan2(nearest.x / a);
    if theta.is_finite() {
        theta
    } else {
        log::debug!(
            "closest-point search failed for ({}, {}), using initial guess",
            q.x,
            q.y
        );
        q.y.atan2(q.x)
    }
}

/// Fiber direction generator
///
/// Holds the random source used for randomly oriented fibers. Each call to
/// [`FiberOrientationSolver::random`] is an independent draw.
pub struct FiberOrientationSolver {
    rng: StdRng,
}

impl FiberOrientationSolver {
    /// Solver seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Solver with a fixed seed for reproducible random fields
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random direction scaled by `anisotropy`
    pub fn random(&mut self, anisotropy: f64) -> DVec2 {
        let theta: f64 = self.rng.gen_range(0.0..TAU);
        anisotropy * DVec2::new(theta.cos(), theta.sin())
    }

    /// Unit normal from the nearest boundary point toward `p`, global frame
    ///
    /// Returns zero when `p` lies on the boundary and the normal is undefined.
    pub fn perpendicular(&self, ellipse: &EllipseGeometry, p: DVec2) -> DVec2 {
        let q = ellipse.to_local(p);
        let axes = ellipse.semi_axes();
        let theta = closest_boundary_angle(q, axes.x, axes.y);
        let nearest = DVec2::new(axes.x * theta.cos(), axes.y * theta.sin());

        let offset = q - nearest;
        let distance = offset.length();
        if distance < DEGENERATE_DISTANCE {
            return DVec2::ZERO;
        }
        ellipse.direction_to_global(offset / distance)
    }

    /// Unit tangent: the perpendicular direction turned 90° counter-clockwise
    pub fn parallel(&self, ellipse: &EllipseGeometry, p: DVec2) -> DVec2 {
        self.perpendicular(ellipse, p).perp()
    }
}

impl Default for FiberOrientationSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn brute_force_distance(q: DVec2, a: f64, b: f64) -> f64 {
        let samples = 200_000;
        (0..samples)
            .map(|i| {
                let t = -PI + TAU * i as f64 / samples as f64;
                (q - DVec2::new(a * t.cos(), b * t.sin())).length()
            })
            .fold(f64::MAX, f64::min)
    }

    #[test]
    fn test_closest_point_matches_brute_force() {
        let (a, b) = (100.0, 40.0);
        let points = [
            DVec2::new(150.0, 10.0),
            DVec2::new(-120.0, 60.0),
            DVec2::new(20.0, -90.0),
            DVec2::new(-60.0, -60.0),
            DVec2::new(0.0, 45.0),
        ];
        for q in points {
            let theta = closest_boundary_angle(q, a, b);
            let found = (q - DVec2::new(a * theta.cos(), b * theta.sin())).length();
            let expected = brute_force_distance(q, a, b);
            assert!(
                (found - expected).abs() < 1e-3,
                "closest distance for {q}: got {found}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_closest_point_from_center() {
        // atan2(0, 0) = 0 is the farthest boundary point when a > b
        let theta = closest_boundary_angle(DVec2::ZERO, 100.0, 40.0);
        assert!((theta.abs() - PI / 2.0).abs() < 1e-6, "theta = {theta}");
    }

    #[test]
    fn test_closest_point_inside_eccentric_ellipse() {
        // atan2 starts these on the wrong side of the major axis
        let cases = [
            (DVec2::new(-11.987, -9.607), 100.0, 40.0),
            (DVec2::new(-20.5, -20.5), 150.0, 20.0),
            (DVec2::new(30.0, 3.0), 150.0, 20.0),
            (DVec2::new(-5.0, 60.0), 20.0, 150.0),
            (DVec2::new(12.0, -0.5), 150.0, 20.0),
        ];
        for (q, a, b) in cases {
            let theta = closest_boundary_angle(q, a, b);
            let found = (q - DVec2::new(a * theta.cos(), b * theta.sin())).length();
            let expected = brute_force_distance(q, a, b);
            assert!(
                (found - expected).abs() < 1e-3,
                "closest distance for {q} on {a}x{b}: got {found}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_perpendicular_matches_brute_force_over_eccentric_ring() {
        let solver = FiberOrientationSolver::with_seed(1);
        let (a, b) = (150.0, 20.0);
        let ring = EllipseGeometry::new(DVec2::ZERO, DVec2::new(a, b), 0.0, 60.0).unwrap();

        let samples = 20_000;
        let boundary: Vec<DVec2> = (0..samples)
            .map(|i| {
                let t = -PI + TAU * i as f64 / samples as f64;
                DVec2::new(a * t.cos(), b * t.sin())
            })
            .collect();

        let mut checked = 0;
        for i in -105..=105 {
            for j in -40..=40 {
                let p = DVec2::new(2.0 * i as f64 - 0.5, 2.0 * j as f64 - 0.5);
                if !ring.inside_ring(p) {
                    continue;
                }
                checked += 1;

                let nearest_sample = boundary
                    .iter()
                    .copied()
                    .min_by(|x, y| (p - *x).length_squared().total_cmp(&(p - *y).length_squared()))
                    .unwrap();
                let expected_distance = (p - nearest_sample).length();

                let theta = closest_boundary_angle(p, a, b);
                let found = (p - DVec2::new(a * theta.cos(), b * theta.sin())).length();
                assert!(
                    found <= expected_distance + 1e-9 && found >= expected_distance - 0.05,
                    "distance at {p}: got {found}, expected {expected_distance}"
                );

                if expected_distance >= 2.0 {
                    let expected_dir = (p - nearest_sample) / expected_distance;
                    let dir = solver.perpendicular(&ring, p);
                    let angle = dir.dot(expected_dir).clamp(-1.0, 1.0).acos().to_degrees();
                    assert!(angle < 1.5, "direction at {p}: got {dir}, expected {expected_dir}");
                }
            }
        }
        assert!(checked > 5_000, "only {checked} ring voxels sampled");
    }

    #[test]
    fn test_perpendicular_on_circle_is_radial() {
        let solver = FiberOrientationSolver::with_seed(1);
        let circle = EllipseGeometry::new(DVec2::new(5.0, 5.0), DVec2::new(50.0, 50.0), 0.0, 10.0).unwrap();

        let outside = solver.perpendicular(&circle, DVec2::new(5.0 + 55.0, 5.0));
        assert!((outside - DVec2::X).length() < 1e-9, "got {outside}");

        let inside = solver.perpendicular(&circle, DVec2::new(5.0, 5.0 + 20.0));
        assert!((inside - DVec2::NEG_Y).length() < 1e-9, "got {inside}");
    }

    #[test]
    fn test_perpendicular_follows_rotation() {
        let solver = FiberOrientationSolver::with_seed(1);
        let rotation = 0.3;
        let e = EllipseGeometry::new(DVec2::new(-20.0, 30.0), DVec2::new(100.0, 50.0), rotation, 20.0).unwrap();
        let p = e.from_local(DVec2::new(110.0, 0.0));
        let dir = solver.perpendicular(&e, p);
        let expected = DVec2::new(rotation.cos(), rotation.sin());
        assert!((dir - expected).length() < 1e-9, "got {dir}, expected {expected}");
    }

    #[test]
    fn test_parallel_is_orthogonal_unit() {
        let solver = FiberOrientationSolver::with_seed(1);
        let e = EllipseGeometry::new(DVec2::ZERO, DVec2::new(80.0, 30.0), 1.1, 25.0).unwrap();
        for i in -10..=10 {
            for j in -10..=10 {
                let p = DVec2::new(i as f64 * 13.0 + 0.5, j as f64 * 11.0 + 0.25);
                let perp = solver.perpendicular(&e, p);
                let par = solver.parallel(&e, p);
                assert!(perp.dot(par).abs() < 1e-9);
                assert!((perp.length() - 1.0).abs() < 1e-9);
                assert!((par.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_on_boundary_returns_zero() {
        let solver = FiberOrientationSolver::with_seed(1);
        let circle = EllipseGeometry::new(DVec2::ZERO, DVec2::new(10.0, 10.0), 0.0, 0.0).unwrap();
        assert_eq!(solver.perpendicular(&circle, DVec2::new(10.0, 0.0)), DVec2::ZERO);
        assert_eq!(solver.parallel(&circle, DVec2::new(10.0, 0.0)), DVec2::ZERO);
    }

    #[test]
    fn test_random_magnitude_and_seed() {
        let mut first = FiberOrientationSolver::with_seed(42);
        let mut second = FiberOrientationSolver::with_seed(42);
        for _ in 0..100 {
            let v = first.random(0.3);
            assert!((v.length() - 0.3).abs() < 1e-12);
            assert_eq!(v, second.random(0.3));
        }
    }
}
