//! Cardinal (Catmull-Rom) spline through authored control points

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Classic Catmull-Rom tension
pub const CATMULL_ROM_TENSION: f32 = 0.5;

/// Spline stem path
///
/// The curve passes through every control point. `t` in [0, 1] is split
/// uniformly across the `n - 1` segments; the tangent at point `i` is
/// `tension * (p[i+1] - p[i-1])`, with the missing neighbours at either end
/// reflected through the endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StemCurve {
    points: Vec<Vec3>,
    tension: f32,
}

impl StemCurve {
    pub fn new(points: Vec<Vec3>, tension: f32) -> Self {
        let tension = if tension.is_finite() {
            tension
        } else {
            warn!("StemCurve: non-finite tension, using {}", CATMULL_ROM_TENSION);
            CATMULL_ROM_TENSION
        };
        let before = points.len();
        let points: Vec<Vec3> = points.into_iter().filter(|p| p.is_finite()).collect();
        if points.len() != before {
            warn!("StemCurve: dropped {} non-finite control points", before - points.len());
        }
        if points.is_empty() {
            warn!("StemCurve: no control points, the stem collapses to the origin");
        }
        Self { points, tension }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    /// Segment index and local parameter for a global `t`
    fn locate(&self, t: f32) -> (usize, f32) {
        let segments = self.points.len() - 1;
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * segments as f32;
        let i = (scaled.floor() as usize).min(segments - 1);
        (i, scaled - i as f32)
    }

    /// Control point with reflected extrapolation past either end
    fn control(&self, i: isize) -> Vec3 {
        let n = self.points.len() as isize;
        if i < 0 {
            2.0 * self.points[0] - self.points[1]
        } else if i >= n {
            2.0 * self.points[(n - 1) as usize] - self.points[(n - 2) as usize]
        } else {
            self.points[i as usize]
        }
    }

    fn tangent_at_point(&self, i: usize) -> Vec3 {
        let i = i as isize;
        self.tension * (self.control(i + 1) - self.control(i - 1))
    }

    /// Position at `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        match self.points.len() {
            0 => Vec3::ZERO,
            1 => self.points[0],
            _ => {
                let (i, u) = self.locate(t);
                let (p0, p1) = (self.points[i], self.points[i + 1]);
                let (m0, m1) = (self.tangent_at_point(i), self.tangent_at_point(i + 1));

                let u2 = u * u;
                let u3 = u2 * u;
                p0 * (2.0 * u3 - 3.0 * u2 + 1.0)
                    + m0 * (u3 - 2.0 * u2 + u)
                    + p1 * (-2.0 * u3 + 3.0 * u2)
                    + m1 * (u3 - u2)
            }
        }
    }

    /// Derivative with respect to `t`; zero on degenerate curves
    pub fn derivative(&self, t: f32) -> Vec3 {
        if self.points.len() < 2 {
            return Vec3::ZERO;
        }
        let (i, u) = self.locate(t);
        let (p0, p1) = (self.points[i], self.points[i + 1]);
        let (m0, m1) = (self.tangent_at_point(i), self.tangent_at_point(i + 1));

        let u2 = u * u;
        let d = p0 * (6.0 * u2 - 6.0 * u)
            + m0 * (3.0 * u2 - 4.0 * u + 1.0)
            + p1 * (-6.0 * u2 + 6.0 * u)
            + m1 * (3.0 * u2 - 2.0 * u);
        d * (self.points.len() - 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s_curve() -> StemCurve {
        StemCurve::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.05, 0.3, 0.0),
                Vec3::new(-0.04, 0.6, 0.03),
                Vec3::new(0.02, 0.9, -0.02),
                Vec3::new(0.0, 1.2, 0.0),
            ],
            CATMULL_ROM_TENSION,
        )
    }

    #[test]
    fn test_interpolates_control_points() {
        let curve = s_curve();
        let n = curve.points().len();
        for (i, p) in curve.points().iter().enumerate() {
            let t = i as f32 / (n - 1) as f32;
            assert!((curve.point_at(t) - *p).length() < 1e-5);
        }
    }

    #[test]
    fn test_two_points_is_a_straight_line() {
        let curve = StemCurve::new(vec![Vec3::new(0.0, -1.5, 0.0), Vec3::new(0.0, 1.5, 0.0)], 0.5);
        assert!((curve.point_at(0.5) - Vec3::ZERO).length() < 1e-6);
        assert!((curve.point_at(0.25) - Vec3::new(0.0, -0.75, 0.0)).length() < 1e-6);
        for i in 0..=10 {
            let d = curve.derivative(i as f32 / 10.0);
            assert!((d - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let curve = s_curve();
        let h = 1e-3;
        for t in [0.1, 0.3, 0.55, 0.8] {
            let numeric = (curve.point_at(t + h) - curve.point_at(t - h)) / (2.0 * h);
            assert!((numeric - curve.derivative(t)).length() < 1e-2, "t = {t}");
        }
    }

    #[test]
    fn test_degenerate_curves() {
        let empty = StemCurve::new(vec![], 0.5);
        assert_eq!(empty.point_at(0.5), Vec3::ZERO);
        assert_eq!(empty.derivative(0.5), Vec3::ZERO);

        let single = StemCurve::new(vec![Vec3::ONE], 0.5);
        assert_eq!(single.point_at(0.9), Vec3::ONE);

        let coincident = StemCurve::new(vec![Vec3::ONE, Vec3::ONE], 0.5);
        assert_eq!(coincident.derivative(0.3), Vec3::ZERO);
    }

    #[test]
    fn test_non_finite_input_is_dropped() {
        let curve = StemCurve::new(vec![Vec3::ZERO, Vec3::NAN, Vec3::Y], f32::NAN);
        assert_eq!(curve.points().len(), 2);
        assert_eq!(curve.tension(), CATMULL_ROM_TENSION);
        assert!(curve.point_at(f32::INFINITY).is_finite());
    }
}
