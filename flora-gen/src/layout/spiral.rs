//! Continuous golden-angle phyllotaxis
//!
//! Petal `i` of `N` sits at `t = i / (N - 1)` along the spiral and at azimuth
//! `i * golden_angle`. Radius, height, tilt and scale are monotonic ramps of
//! `t`, so the centre is a tight upright bud and the rim an open bloom.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::orientation::{petal_direction, petal_orientation, radial, DirectionTerms};
use super::variant::VariantPicker;
use super::{LayoutStrategy, PetalInstance};
use crate::pool::ResourcePool;
use crate::rng::PseudoRandomSource;

/// The golden angle, `π(3 − √5)` radians (≈ 137.5°)
pub fn golden_angle() -> f32 {
    std::f32::consts::PI * (3.0 - 5.0f32.sqrt())
}

/// Monotonic power ramp `from + (to − from) · t^exponent`
///
/// Increasing when `to > from`, decreasing when `to < from`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub from: f32,
    pub to: f32,
    pub exponent: f32,
}

impl Ramp {
    pub const fn new(from: f32, to: f32, exponent: f32) -> Self {
        Self { from, to, exponent }
    }

    pub fn eval(&self, t: f32) -> f32 {
        self.from + (self.to - self.from) * t.clamp(0.0, 1.0).powf(self.exponent)
    }

    fn sanitized(&self, name: &str, fallback: Ramp) -> Self {
        if !(self.from.is_finite() && self.to.is_finite() && self.exponent.is_finite()) {
            warn!("SpiralSpec: {} ramp has non-finite values, using defaults", name);
            return fallback;
        }
        let mut ramp = *self;
        if ramp.exponent <= 0.0 {
            warn!("SpiralSpec: {} exponent must be > 0, clamping to 0.01", name);
            ramp.exponent = 0.01;
        }
        ramp
    }

    /// Clamp both ends into `[lo, hi]` and force `to >= from`
    fn non_decreasing(mut self, name: &str, lo: f32, hi: f32) -> Self {
        let (from, to) = (self.from.clamp(lo, hi), self.to.clamp(lo, hi));
        if from != self.from || to != self.to {
            warn!("SpiralSpec: {} ramp clamped into [{}, {}]", name, lo, hi);
        }
        self.from = from;
        self.to = to;
        if self.to < self.from {
            warn!("SpiralSpec: {} must not decrease outward, raising `to` to {}", name, self.from);
            self.to = self.from;
        }
        self
    }

    /// Force `to <= from` so the dome falls from centre to rim
    fn non_increasing(mut self, name: &str) -> Self {
        if self.to > self.from {
            warn!("SpiralSpec: {} must not rise outward, lowering `to` to {}", name, self.from);
            self.to = self.from;
        }
        self
    }
}

/// Spiral layout parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralSpec {
    pub total_petals: u32,
    /// Azimuth increment between consecutive petals, radians
    pub golden_angle: f32,
    pub radius: Ramp,
    pub height: Ramp,
    pub tilt: Ramp,
    pub scale: Ramp,
    /// Tangential lean, fading from the centre to the rim
    pub lean: f32,
    /// Extra roll near the centre, fading out toward the rim
    pub wrap: f32,
    /// Downward pull for petals with tilt beyond 0.8
    pub droop: f32,
    /// Angular jitter in radians
    pub angle_jitter: f32,
    /// Roll jitter in radians
    pub roll_jitter: f32,
    /// Number of petal layers the spiral is split into for geometry lookup
    pub layers: u32,
}

impl Default for SpiralSpec {
    fn default() -> Self {
        Self {
            total_petals: 75,
            golden_angle: golden_angle(),
            radius: Ramp::new(0.0, 0.12, 0.5),
            height: Ramp::new(0.1, 0.0, 2.0),
            tilt: Ramp::new(0.05, 0.95, 1.0),
            scale: Ramp::new(0.45, 1.0, 0.7),
            lean: 0.3,
            wrap: 0.6,
            droop: 0.0,
            angle_jitter: 0.02,
            roll_jitter: 0.03,
            layers: 3,
        }
    }
}

/// Pre-jitter placement of one spiral petal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralSample {
    pub t: f32,
    /// Azimuth wrapped into `[0, 2π)`
    pub angle: f32,
    pub radius: f32,
    pub height: f32,
    pub tilt: f32,
    pub scale: f32,
}

/// Layout strategy placing petals on a golden-angle spiral
pub struct SpiralLayout {
    spec: SpiralSpec,
}

impl SpiralLayout {
    pub fn new(spec: &SpiralSpec) -> Self {
        let defaults = SpiralSpec::default();
        let mut spec = spec.clone();

        if spec.total_petals == 0 {
            warn!("SpiralSpec: total_petals must be >= 1, clamping to 1");
            spec.total_petals = 1;
        }
        if !spec.golden_angle.is_finite() {
            warn!("SpiralSpec: non-finite golden_angle, using π(3 − √5)");
            spec.golden_angle = golden_angle();
        }
        spec.radius = spec
            .radius
            .sanitized("radius", defaults.radius)
            .non_decreasing("radius", 0.0, f32::MAX);
        spec.height = spec
            .height
            .sanitized("height", defaults.height)
            .non_increasing("height");
        spec.tilt = spec
            .tilt
            .sanitized("tilt", defaults.tilt)
            .non_decreasing("tilt", 0.0, 1.0);
        spec.scale = spec.scale.sanitized("scale", defaults.scale);
        if spec.scale.from <= 0.0 || spec.scale.to <= 0.0 {
            warn!("SpiralSpec: scale must be > 0, clamping to 0.01");
            spec.scale.from = spec.scale.from.max(0.01);
            spec.scale.to = spec.scale.to.max(0.01);
        }

        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };
        spec.lean = finite_or(spec.lean, 0.0);
        spec.wrap = finite_or(spec.wrap, 0.0);
        spec.droop = finite_or(spec.droop, 0.0).max(0.0);
        spec.angle_jitter = finite_or(spec.angle_jitter, 0.0).max(0.0);
        spec.roll_jitter = finite_or(spec.roll_jitter, 0.0).max(0.0);
        spec.layers = spec.layers.max(1);

        Self { spec }
    }

    pub fn spec(&self) -> &SpiralSpec {
        &self.spec
    }

    /// Normalized spiral position of petal `index`
    pub fn t(&self, index: u32) -> f32 {
        let n = self.spec.total_petals;
        if n > 1 {
            index.min(n - 1) as f32 / (n - 1) as f32
        } else {
            0.0
        }
    }

    /// Deterministic placement of petal `index` before any jitter
    pub fn sample(&self, index: u32) -> SpiralSample {
        let t = self.t(index);
        let angle = (index as f64 * self.spec.golden_angle as f64).rem_euclid(std::f64::consts::TAU) as f32;
        SpiralSample {
            t,
            angle,
            radius: self.spec.radius.eval(t),
            height: self.spec.height.eval(t),
            tilt: self.spec.tilt.eval(t),
            scale: self.spec.scale.eval(t),
        }
    }

    /// Layer a spiral position draws its geometry from
    fn layer_at(&self, t: f32) -> u32 {
        ((t * self.spec.layers as f32) as u32).min(self.spec.layers - 1)
    }
}

impl LayoutStrategy for SpiralLayout {
    fn layout(&self, pool: &ResourcePool, rng: &mut PseudoRandomSource) -> Vec<PetalInstance> {
        let spec = &self.spec;
        let picker = VariantPicker::new(pool);
        let mut instances = Vec::with_capacity(spec.total_petals as usize);

        for i in 0..spec.total_petals {
            let sample = self.sample(i);
            let azimuth = sample.angle + rng.signed() * spec.angle_jitter;
            let roll_offset = (1.0 - sample.t) * spec.wrap + rng.signed() * spec.roll_jitter;
            let layer = self.layer_at(sample.t);
            let (geometry_variant_id, material_variant_id) = picker.pick(layer, sample.t, rng);

            let terms = DirectionTerms {
                lean: spec.lean * (1.0 - sample.t),
                droop: spec.droop * (sample.tilt - 0.8).max(0.0) * 5.0,
            };
            let direction = petal_direction(azimuth, sample.tilt, terms);
            let orientation = petal_orientation(direction, azimuth, roll_offset);
            let position = radial(azimuth) * sample.radius + glam::Vec3::Y * sample.height;

            instances.push(PetalInstance {
                position,
                orientation,
                scale: sample.scale,
                geometry_variant_id,
                material_variant_id,
                openness: sample.tilt,
                layer: pool.clamp_layer(layer),
            });
        }

        instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CONCAVE_AXIS;
    use crate::rng::Seed;

    #[test]
    fn test_golden_angle_value() {
        assert!((golden_angle() - 2.399_963).abs() < 1e-5);
    }

    #[test]
    fn test_ramp_monotonic() {
        let up = Ramp::new(0.05, 0.95, 1.3);
        let down = Ramp::new(0.1, 0.0, 2.0);
        let mut prev_up = f32::MIN;
        let mut prev_down = f32::MAX;
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert!(up.eval(t) >= prev_up);
            assert!(down.eval(t) <= prev_down);
            prev_up = up.eval(t);
            prev_down = down.eval(t);
        }
    }

    #[test]
    fn test_single_petal_spiral() {
        let layout = SpiralLayout::new(&SpiralSpec { total_petals: 0, ..Default::default() });
        assert_eq!(layout.spec().total_petals, 1);
        assert_eq!(layout.t(0), 0.0);
    }

    #[test]
    fn test_decreasing_tilt_and_negative_radius_are_fixed() {
        let layout = SpiralLayout::new(&SpiralSpec {
            radius: Ramp::new(-1.0, -0.5, 1.0),
            tilt: Ramp::new(0.9, 0.2, 1.0),
            ..Default::default()
        });
        let spec = layout.spec();
        assert_eq!(spec.radius.from, 0.0);
        assert_eq!(spec.radius.to, 0.0);
        assert!(spec.tilt.to >= spec.tilt.from);
    }

    #[test]
    fn test_rising_height_is_flattened() {
        let layout = SpiralLayout::new(&SpiralSpec {
            height: Ramp::new(0.0, 0.3, 1.0),
            ..Default::default()
        });
        let height = layout.spec().height;
        assert_eq!(height.from, 0.0);
        assert_eq!(height.to, 0.0);

        let kept = SpiralLayout::new(&SpiralSpec::default());
        assert_eq!(kept.spec().height, SpiralSpec::default().height);
        for i in 1..75 {
            assert!(kept.sample(i).height <= kept.sample(i - 1).height);
        }
    }

    #[test]
    fn test_layer_split() {
        let layout = SpiralLayout::new(&SpiralSpec { layers: 3, ..Default::default() });
        assert_eq!(layout.layer_at(0.0), 0);
        assert_eq!(layout.layer_at(0.5), 1);
        assert_eq!(layout.layer_at(1.0), 2);
    }

    #[test]
    fn test_layout_count_and_openness() {
        let pool = ResourcePool::build(&Default::default(), &Default::default(), &Default::default());
        let layout = SpiralLayout::new(&SpiralSpec::default());
        let mut rng = PseudoRandomSource::new(Seed::new(11));
        let petals = layout.layout(&pool, &mut rng);

        assert_eq!(petals.len(), 75);
        for pair in petals.windows(2) {
            assert!(pair[1].openness >= pair[0].openness);
        }
    }

    #[test]
    fn test_petals_face_the_axis() {
        let pool = ResourcePool::build(&Default::default(), &Default::default(), &Default::default());
        let layout = SpiralLayout::new(&SpiralSpec {
            lean: 0.0,
            wrap: 0.0,
            angle_jitter: 0.0,
            roll_jitter: 0.0,
            ..Default::default()
        });
        let mut rng = PseudoRandomSource::new(Seed::new(3));

        for (i, petal) in layout.layout(&pool, &mut rng).iter().enumerate() {
            let azimuth = layout.sample(i as u32).angle;
            let face = petal.orientation * CONCAVE_AXIS;
            let level = glam::Vec3::new(face.x, 0.0, face.z).normalize();
            assert!(level.dot(-radial(azimuth)) > 0.9, "petal {i}: {face:?}");
            assert!(face.y >= -1e-5);
        }
    }
}
