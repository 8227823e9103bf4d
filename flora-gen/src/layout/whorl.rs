//! Concentric whorl layout
//!
//! Each whorl is a ring of petals at a fixed radius, height and tilt. Rings
//! are staggered by a cumulative angular offset so petals of adjacent rings
//! cover each other's gaps.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use tracing::warn;

use super::orientation::{petal_direction, petal_orientation, radial, DirectionTerms};
use super::variant::VariantPicker;
use super::{LayoutStrategy, PetalInstance};
use crate::pool::ResourcePool;
use crate::rng::PseudoRandomSource;

/// One ring of petals
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhorlSpec {
    pub count: u32,
    pub radius: f32,
    pub height: f32,
    /// 0 = upright, 1 = flat
    pub tilt: f32,
    pub scale: f32,
    /// Petal layer the ring draws its geometry from
    pub layer: u32,
}

impl Default for WhorlSpec {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 0.1,
            height: 0.0,
            tilt: 0.3,
            scale: 1.0,
            layer: 0,
        }
    }
}

impl WhorlSpec {
    /// Clamp into the renderable domain: `count >= 1`, `radius >= 0`,
    /// `tilt` in [0, 1], `scale > 0`, finite height
    pub fn sanitized(&self) -> Self {
        let mut spec = *self;
        if spec.count == 0 {
            warn!("WhorlSpec: count must be >= 1, clamping to 1");
            spec.count = 1;
        }
        if !(spec.radius >= 0.0) || !spec.radius.is_finite() {
            warn!("WhorlSpec: radius {} out of range, clamping to 0.0", spec.radius);
            spec.radius = 0.0;
        }
        if !spec.height.is_finite() {
            warn!("WhorlSpec: non-finite height, using 0.0");
            spec.height = 0.0;
        }
        if !(0.0..=1.0).contains(&spec.tilt) {
            let clamped = if spec.tilt.is_finite() { spec.tilt.clamp(0.0, 1.0) } else { 0.0 };
            warn!("WhorlSpec: tilt {} out of range, clamping to {}", spec.tilt, clamped);
            spec.tilt = clamped;
        }
        if !(spec.scale > 0.0) || !spec.scale.is_finite() {
            warn!("WhorlSpec: scale {} must be > 0, clamping to 0.01", spec.scale);
            spec.scale = 0.01;
        }
        spec
    }
}

/// Whorl layout parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhorlLayoutConfig {
    pub whorls: Vec<WhorlSpec>,
    /// Fraction of half a petal spacing each ring rotates relative to the last
    pub stagger: f32,
    /// Angular jitter as a fraction of the petal spacing
    pub angle_jitter: f32,
    /// Roll jitter in radians
    pub roll_jitter: f32,
    /// Relative scale jitter
    pub scale_jitter: f32,
    /// Tangential lean, strongest on the innermost ring
    pub lean: f32,
    /// Downward pull applied in proportion to tilt beyond 0.8
    pub droop: f32,
}

impl Default for WhorlLayoutConfig {
    fn default() -> Self {
        Self {
            whorls: vec![
                WhorlSpec { count: 3, radius: 0.02, height: 0.12, tilt: 0.05, scale: 0.5, layer: 0 },
                WhorlSpec { count: 5, radius: 0.05, height: 0.08, tilt: 0.3, scale: 0.75, layer: 1 },
                WhorlSpec { count: 8, radius: 0.09, height: 0.03, tilt: 0.6, scale: 1.0, layer: 2 },
            ],
            stagger: 1.0,
            angle_jitter: 0.06,
            roll_jitter: 0.05,
            scale_jitter: 0.05,
            lean: 0.0,
            droop: 0.0,
        }
    }
}

/// Layout strategy placing petals on concentric rings
pub struct WhorlLayout {
    config: WhorlLayoutConfig,
}

impl WhorlLayout {
    /// Sanitize the config and enforce non-decreasing tilt across rings
    pub fn new(config: &WhorlLayoutConfig) -> Self {
        let mut config = config.clone();
        if config.whorls.is_empty() {
            warn!("WhorlLayout: no whorls configured, using a single default ring");
            config.whorls.push(WhorlSpec::default());
        }

        let mut max_tilt = 0.0f32;
        for whorl in &mut config.whorls {
            *whorl = whorl.sanitized();
            if whorl.tilt < max_tilt {
                warn!(
                    "WhorlLayout: tilt {} is below an inner ring's {}, raising it",
                    whorl.tilt, max_tilt
                );
                whorl.tilt = max_tilt;
            }
            max_tilt = whorl.tilt;
        }

        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };
        config.stagger = finite_or(config.stagger, 1.0);
        config.angle_jitter = finite_or(config.angle_jitter, 0.0).max(0.0);
        config.roll_jitter = finite_or(config.roll_jitter, 0.0).max(0.0);
        config.scale_jitter = finite_or(config.scale_jitter, 0.0).clamp(0.0, 0.9);
        config.lean = finite_or(config.lean, 0.0);
        config.droop = finite_or(config.droop, 0.0).max(0.0);

        Self { config }
    }

    pub fn whorls(&self) -> &[WhorlSpec] {
        &self.config.whorls
    }
}

impl LayoutStrategy for WhorlLayout {
    fn layout(&self, pool: &ResourcePool, rng: &mut PseudoRandomSource) -> Vec<PetalInstance> {
        let config = &self.config;
        let picker = VariantPicker::new(pool);
        let ring_count = config.whorls.len();
        let total: usize = config.whorls.iter().map(|w| w.count as usize).sum();
        let mut instances = Vec::with_capacity(total);

        let mut offset = 0.0f32;
        for (ring, whorl) in config.whorls.iter().enumerate() {
            if ring > 0 {
                offset += PI / whorl.count as f32 * config.stagger;
            }

            let t = if ring_count > 1 {
                ring as f32 / (ring_count - 1) as f32
            } else {
                0.0
            };
            let spacing = TAU / whorl.count as f32;
            let terms = DirectionTerms {
                lean: config.lean * (1.0 - t),
                droop: config.droop * (whorl.tilt - 0.8).max(0.0) * 5.0,
            };

            for i in 0..whorl.count {
                let azimuth = offset + i as f32 * spacing + rng.signed() * config.angle_jitter * spacing;
                let roll_jitter = rng.signed() * config.roll_jitter;
                let scale = whorl.scale * (1.0 + rng.signed() * config.scale_jitter);
                let (geometry_variant_id, material_variant_id) = picker.pick(whorl.layer, t, rng);

                let direction = petal_direction(azimuth, whorl.tilt, terms);
                let orientation = petal_orientation(direction, azimuth, roll_jitter);
                let position = radial(azimuth) * whorl.radius + glam::Vec3::Y * whorl.height;

                instances.push(PetalInstance {
                    position,
                    orientation,
                    scale,
                    geometry_variant_id,
                    material_variant_id,
                    openness: whorl.tilt,
                    layer: pool.clamp_layer(whorl.layer),
                });
            }
        }

        instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    fn pool() -> ResourcePool {
        ResourcePool::build(&Default::default(), &Default::default(), &Default::default())
    }

    #[test]
    fn test_petal_count_matches_whorls() {
        let layout = WhorlLayout::new(&WhorlLayoutConfig::default());
        let mut rng = PseudoRandomSource::new(Seed::new(1));
        let petals = layout.layout(&pool(), &mut rng);
        assert_eq!(petals.len(), 3 + 5 + 8);
    }

    #[test]
    fn test_invalid_specs_are_clamped() {
        let config = WhorlLayoutConfig {
            whorls: vec![WhorlSpec {
                count: 0,
                radius: -2.0,
                height: f32::NAN,
                tilt: 3.0,
                scale: -1.0,
                layer: 99,
            }],
            ..Default::default()
        };
        let layout = WhorlLayout::new(&config);
        let spec = layout.whorls()[0];
        assert_eq!(spec.count, 1);
        assert_eq!(spec.radius, 0.0);
        assert_eq!(spec.height, 0.0);
        assert_eq!(spec.tilt, 1.0);
        assert!(spec.scale > 0.0);

        let mut rng = PseudoRandomSource::new(Seed::new(2));
        let pool = pool();
        let petals = layout.layout(&pool, &mut rng);
        assert_eq!(petals.len(), 1);
        assert!(petals[0].position.is_finite());
        assert!((petals[0].geometry_variant_id as usize) < pool.geometry_count());
    }

    #[test]
    fn test_tilt_made_non_decreasing() {
        let config = WhorlLayoutConfig {
            whorls: vec![
                WhorlSpec { tilt: 0.5, ..Default::default() },
                WhorlSpec { tilt: 0.2, ..Default::default() },
                WhorlSpec { tilt: 0.7, ..Default::default() },
            ],
            ..Default::default()
        };
        let layout = WhorlLayout::new(&config);
        let tilts: Vec<f32> = layout.whorls().iter().map(|w| w.tilt).collect();
        assert_eq!(tilts, vec![0.5, 0.5, 0.7]);
    }

    #[test]
    fn test_empty_config_gets_default_ring() {
        let layout = WhorlLayout::new(&WhorlLayoutConfig { whorls: vec![], ..Default::default() });
        assert_eq!(layout.whorls().len(), 1);
    }

    #[test]
    fn test_rings_are_staggered() {
        let config = WhorlLayoutConfig {
            whorls: vec![
                WhorlSpec { count: 4, radius: 1.0, ..Default::default() },
                WhorlSpec { count: 4, radius: 2.0, ..Default::default() },
            ],
            angle_jitter: 0.0,
            roll_jitter: 0.0,
            scale_jitter: 0.0,
            ..Default::default()
        };
        let layout = WhorlLayout::new(&config);
        let mut rng = PseudoRandomSource::new(Seed::new(0));
        let petals = layout.layout(&pool(), &mut rng);

        let angle = |i: usize| petals[i].position.x.atan2(petals[i].position.z);
        assert!(angle(0).abs() < 1e-5);
        // Second ring rotated by half a spacing: pi / 4.
        assert!((angle(4) - PI / 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_upright_ring_faces_the_axis() {
        let config = WhorlLayoutConfig {
            whorls: vec![WhorlSpec { count: 8, radius: 1.0, tilt: 0.0, ..Default::default() }],
            angle_jitter: 0.0,
            roll_jitter: 0.0,
            scale_jitter: 0.0,
            ..Default::default()
        };
        let layout = WhorlLayout::new(&config);
        let mut rng = PseudoRandomSource::new(Seed::new(0));

        for petal in layout.layout(&pool(), &mut rng) {
            let inward = -glam::Vec3::new(petal.position.x, 0.0, petal.position.z).normalize();
            let face = petal.orientation * crate::layout::CONCAVE_AXIS;
            assert!(face.dot(inward) > 0.9, "{:?} faces {:?}", petal.position, face);
        }
    }

    #[test]
    fn test_tilted_rings_face_inward_and_up() {
        let layout = WhorlLayout::new(&WhorlLayoutConfig {
            angle_jitter: 0.0,
            roll_jitter: 0.0,
            ..Default::default()
        });
        let mut rng = PseudoRandomSource::new(Seed::new(2));

        for petal in layout.layout(&pool(), &mut rng) {
            let inward = -glam::Vec3::new(petal.position.x, 0.0, petal.position.z).normalize();
            let face = petal.orientation * crate::layout::CONCAVE_AXIS;
            let level = glam::Vec3::new(face.x, 0.0, face.z).normalize();
            assert!(level.dot(inward) > 0.9, "{:?} faces {:?}", petal.position, face);
        }
    }
}
