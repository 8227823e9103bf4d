//! Geometry and material variant selection
//!
//! Ids are a deterministic function of layer and normalized position plus one
//! bounded random draw, clamped to the pool so they are always valid.

use crate::pool::ResourcePool;
use crate::rng::PseudoRandomSource;

/// Half-width of the random offset applied to the material ramp
const MATERIAL_SPREAD: f32 = 0.75;

pub struct VariantPicker<'a> {
    pool: &'a ResourcePool,
}

impl<'a> VariantPicker<'a> {
    pub fn new(pool: &'a ResourcePool) -> Self {
        Self { pool }
    }

    /// Pick `(geometry_variant_id, material_variant_id)` for a petal
    ///
    /// `t` is the petal's normalized position from centre (0) to rim (1);
    /// materials are ordered dark to light, so outer petals lean lighter.
    pub fn pick(&self, layer: u32, t: f32, rng: &mut PseudoRandomSource) -> (u32, u32) {
        let variant = rng.index(self.pool.variants_per_layer() as usize) as u32;
        let geometry = self.pool.geometry_id(layer, variant);

        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.pool.material_count().saturating_sub(1) as f32;
        let draw = rng.range(-MATERIAL_SPREAD, MATERIAL_SPREAD);
        let material = (t * last + draw).round().clamp(0.0, last) as u32;

        (geometry, self.pool.clamp_material_id(material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    #[test]
    fn test_ids_within_bounds() {
        let pool = ResourcePool::build(&Default::default(), &Default::default(), &Default::default());
        let picker = VariantPicker::new(&pool);
        let mut rng = PseudoRandomSource::new(Seed::new(5));

        for layer in 0..10 {
            for step in 0..=10 {
                let (g, m) = picker.pick(layer, step as f32 / 10.0, &mut rng);
                assert!((g as usize) < pool.geometry_count());
                assert!((m as usize) < pool.material_count());
            }
        }
    }

    #[test]
    fn test_outer_petals_lean_lighter() {
        let pool = ResourcePool::build(&Default::default(), &Default::default(), &Default::default());
        let picker = VariantPicker::new(&pool);
        let mut rng = PseudoRandomSource::new(Seed::new(9));

        let mean = |t: f32, rng: &mut PseudoRandomSource| {
            (0..64).map(|_| picker.pick(0, t, rng).1 as f32).sum::<f32>() / 64.0
        };
        let inner = mean(0.0, &mut rng);
        let outer = mean(1.0, &mut rng);
        assert!(outer > inner);
    }
}
