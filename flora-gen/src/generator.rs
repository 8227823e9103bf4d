//! Flower generation and memoization
//!
//! `generate` runs the whole pipeline for one `(config, seed)`: build the
//! resource pool, lay out petals, build the stem and place its organs.
//! `FlowerGenerator` caches both flowers and pools so repeated requests and
//! seed sweeps over one style do the expensive geometry work once.

use glam::Mat4;
use hashbrown::HashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FlowerConfig;
use crate::error::FloraError;
use crate::layout::PetalInstance;
use crate::mesh::{combine_transformed, UnpackedMesh};
use crate::pool::ResourcePool;
use crate::rng::{PseudoRandomSource, Seed};
use crate::stem::{OrganKind, ResolvedOrgan, Stem};

/// Random stream feeding petal layout
const PETAL_STREAM: u64 = 1;
/// Random stream feeding thorn scattering
const ORGAN_STREAM: u64 = 2;

/// A generated flower
///
/// Every field is read-only output. Geometry lives in the shared pool and is
/// referenced by id.
#[derive(Clone, Debug)]
pub struct Flower {
    pub name: String,
    pub seed: Seed,
    pub pool: Arc<ResourcePool>,
    pub petals: Vec<PetalInstance>,
    pub stem: Option<Stem>,
}

/// Compact, serializable description of a flower
#[derive(Clone, Debug, Serialize)]
pub struct FlowerSummary<'a> {
    pub name: &'a str,
    pub seed: Seed,
    pub geometry_variants: usize,
    pub material_variants: usize,
    pub petal_count: usize,
    pub leaf_count: usize,
    pub thorn_count: usize,
    pub petals: &'a [PetalInstance],
    pub organs: &'a [ResolvedOrgan],
}

impl Flower {
    pub fn organs(&self) -> &[ResolvedOrgan] {
        match &self.stem {
            Some(stem) => &stem.organs,
            None => &[],
        }
    }

    pub fn summary(&self) -> FlowerSummary<'_> {
        let organs = self.organs();
        let count = |kind: OrganKind| organs.iter().filter(|o| o.attachment.kind == kind).count();
        FlowerSummary {
            name: &self.name,
            seed: self.seed,
            geometry_variants: self.pool.geometry_count(),
            material_variants: self.pool.material_count(),
            petal_count: self.petals.len(),
            leaf_count: count(OrganKind::Leaf),
            thorn_count: count(OrganKind::Thorn),
            petals: &self.petals,
            organs,
        }
    }

    /// Stem tube mesh, if the flower has a stem
    pub fn stem_mesh(&self) -> Option<UnpackedMesh> {
        self.stem.as_ref().map(Stem::mesh)
    }

    /// Bake petals, organs and stem into one mesh
    pub fn assemble_mesh(&self) -> UnpackedMesh {
        let stem_mesh = self.stem_mesh();
        let mut parts: Vec<(&UnpackedMesh, Mat4)> = self
            .petals
            .iter()
            .map(|petal| (self.pool.geometry(petal.geometry_variant_id).as_ref(), petal.model_matrix()))
            .collect();

        for organ in self.organs() {
            let mesh = match organ.attachment.kind {
                OrganKind::Leaf => self.pool.leaf_geometry(),
                OrganKind::Thorn => self.pool.thorn_geometry(),
            };
            parts.push((mesh.as_ref(), organ.model_matrix()));
        }
        if let Some(stem) = &stem_mesh {
            parts.push((stem, Mat4::IDENTITY));
        }

        let mesh = combine_transformed(&parts);
        debug!(
            "Assembled {}: {} vertices, {} triangles",
            self.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        mesh
    }
}

/// Generate one flower against an existing pool
///
/// The pool must have been built from this config's style, palette and
/// organs; ids are clamped into it regardless.
pub fn generate_with_pool(config: &FlowerConfig, seed: Seed, pool: Arc<ResourcePool>) -> Flower {
    let mut petal_rng = PseudoRandomSource::stream(seed, PETAL_STREAM);
    let petals = config.layout.layout(&pool, &mut petal_rng);

    let stem = config.stem.as_ref().map(|stem_config| {
        let mut organ_rng = PseudoRandomSource::stream(seed, ORGAN_STREAM);
        Stem::build(stem_config, &mut organ_rng)
    });

    info!(
        "Generated {} (seed {}): {} petals, {} organs",
        config.name,
        seed,
        petals.len(),
        stem.as_ref().map_or(0, |s| s.organs.len())
    );

    Flower {
        name: config.name.clone(),
        seed,
        pool,
        petals,
        stem,
    }
}

/// Generate one flower with a fresh resource pool
pub fn generate(config: &FlowerConfig, seed: Seed) -> Flower {
    let pool = Arc::new(ResourcePool::build(&config.style, &config.palette, &config.organs));
    generate_with_pool(config, seed, pool)
}

/// Memoizing generator
///
/// Flowers are keyed by `(seed, config fingerprint)`, pools by the
/// fingerprint of the style, palette and organ parameters. A pool is never
/// rebuilt or mutated once cached, so flowers already handed out keep valid
/// geometry ids whatever is generated next.
#[derive(Debug, Default)]
pub struct FlowerGenerator {
    pools: HashMap<u64, Arc<ResourcePool>>,
    flowers: HashMap<(u64, u64), Arc<Flower>>,
}

impl FlowerGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared pool for a config's style
    pub fn pool(&mut self, config: &FlowerConfig) -> Result<Arc<ResourcePool>, FloraError> {
        let key = config.pool_fingerprint()?;
        let pool = self.pools.entry(key).or_insert_with(|| {
            debug!("Pool cache miss for {:016x}", key);
            Arc::new(ResourcePool::build(&config.style, &config.palette, &config.organs))
        });
        Ok(Arc::clone(pool))
    }

    pub fn generate(&mut self, config: &FlowerConfig, seed: Seed) -> Result<Arc<Flower>, FloraError> {
        let key = (seed.value(), config.fingerprint()?);
        if let Some(flower) = self.flowers.get(&key) {
            debug!("Flower cache hit for {} (seed {})", config.name, seed);
            return Ok(Arc::clone(flower));
        }

        let pool = self.pool(config)?;
        let flower = Arc::new(generate_with_pool(config, seed, pool));
        self.flowers.insert(key, Arc::clone(&flower));
        Ok(flower)
    }

    pub fn cached_flowers(&self) -> usize {
        self.flowers.len()
    }

    pub fn cached_pools(&self) -> usize {
        self.pools.len()
    }

    pub fn clear(&mut self) {
        self.flowers.clear();
        self.pools.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    #[test]
    fn test_generate_is_deterministic() {
        let config = Preset::SpiralRose.config();
        let a = generate(&config, Seed::new(42));
        let b = generate(&config, Seed::new(42));
        assert_eq!(a.petals, b.petals);
        assert_eq!(a.organs(), b.organs());
    }

    #[test]
    fn test_seed_changes_layout() {
        let config = Preset::ClassicRose.config();
        let a = generate(&config, Seed::new(1));
        let b = generate(&config, Seed::new(2));
        assert_ne!(a.petals, b.petals);
    }

    #[test]
    fn test_generator_memoizes() {
        let config = Preset::ClassicRose.config();
        let mut generator = FlowerGenerator::new();

        let a = generator.generate(&config, Seed::new(7)).unwrap();
        let b = generator.generate(&config, Seed::new(7)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let c = generator.generate(&config, Seed::new(8)).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(Arc::ptr_eq(&a.pool, &c.pool));
        assert_eq!(generator.cached_flowers(), 2);
        assert_eq!(generator.cached_pools(), 1);
    }

    #[test]
    fn test_clear_drops_cached_entries() {
        let config = Preset::BudRose.config();
        let mut generator = FlowerGenerator::new();
        let before = generator.generate(&config, Seed::new(4)).unwrap();

        generator.clear();
        assert_eq!(generator.cached_flowers(), 0);
        assert_eq!(generator.cached_pools(), 0);

        let after = generator.generate(&config, Seed::new(4)).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!Arc::ptr_eq(&before.pool, &after.pool));
        assert_eq!(before.petals, after.petals);
        assert_eq!(generator.cached_flowers(), 1);
    }

    #[test]
    fn test_memoized_matches_direct() {
        let config = Preset::Tulip.config();
        let mut generator = FlowerGenerator::new();
        let cached = generator.generate(&config, Seed::new(5)).unwrap();
        let direct = generate(&config, Seed::new(5));
        assert_eq!(cached.petals, direct.petals);
    }

    #[test]
    fn test_summary_counts() {
        let config = Preset::GardenRose.config();
        let flower = generate(&config, Seed::new(3));
        let summary = flower.summary();
        assert_eq!(summary.petal_count, 3 + 5 + 7 + 9 + 11);
        assert_eq!(summary.leaf_count, 2);
        assert_eq!(summary.thorn_count, 12);
        assert!(serde_json::to_string(&summary).is_ok());
    }

    #[test]
    fn test_assemble_mesh_includes_every_part() {
        let config = Preset::Tulip.config();
        let flower = generate(&config, Seed::new(9));
        let mesh = flower.assemble_mesh();

        let petal_vertices: usize = flower
            .petals
            .iter()
            .map(|p| flower.pool.geometry(p.geometry_variant_id).vertex_count())
            .sum();
        let leaf_vertices = flower.pool.leaf_geometry().vertex_count() * 2;
        let stem_vertices = flower.stem_mesh().unwrap().vertex_count();

        assert_eq!(mesh.vertex_count(), petal_vertices + leaf_vertices + stem_vertices);
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_flower_without_stem() {
        let config = FlowerConfig { stem: None, ..Preset::ClassicRose.config() };
        let flower = generate(&config, Seed::new(0));
        assert!(flower.organs().is_empty());
        assert!(flower.stem_mesh().is_none());
        assert!(flower.assemble_mesh().vertex_count() > 0);
    }
}
