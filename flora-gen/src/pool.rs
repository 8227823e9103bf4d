//! Immutable cache of petal geometry, materials and organ meshes
//!
//! Built once per style and shared behind an `Arc`. Instance records only
//! carry integer ids into the pool; every id accessor clamps, so a stale or
//! out-of-range id resolves to the nearest valid entry instead of failing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{MaterialPalette, OrganStyle, PetalStyleConfig};
use crate::mesh::{extrude_outline, generate_cone, UnpackedMesh};
use crate::petal::{deform, generate_leaf_profile, PetalBlueprint, PetalProfile, PetalShapeFactory};

/// Segments around a thorn cone
const THORN_SEGMENTS: u32 = 6;

/// Surface parameters of one petal material variant
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalMaterial {
    /// Linear RGB
    pub base_color: [f32; 3],
    /// Linear RGB blended toward the rim
    pub edge_color: [f32; 3],
    /// 0.0 = mirror, 1.0 = rough
    pub roughness: f32,
    /// Velvet sheen strength
    pub sheen: f32,
}

impl MaterialPalette {
    /// Build `count` materials ordered dark (inner) to light (outer)
    pub fn materials(&self) -> Vec<PetalMaterial> {
        let count = if self.count == 0 {
            warn!("MaterialPalette: count must be >= 1, clamping to 1");
            1
        } else {
            self.count
        };
        let roughness = if self.roughness.is_finite() { self.roughness.clamp(0.0, 1.0) } else { 0.5 };
        let sheen = if self.sheen.is_finite() { self.sheen.clamp(0.0, 1.0) } else { 0.0 };

        (0..count)
            .map(|i| {
                let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
                let base_color = mix(self.inner, self.outer, t);
                PetalMaterial {
                    base_color,
                    edge_color: mix(base_color, self.edge_tint, 0.5),
                    // Outer petals are thinner and catch more light.
                    roughness: (roughness * (1.0 - 0.2 * t)).clamp(0.0, 1.0),
                    sheen,
                }
            })
            .collect()
    }
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let lerp = |x: f32, y: f32| {
        let v = x + (y - x) * t;
        if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
    };
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}

/// Shared, read-only resources referenced by id from instances
#[derive(Debug)]
pub struct ResourcePool {
    layer_count: u32,
    variants_per_layer: u32,
    profiles: Vec<Arc<PetalProfile>>,
    blueprints: Vec<PetalBlueprint>,
    geometries: Vec<Arc<UnpackedMesh>>,
    materials: Vec<PetalMaterial>,
    leaf: Arc<UnpackedMesh>,
    thorn: Arc<UnpackedMesh>,
}

impl ResourcePool {
    /// Build every petal variant, material and organ mesh for a style
    pub fn build(style: &PetalStyleConfig, palette: &MaterialPalette, organs: &OrganStyle) -> Self {
        let layer_count = style.layer_count();
        let variants_per_layer = if style.variants_per_layer == 0 {
            warn!("PetalStyleConfig: variants_per_layer must be >= 1, clamping to 1");
            1
        } else {
            style.variants_per_layer
        };
        let resolution = style.outline_resolution.max(1);

        let mut factory = PetalShapeFactory::new(layer_count);
        let profiles: Vec<_> = (0..layer_count).map(|layer| factory.profile(layer)).collect();

        let mut blueprints = Vec::with_capacity(layer_count * variants_per_layer as usize);
        for (layer, profile) in profiles.iter().enumerate() {
            for variant in 0..variants_per_layer {
                blueprints.push(PetalBlueprint {
                    layer: layer as u32,
                    variant,
                    profile: Arc::clone(profile),
                    deform: style.variant_params(layer, variant),
                    extrude: style.extrude,
                });
            }
        }

        let geometries: Vec<_> = blueprints
            .iter()
            .map(|bp| Arc::new(bp.build_geometry(resolution, style.rings)))
            .collect();

        let materials = palette.materials();
        let leaf = Arc::new(build_leaf(organs, style, resolution));
        let thorn = Arc::new(generate_cone::<UnpackedMesh>(
            organs.thorn_radius,
            organs.thorn_height,
            THORN_SEGMENTS,
        ));

        let vertices: usize = geometries.iter().map(|g| g.vertex_count()).sum();
        debug!(
            "Petal geometry: {} layers x {} variants, {} vertices",
            layer_count, variants_per_layer, vertices
        );
        info!(
            "Built resource pool: {} geometries, {} materials",
            geometries.len(),
            materials.len()
        );

        Self {
            layer_count: layer_count as u32,
            variants_per_layer,
            profiles,
            blueprints,
            geometries,
            materials,
            leaf,
            thorn,
        }
    }

    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    pub fn variants_per_layer(&self) -> u32 {
        self.variants_per_layer
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn clamp_layer(&self, layer: u32) -> u32 {
        layer.min(self.layer_count - 1)
    }

    /// Geometry id of `(layer, variant)`, both clamped into range
    pub fn geometry_id(&self, layer: u32, variant: u32) -> u32 {
        let layer = self.clamp_layer(layer);
        let variant = variant.min(self.variants_per_layer - 1);
        layer * self.variants_per_layer + variant
    }

    /// Clamp into `[0, geometry_count)`
    pub fn clamp_geometry_id(&self, id: u32) -> u32 {
        clamp_id(id, self.geometries.len(), "geometry")
    }

    /// Clamp into `[0, material_count)`
    pub fn clamp_material_id(&self, id: u32) -> u32 {
        clamp_id(id, self.materials.len(), "material")
    }

    pub fn geometry(&self, id: u32) -> &Arc<UnpackedMesh> {
        &self.geometries[self.clamp_geometry_id(id) as usize]
    }

    pub fn blueprint(&self, id: u32) -> &PetalBlueprint {
        &self.blueprints[self.clamp_geometry_id(id) as usize]
    }

    pub fn material(&self, id: u32) -> &PetalMaterial {
        &self.materials[self.clamp_material_id(id) as usize]
    }

    pub fn materials(&self) -> &[PetalMaterial] {
        &self.materials
    }

    pub fn profile(&self, layer: u32) -> &Arc<PetalProfile> {
        &self.profiles[self.clamp_layer(layer) as usize]
    }

    pub fn leaf_geometry(&self) -> &Arc<UnpackedMesh> {
        &self.leaf
    }

    pub fn thorn_geometry(&self) -> &Arc<UnpackedMesh> {
        &self.thorn
    }
}

fn clamp_id(id: u32, len: usize, what: &str) -> u32 {
    let last = len.saturating_sub(1) as u32;
    if id > last {
        warn!("{} id {} out of range, clamping to {}", what, id, last);
        last
    } else {
        id
    }
}

fn build_leaf(organs: &OrganStyle, style: &PetalStyleConfig, resolution: u32) -> UnpackedMesh {
    let outline = generate_leaf_profile(organs.leaf_width, organs.leaf_length).sample(resolution);
    let slab: UnpackedMesh = extrude_outline(&outline, style.extrude, style.rings);
    deform(&slab, &organs.leaf_deform, 0)
}
