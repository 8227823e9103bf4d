//! Flower configuration
//!
//! A `FlowerConfig` is plain data: layout, petal style, palette and an
//! optional stem. It round-trips through TOML so presets can be dumped,
//! tweaked and loaded back.
//!
//! ```toml
//! name = "my-rose"
//!
//! [layout]
//! kind = "spiral"
//! total_petals = 60
//!
//! [style]
//! variants_per_layer = 3
//!
//! [[style.layers]]
//! cup = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FloraError;
use crate::layout::LayoutConfig;
use crate::mesh::ExtrudeParams;
use crate::petal::{variant_phase, DeformParams};
use crate::stem::StemConfig;

/// Per-layer petal deformation and tessellation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetalStyleConfig {
    /// Deformation per layer, innermost first
    pub layers: Vec<DeformParams>,
    pub extrude: ExtrudeParams,
    /// Geometry variants built per layer
    pub variants_per_layer: u32,
    /// Outline samples per Bezier segment
    pub outline_resolution: u32,
    /// Concentric cap rings
    pub rings: u32,
    /// Relative per-variant perturbation of cup, curl and twist
    pub variant_spread: f32,
}

impl Default for PetalStyleConfig {
    fn default() -> Self {
        Self {
            layers: vec![
                DeformParams { cup: 0.22, backward_curl: 0.0, edge_curl: 0.02, ruffle: 0.004, base_pinch: 0.5, twist: 0.15, tip_fold: 0.0 },
                DeformParams { cup: 0.16, backward_curl: 0.08, edge_curl: 0.04, ruffle: 0.008, base_pinch: 0.4, twist: 0.1, tip_fold: 0.1 },
                DeformParams { cup: 0.1, backward_curl: 0.25, edge_curl: 0.06, ruffle: 0.012, base_pinch: 0.3, twist: 0.05, tip_fold: 0.3 },
            ],
            extrude: ExtrudeParams::default(),
            variants_per_layer: 3,
            outline_resolution: 6,
            rings: 4,
            variant_spread: 0.1,
        }
    }
}

impl PetalStyleConfig {
    /// Number of layers, at least one
    pub fn layer_count(&self) -> usize {
        self.layers.len().max(1)
    }

    /// Deformation for a layer, clamping the index into range
    pub fn layer_params(&self, layer: usize) -> DeformParams {
        match self.layers.len() {
            0 => DeformParams::default(),
            n => self.layers[layer.min(n - 1)],
        }
    }

    /// Deformation for one variant of a layer
    ///
    /// Variants wobble cup, backward curl and twist around the layer values
    /// by at most `variant_spread`, on top of the ruffle phase the deformer
    /// derives from the variant seed.
    pub fn variant_params(&self, layer: usize, variant: u32) -> DeformParams {
        let base = self.layer_params(layer);
        let spread = if self.variant_spread.is_finite() { self.variant_spread.clamp(0.0, 0.5) } else { 0.0 };
        let phase = variant_phase(variant.wrapping_mul(7).wrapping_add(layer as u32));
        DeformParams {
            cup: base.cup * (1.0 + spread * phase.sin()),
            backward_curl: base.backward_curl * (1.0 + spread * phase.cos()),
            twist: base.twist + spread * (2.0 * phase).sin() * 0.5,
            ..base
        }
    }
}

/// Petal material palette, interpolated from inner (dark) to outer (light)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPalette {
    /// Linear RGB of the innermost, darkest variant
    pub inner: [f32; 3],
    /// Linear RGB of the outermost, lightest variant
    pub outer: [f32; 3],
    /// Linear RGB blended into petal rims
    pub edge_tint: [f32; 3],
    pub count: u32,
    pub roughness: f32,
    pub sheen: f32,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            inner: [0.35, 0.02, 0.05],
            outer: [0.85, 0.12, 0.18],
            edge_tint: [0.95, 0.75, 0.75],
            count: 6,
            roughness: 0.55,
            sheen: 0.4,
        }
    }
}

/// Leaf and thorn geometry parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganStyle {
    pub leaf_width: f32,
    pub leaf_length: f32,
    pub leaf_deform: DeformParams,
    pub thorn_radius: f32,
    pub thorn_height: f32,
}

impl Default for OrganStyle {
    fn default() -> Self {
        Self {
            leaf_width: 0.09,
            leaf_length: 0.2,
            leaf_deform: DeformParams {
                cup: 0.03,
                backward_curl: 0.05,
                edge_curl: 0.01,
                ruffle: 0.004,
                base_pinch: 0.6,
                twist: 0.2,
                tip_fold: 0.0,
            },
            thorn_radius: 0.008,
            thorn_height: 0.025,
        }
    }
}

/// Complete description of one flower
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub name: String,
    pub layout: LayoutConfig,
    pub style: PetalStyleConfig,
    pub palette: MaterialPalette,
    pub organs: OrganStyle,
    pub stem: Option<StemConfig>,
}

impl FlowerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, FloraError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, FloraError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, FloraError> {
        let text = std::fs::read_to_string(path).map_err(|source| FloraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Stable fingerprint of the whole config
    pub fn fingerprint(&self) -> Result<u64, FloraError> {
        fingerprint(self)
    }

    /// Fingerprint of the parts the resource pool is built from
    pub fn pool_fingerprint(&self) -> Result<u64, FloraError> {
        fingerprint(&(&self.style, &self.palette, &self.organs))
    }
}

fn fingerprint<T: Serialize>(value: &T) -> Result<u64, FloraError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(xxhash_rust::xxh3::xxh3_64(&bytes))
}
