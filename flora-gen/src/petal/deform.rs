//! Petal surface deformation
//!
//! Bends a flat extruded outline into a curved petal. All displacement is a
//! function of two per-vertex coordinates taken from the undeformed mesh:
//!
//! - `y01`: height along the petal, 0 at the base and 1 at the tip
//! - `edge`: `|x| / half_width`, 0 on the midrib and 1 at the rim
//!
//! Steps run in a fixed order: base pinch, then the z terms (cup, edge curl,
//! backward curl, ruffle) summed together, then the twist. The twist must
//! come last so it spirals the already cupped surface.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::mesh::{MeshModifier, RecomputeNormals, Recenter, UnpackedMesh};

/// Fraction of the height over which the base pinch fades out
const PINCH_THRESHOLD: f32 = 0.25;
/// Half-periods of the cup sine along the petal
const CUP_FREQUENCY: f32 = 1.0;
/// Exponent shaping how sharply the rim curls
const EDGE_CURL_POWER: f32 = 2.2;
/// Edge curl fades in between these heights
const EDGE_ENVELOPE_START: f32 = 0.1;
const EDGE_ENVELOPE_END: f32 = 0.8;
/// Height above which the tip starts folding backward
const BACKWARD_THRESHOLD: f32 = 0.45;
/// Ruffle wave frequency along the height
const RUFFLE_FREQ_Y: f32 = 9.0;
/// Ruffle wave frequency across the width
const RUFFLE_FREQ_EDGE: f32 = 5.0;
/// Ruffle amplitude growth toward the tip
const RUFFLE_POWER: f32 = 1.5;
/// Height around which the twist pivots
const TWIST_PIVOT: f32 = 0.3;
/// Golden ratio conjugate, used to scatter variant phases
const PHASE_SCATTER: f64 = 0.618_033_988_749_895;

/// Deformation parameters for one petal layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformParams {
    /// Depth of the inward bowl along the midrib
    pub cup: f32,
    /// Backward fold of the upper petal
    pub backward_curl: f32,
    /// Curl of the lateral edges
    pub edge_curl: f32,
    /// Amplitude of the wavy rim
    pub ruffle: f32,
    /// Narrowing of the attachment, 0 = none, 1 = pinched to a point
    pub base_pinch: f32,
    /// In-plane twist in radians per unit height
    pub twist: f32,
    /// Extra backward fold concentrated on the centerline
    pub tip_fold: f32,
}

impl Default for DeformParams {
    fn default() -> Self {
        Self {
            cup: 0.12,
            backward_curl: 0.1,
            edge_curl: 0.04,
            ruffle: 0.01,
            base_pinch: 0.4,
            twist: 0.1,
            tip_fold: 0.0,
        }
    }
}

impl DeformParams {
    /// Replace non-finite values with zero and clamp the pinch so the base
    /// scale never goes negative
    pub fn sanitized(&self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            cup: finite(self.cup),
            backward_curl: finite(self.backward_curl),
            edge_curl: finite(self.edge_curl),
            ruffle: finite(self.ruffle),
            base_pinch: finite(self.base_pinch).clamp(0.0, 1.0),
            twist: finite(self.twist),
            tip_fold: finite(self.tip_fold).max(0.0),
        }
    }

    /// Interpolate between two parameter sets
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            cup: mix(self.cup, other.cup),
            backward_curl: mix(self.backward_curl, other.backward_curl),
            edge_curl: mix(self.edge_curl, other.edge_curl),
            ruffle: mix(self.ruffle, other.ruffle),
            base_pinch: mix(self.base_pinch, other.base_pinch),
            twist: mix(self.twist, other.twist),
            tip_fold: mix(self.tip_fold, other.tip_fold),
        }
    }
}

/// Phase offset of the ruffle wave for a given variant
///
/// Consecutive variants land far apart on the circle, so copies of one layer
/// read as distinct but regenerate identically.
pub fn variant_phase(variant_seed: u32) -> f32 {
    ((variant_seed as f64 * PHASE_SCATTER).fract() * std::f64::consts::TAU) as f32
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Mesh modifier bending a flat petal slab into a curved petal
///
/// The result is recentred (base at y = 0, x/z centroid on the axis) and its
/// normals are recomputed. Vertex count and order are preserved.
pub struct PetalDeformer {
    pub params: DeformParams,
    pub variant_seed: u32,
}

impl PetalDeformer {
    pub fn new(params: DeformParams, variant_seed: u32) -> Self {
        Self {
            params,
            variant_seed,
        }
    }

    /// Displace a single vertex given its normalized coordinates
    fn displace(&self, p: Vec3, y01: f32, edge: f32, phase: f32) -> Vec3 {
        let params = &self.params;
        let center = 1.0 - edge;
        let mut x = p.x;
        let mut z = p.z;

        // 1. base pinch
        let pinch = (1.0 - (y01 / PINCH_THRESHOLD).min(1.0)) * params.base_pinch;
        x *= 1.0 - pinch;

        // 2-5. z contributions
        let cup_curve = (y01 * PI * CUP_FREQUENCY).sin() * center * params.cup;
        let envelope = smoothstep(EDGE_ENVELOPE_START, EDGE_ENVELOPE_END, y01);
        let edge_curl = edge.powf(EDGE_CURL_POWER) * params.edge_curl * envelope;
        let over = (y01 - BACKWARD_THRESHOLD).max(0.0);
        let backward_curl = over * over * params.backward_curl * (1.0 + params.tip_fold * center);
        let ruffle_wave = (y01 * RUFFLE_FREQ_Y + edge * RUFFLE_FREQ_EDGE + phase).sin()
            * params.ruffle
            * edge
            * y01.powf(RUFFLE_POWER);

        // 6. combine
        z += cup_curve - edge_curl - backward_curl + ruffle_wave;

        // 7. twist
        let angle = (y01 - TWIST_PIVOT) * params.twist;
        let (sin_a, cos_a) = angle.sin_cos();
        let twisted_x = x * cos_a - z * sin_a;
        let twisted_z = x * sin_a + z * cos_a;

        Vec3::new(twisted_x, p.y, twisted_z)
    }
}

impl MeshModifier for PetalDeformer {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let Some((min, max)) = mesh.bounds() else {
            return;
        };

        let height = max.y - min.y;
        let half_width = min.x.abs().max(max.x.abs());
        let phase = variant_phase(self.variant_seed);
        let deformer = Self::new(self.params.sanitized(), self.variant_seed);

        for pos in &mut mesh.positions {
            let p = Vec3::from(*pos);
            let y01 = if height > f32::EPSILON {
                ((p.y - min.y) / height).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let edge = if half_width > f32::EPSILON {
                (p.x.abs() / half_width).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let displaced = deformer.displace(p, y01, edge, phase);
            *pos = if displaced.is_finite() { displaced } else { p }.to_array();
        }

        Recenter.apply(mesh);
        RecomputeNormals.apply(mesh);
    }
}

/// Deform a copy of `base` and return it
pub fn deform(base: &UnpackedMesh, params: &DeformParams, variant_seed: u32) -> UnpackedMesh {
    let mut mesh = base.clone();
    PetalDeformer::new(*params, variant_seed).apply(&mut mesh);
    mesh
}
