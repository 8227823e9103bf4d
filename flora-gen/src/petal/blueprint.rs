//! Petal blueprints: one immutable recipe per (layer, variant)

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::deform::{DeformParams, PetalDeformer};
use super::shape::PetalProfile;
use crate::mesh::{extrude_outline, ExtrudeParams, MeshModifier, UnpackedMesh};

/// Everything needed to rebuild one petal geometry variant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalBlueprint {
    pub layer: u32,
    pub variant: u32,
    pub profile: Arc<PetalProfile>,
    pub deform: DeformParams,
    pub extrude: ExtrudeParams,
}

impl PetalBlueprint {
    /// Seed feeding the deformer's ruffle phase
    pub fn variant_seed(&self) -> u32 {
        self.layer.wrapping_mul(101).wrapping_add(self.variant)
    }

    /// Sample, extrude and deform the outline
    pub fn build_geometry(&self, points_per_segment: u32, rings: u32) -> UnpackedMesh {
        let outline = self.profile.sample(points_per_segment);
        let mut mesh: UnpackedMesh = extrude_outline(&outline, self.extrude, rings);
        PetalDeformer::new(self.deform, self.variant_seed()).apply(&mut mesh);
        mesh
    }
}
