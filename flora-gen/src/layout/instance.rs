//! Petal instance records

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One placed petal
///
/// Instances are produced in a single batch and never mutated afterwards;
/// animation composes offsets on top (see `crate::animation`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalInstance {
    pub position: Vec3,
    /// Unit quaternion rotating the canonical +Y petal into place
    pub orientation: Quat,
    pub scale: f32,
    /// Index into `ResourcePool` geometries
    pub geometry_variant_id: u32,
    /// Index into `ResourcePool` materials
    pub material_variant_id: u32,
    /// 0 = upright bud, 1 = flat bloom
    pub openness: f32,
    /// Petal layer the geometry was drawn from
    pub layer: u32,
}

impl PetalInstance {
    /// Model matrix: scale, then rotate, then translate
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }

    /// Direction the petal grows in, in flower space
    pub fn direction(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }
}
