//! Mesh types
//!
//! Shared f32 mesh representation used by every generator and modifier.

use glam::{Vec2, Vec3};

/// Trait for mesh construction
///
/// Generators are written against this trait so they stay independent of the
/// concrete storage.
pub trait MeshBuilder: Default {
    /// Add a vertex with position and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32;

    /// Add a vertex with position, UV coordinates, and normal, returning its index
    fn add_vertex_uv(&mut self, position: Vec3, uv: Vec2, normal: Vec3) -> u32;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);
}

/// Unpacked mesh data (f32 format)
///
/// Petal, leaf, thorn and stem geometry all live in this form. Indices are
/// `u32` because an assembled flower easily exceeds 65k vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnpackedMesh {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// UV coordinates as [u, v] (empty if no UVs)
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl UnpackedMesh {
    /// Create empty unpacked mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(*self.positions.first()?);
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            let p = Vec3::from(*p);
            (lo.min(p), hi.max(p))
        }))
    }

    /// True when every position and normal component is finite
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.normals.iter())
            .all(|v| v.iter().all(|c| c.is_finite()))
    }
}

impl MeshBuilder for UnpackedMesh {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    fn add_vertex_uv(&mut self, position: Vec3, uv: Vec2, normal: Vec3) -> u32 {
        let index = self.add_vertex(position, normal);
        self.uvs.push(uv.to_array());
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }
}
