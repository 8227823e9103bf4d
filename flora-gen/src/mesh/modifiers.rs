//! Mesh modifiers
//!
//! Modifiers operate on `UnpackedMesh` in place. The petal deformer is one of
//! them; the rest handle transforms, recentering and normal recomputation.
//!
//! # Fluent API
//!
//! Use the `MeshApply` extension trait for method chaining:
//! ```no_run
//! use flora_gen::mesh::*;
//!
//! let mut mesh: UnpackedMesh = generate_cone(0.05, 0.2, 8);
//! mesh.apply(Transform::scale(1.0, 1.2, 0.8))
//!     .apply(Recenter)
//!     .apply(RecomputeNormals);
//! ```

use glam::{Mat4, Vec3};

use super::types::UnpackedMesh;

/// Trait for mesh modifiers
pub trait MeshModifier {
    /// Apply this modifier to a mesh, modifying it in place
    fn apply(&self, mesh: &mut UnpackedMesh);
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for UnpackedMesh {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Transform mesh vertices and normals using a 4x4 matrix
///
/// Normals are transformed using the inverse-transpose to handle non-uniform
/// scaling correctly.
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    /// Create a translation transform
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_translation(Vec3::new(x, y, z)),
        }
    }

    /// Create a non-uniform scale transform
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_scale(Vec3::new(x, y, z)),
        }
    }

    /// Create a transform from a custom 4x4 matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }
}

impl MeshModifier for Transform {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let normal_matrix = self.matrix.inverse().transpose();

        for pos in &mut mesh.positions {
            *pos = self.matrix.transform_point3(Vec3::from(*pos)).to_array();
        }

        for norm in &mut mesh.normals {
            let n = normal_matrix.transform_vector3(Vec3::from(*norm));
            *norm = n.try_normalize().unwrap_or(Vec3::Z).to_array();
        }
    }
}

/// Recalculate vertex normals from face normals
///
/// Face normals are accumulated unnormalized so larger triangles weigh more.
/// Vertices with no usable adjacent face keep a `+Z` normal rather than NaN.
pub struct RecomputeNormals;

impl MeshModifier for RecomputeNormals {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let mut accumulated = vec![Vec3::ZERO; mesh.positions.len()];

        for tri in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = Vec3::from(mesh.positions[i0]);
            let p1 = Vec3::from(mesh.positions[i1]);
            let p2 = Vec3::from(mesh.positions[i2]);

            let face = (p1 - p0).cross(p2 - p0);
            if !face.is_finite() {
                continue;
            }
            accumulated[i0] += face;
            accumulated[i1] += face;
            accumulated[i2] += face;
        }

        mesh.normals = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z).to_array())
            .collect();
    }
}

/// Translate a mesh so its lowest point sits at y = 0 and the x/z centroid
/// of its vertices sits on the y axis
pub struct Recenter;

impl MeshModifier for Recenter {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let Some((min, _)) = mesh.bounds() else {
            return;
        };

        let count = mesh.positions.len() as f32;
        let (sum_x, sum_z) = mesh
            .positions
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sz), p| (sx + p[0], sz + p[2]));
        let offset = Vec3::new(-sum_x / count, -min.y, -sum_z / count);

        for pos in &mut mesh.positions {
            *pos = (Vec3::from(*pos) + offset).to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{generate_cone, MeshBuilder};

    fn quad() -> UnpackedMesh {
        let mut mesh = UnpackedMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO);
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_transform_scale() {
        let mut mesh = quad();
        Transform::scale(2.0, 2.0, 2.0).apply(&mut mesh);

        let max_x = mesh.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        assert!((max_x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_translate() {
        let mut mesh = quad();
        Transform::translate(5.0, 0.0, 0.0).apply(&mut mesh);

        let avg_x: f32 = mesh.positions.iter().map(|p| p[0]).sum::<f32>() / mesh.positions.len() as f32;
        assert!((avg_x - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_recompute_normals_flat_quad() {
        let mut mesh = quad();
        RecomputeNormals.apply(&mut mesh);

        for n in &mesh.normals {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_recompute_normals_degenerate_triangle_is_finite() {
        let mut mesh = UnpackedMesh::new();
        for _ in 0..3 {
            mesh.add_vertex(Vec3::ONE, Vec3::ZERO);
        }
        mesh.add_triangle(0, 1, 2);
        RecomputeNormals.apply(&mut mesh);

        assert!(mesh.is_finite());
    }

    #[test]
    fn test_recenter_moves_base_to_origin() {
        let mut mesh = quad();
        Transform::translate(3.0, 2.0, -1.0).apply(&mut mesh);
        Recenter.apply(&mut mesh);

        let (min, _) = mesh.bounds().unwrap();
        assert!(min.y.abs() < 1e-6);
        let avg_x: f32 = mesh.positions.iter().map(|p| p[0]).sum::<f32>() / 4.0;
        let avg_z: f32 = mesh.positions.iter().map(|p| p[2]).sum::<f32>() / 4.0;
        assert!(avg_x.abs() < 1e-6);
        assert!(avg_z.abs() < 1e-6);
    }

    #[test]
    fn test_fluent_apply_chaining() {
        let mut mesh: UnpackedMesh = generate_cone(0.1, 0.5, 6);
        let vertex_count = mesh.vertex_count();

        mesh.apply(Transform::scale(2.0, 1.0, 2.0))
            .apply(Recenter)
            .apply(RecomputeNormals);

        assert_eq!(mesh.vertex_count(), vertex_count);
        assert!(mesh.is_finite());
    }
}
