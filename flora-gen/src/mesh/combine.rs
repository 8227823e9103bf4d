//! Mesh combining utilities
//!
//! Functions for merging multiple meshes into a single mesh.

use glam::Mat4;

use super::modifiers::{MeshModifier, Transform};
use super::types::UnpackedMesh;

/// Combine multiple meshes into one
///
/// Merges meshes by concatenating their vertex and index data, offsetting
/// indices as it goes. If any mesh has UVs the output has UVs (meshes without
/// UVs get zero UVs).
pub fn combine(meshes: &[&UnpackedMesh]) -> UnpackedMesh {
    let mut result = UnpackedMesh::new();

    let total_vertices: usize = meshes.iter().map(|m| m.positions.len()).sum();
    let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();
    let has_any_uvs = meshes.iter().any(|m| !m.uvs.is_empty());

    result.positions.reserve(total_vertices);
    result.normals.reserve(total_vertices);
    result.indices.reserve(total_indices);
    if has_any_uvs {
        result.uvs.reserve(total_vertices);
    }

    for mesh in meshes {
        if mesh.positions.is_empty() {
            continue;
        }

        let vertex_offset = result.positions.len() as u32;

        result.positions.extend_from_slice(&mesh.positions);
        result.normals.extend_from_slice(&mesh.normals);

        if has_any_uvs {
            if mesh.uvs.len() == mesh.positions.len() {
                result.uvs.extend_from_slice(&mesh.uvs);
            } else {
                result.uvs.resize(result.positions.len(), [0.0, 0.0]);
            }
        }

        result
            .indices
            .extend(mesh.indices.iter().map(|&idx| vertex_offset + idx));
    }

    result
}

/// Combine multiple meshes with per-mesh transforms
///
/// Applies a transformation matrix to each mesh before combining them. This is
/// how a flower is assembled from its shared petal variants.
pub fn combine_transformed(meshes: &[(&UnpackedMesh, Mat4)]) -> UnpackedMesh {
    let transformed_meshes: Vec<UnpackedMesh> = meshes
        .iter()
        .map(|(mesh, matrix)| {
            let mut transformed = (*mesh).clone();
            Transform::from_matrix(*matrix).apply(&mut transformed);
            transformed
        })
        .collect();

    let mesh_refs: Vec<&UnpackedMesh> = transformed_meshes.iter().collect();
    combine(&mesh_refs)
}
