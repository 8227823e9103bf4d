//! Mesh generation and modification

mod combine;
mod export;
mod modifiers;
mod primitives;
mod types;

pub use combine::{combine, combine_transformed};
pub use export::{write_obj, write_obj_to};
pub use modifiers::{MeshApply, MeshModifier, RecomputeNormals, Recenter, Transform};
pub use primitives::{extrude_outline, generate_cone, ExtrudeParams};
pub use types::{MeshBuilder, UnpackedMesh};
