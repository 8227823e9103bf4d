//! Procedural flower geometry
//!
//! Builds roses and tulips from data: petal outlines are extruded and bent
//! into curved petals, placed by a whorl or golden-angle spiral layout, and
//! set on a spline stem carrying leaves and thorns.
//!
//! # Example
//! ```no_run
//! use flora_gen::prelude::*;
//!
//! let config = Preset::SpiralRose.config();
//! let flower = generate(&config, Seed::new(42));
//!
//! for petal in &flower.petals {
//!     let mesh = flower.pool.geometry(petal.geometry_variant_id);
//!     let material = flower.pool.material(petal.material_variant_id);
//!     println!("{} vertices, color {:?}", mesh.vertex_count(), material.base_color);
//! }
//!
//! // Or bake everything into one mesh and write it out
//! write_obj(&flower.assemble_mesh(), "rose.obj".as_ref(), "rose")?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod mesh;
pub mod petal;
pub mod pool;
pub mod presets;
pub mod rng;
pub mod stem;

pub mod prelude {
    pub use crate::animation::{organ_sway, sway, SwayParams, TransformDelta};
    pub use crate::config::{FlowerConfig, MaterialPalette, OrganStyle, PetalStyleConfig};
    pub use crate::error::FloraError;
    pub use crate::generator::{generate, generate_with_pool, Flower, FlowerGenerator};
    pub use crate::layout::{LayoutConfig, PetalInstance, SpiralSpec, WhorlLayoutConfig, WhorlSpec};
    pub use crate::mesh::{write_obj, UnpackedMesh};
    pub use crate::pool::{PetalMaterial, ResourcePool};
    pub use crate::presets::Preset;
    pub use crate::rng::{PseudoRandomSource, Seed};
    pub use crate::stem::{OrganAttachment, OrganKind, StemConfig};
}
