//! Petal outlines, deformation and blueprints

mod blueprint;
mod deform;
mod shape;

pub use blueprint::PetalBlueprint;
pub use deform::{deform, variant_phase, DeformParams, PetalDeformer};
pub use shape::{generate_leaf_profile, generate_profile, CubicBezier, PetalProfile, PetalShapeFactory};
