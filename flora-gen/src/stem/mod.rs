//! Stem curve, frame table and organ placement

mod curve;
mod frames;
mod organs;

pub use curve::{StemCurve, CATMULL_ROM_TENSION};
pub use frames::{FrenetFrame, StemFrames};
pub use organs::{
    attach_organ, attach_organ_at_azimuth, LeafSpec, OrganAttachment, OrganKind, OrganPose, OrganReach,
    ResolvedOrgan, Stem, StemConfig, ThornSpec,
};
