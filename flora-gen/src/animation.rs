//! Per-frame sway and breathing
//!
//! Pure functions of `(instance, elapsed)`. A scheduler calls them every
//! tick and composes the returned delta on top of the static layout; the
//! instance lists themselves are never written.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::layout::PetalInstance;
use crate::stem::{OrganKind, ResolvedOrgan};

/// Phase step between consecutive petal indices
const INDEX_PHASE_STEP: f32 = 0.618_034 * TAU;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwayParams {
    /// Peak sway angle in radians for a fully open petal
    pub amplitude: f32,
    /// Sway cycles per second
    pub frequency: f32,
    /// Relative scale pulse for a fully open petal
    pub breathing: f32,
    /// Vertical bob in model units
    pub lift: f32,
    /// Leaf sway relative to petal sway
    pub leaf_factor: f32,
}

impl Default for SwayParams {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            frequency: 0.4,
            breathing: 0.015,
            lift: 0.002,
            leaf_factor: 1.5,
        }
    }
}

/// Offset composed onto a base placement
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    pub translation: Vec3,
    /// Applied in world space, after the base orientation
    pub rotation: Quat,
    /// Multiplies the base scale
    pub scale: f32,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformDelta {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Model matrix of `(position, orientation, scale)` with this delta on top
    pub fn apply_to(&self, position: Vec3, orientation: Quat, scale: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(scale * self.scale),
            (self.rotation * orientation).normalize(),
            position + self.translation,
        )
    }

    pub fn apply_to_petal(&self, petal: &PetalInstance) -> Mat4 {
        self.apply_to(petal.position, petal.orientation, petal.scale)
    }

    pub fn apply_to_organ(&self, organ: &ResolvedOrgan) -> Mat4 {
        self.apply_to(organ.pose.position, organ.pose.orientation, organ.attachment.scale)
    }
}

fn finite_time(elapsed: f32) -> Option<f32> {
    elapsed.is_finite().then_some(elapsed)
}

/// Sway of petal `index` at `elapsed` seconds
///
/// Open petals swing further and breathe more than closed ones. The sway
/// axis is horizontal and perpendicular to the petal's growth direction, so
/// petals rock toward and away from the flower axis.
pub fn sway(petal: &PetalInstance, index: usize, elapsed: f32, params: &SwayParams) -> TransformDelta {
    let Some(elapsed) = finite_time(elapsed) else {
        return TransformDelta::IDENTITY;
    };
    let openness = petal.openness.clamp(0.0, 1.0);
    let phase = (index as f32 * INDEX_PHASE_STEP).rem_euclid(TAU);
    let w = TAU * params.frequency * elapsed + phase;

    let axis = Vec3::Y
        .cross(petal.direction())
        .try_normalize()
        .unwrap_or(Vec3::X);
    let angle = params.amplitude * (0.3 + 0.7 * openness) * w.sin();

    TransformDelta {
        translation: Vec3::Y * params.lift * (w * 0.5).sin(),
        rotation: Quat::from_axis_angle(axis, angle),
        scale: 1.0 + params.breathing * openness * (w * 0.5).cos(),
    }
}

/// Sway of a stem organ at `elapsed` seconds
///
/// Leaves flutter about their own width axis with their stored phase;
/// thorns are rigid.
pub fn organ_sway(organ: &ResolvedOrgan, elapsed: f32, params: &SwayParams) -> TransformDelta {
    let Some(elapsed) = finite_time(elapsed) else {
        return TransformDelta::IDENTITY;
    };
    if organ.attachment.kind == OrganKind::Thorn {
        return TransformDelta::IDENTITY;
    }

    let w = TAU * params.frequency * elapsed + organ.attachment.phase;
    let axis = (organ.pose.orientation * Vec3::X).try_normalize().unwrap_or(Vec3::X);
    let angle = params.amplitude * params.leaf_factor * w.sin();

    TransformDelta {
        rotation: Quat::from_axis_angle(axis, angle),
        ..TransformDelta::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stem::{OrganAttachment, OrganPose};

    fn petal(openness: f32) -> PetalInstance {
        PetalInstance {
            position: Vec3::new(0.1, 0.0, 0.0),
            orientation: Quat::from_rotation_z(-0.5),
            scale: 1.0,
            geometry_variant_id: 0,
            material_variant_id: 0,
            openness,
            layer: 0,
        }
    }

    fn organ(kind: OrganKind) -> ResolvedOrgan {
        ResolvedOrgan {
            attachment: OrganAttachment {
                kind,
                t: 0.5,
                side_sign: 1.0,
                azimuth: 0.0,
                roll_angle: 0.0,
                scale: 1.0,
                phase: 0.3,
            },
            pose: OrganPose { position: Vec3::ZERO, orientation: Quat::IDENTITY },
        }
    }

    #[test]
    fn test_sway_is_pure() {
        let p = petal(0.5);
        let params = SwayParams::default();
        assert_eq!(sway(&p, 3, 1.25, &params), sway(&p, 3, 1.25, &params));
        assert_eq!(p, petal(0.5));
    }

    #[test]
    fn test_open_petals_sway_more() {
        let params = SwayParams::default();
        let angle = |openness: f32| {
            (0..50)
                .map(|i| sway(&petal(openness), 0, i as f32 * 0.1, &params).rotation.to_axis_angle().1)
                .fold(0.0f32, f32::max)
        };
        assert!(angle(1.0) > angle(0.0));
    }

    #[test]
    fn test_delta_rotation_is_unit() {
        let params = SwayParams::default();
        for i in 0..20 {
            let d = sway(&petal(0.8), i, i as f32 * 0.37, &params);
            assert!((d.rotation.length() - 1.0).abs() < 1e-6);
            assert!(d.scale > 0.0);
        }
    }

    #[test]
    fn test_non_finite_time_is_identity() {
        let params = SwayParams::default();
        assert_eq!(sway(&petal(1.0), 0, f32::NAN, &params), TransformDelta::IDENTITY);
        assert_eq!(organ_sway(&organ(OrganKind::Leaf), f32::INFINITY, &params), TransformDelta::IDENTITY);
    }

    #[test]
    fn test_thorns_do_not_move() {
        let params = SwayParams::default();
        assert_eq!(organ_sway(&organ(OrganKind::Thorn), 2.0, &params), TransformDelta::IDENTITY);
        assert_ne!(organ_sway(&organ(OrganKind::Leaf), 2.0, &params), TransformDelta::IDENTITY);
    }

    #[test]
    fn test_identity_delta_reproduces_model_matrix() {
        let p = petal(0.4);
        let m = TransformDelta::IDENTITY.apply_to_petal(&p);
        assert!(m.abs_diff_eq(p.model_matrix(), 1e-6));
    }
}
