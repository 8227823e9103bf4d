//! Leaf and thorn attachment along the stem

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use tracing::warn;

use super::curve::StemCurve;
use super::frames::{FrenetFrame, StemFrames};
use crate::layout::golden_angle;
use crate::mesh::UnpackedMesh;
use crate::rng::PseudoRandomSource;

/// Azimuth jitter for scattered thorns, radians
const THORN_AZIMUTH_JITTER: f32 = 0.35;
/// Fraction of the slot spacing a thorn may wander along the stem
const THORN_T_JITTER: f32 = 0.4;
/// Roll jitter for scattered thorns, radians
const THORN_ROLL_JITTER: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganKind {
    Leaf,
    Thorn,
}

/// How an organ leans away from the stem
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganReach {
    /// Weight of the stem tangent in the organ direction
    pub lean: f32,
    /// Weight of the outward vector in the organ direction
    pub out: f32,
    /// Distance from the curve in multiples of the local stem radius
    pub offset: f32,
}

impl Default for OrganReach {
    fn default() -> Self {
        Self { lean: 0.6, out: 1.0, offset: 1.0 }
    }
}

/// A leaf at a fixed stem position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafSpec {
    pub t: f32,
    /// Positive puts the leaf on the normal side, negative on the opposite side
    pub side: f32,
    pub roll: f32,
    pub scale: f32,
    /// Sway phase for animation
    pub phase: f32,
}

impl Default for LeafSpec {
    fn default() -> Self {
        Self { t: 0.5, side: 1.0, roll: 0.0, scale: 1.0, phase: 0.0 }
    }
}

/// Thorns scattered around the stem between `t_min` and `t_max`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThornSpec {
    pub count: u32,
    pub t_min: f32,
    pub t_max: f32,
    pub scale_min: f32,
    pub scale_max: f32,
}

impl Default for ThornSpec {
    fn default() -> Self {
        Self { count: 8, t_min: 0.05, t_max: 0.8, scale_min: 0.7, scale_max: 1.2 }
    }
}

impl ThornSpec {
    /// Place thorns in evenly spaced slots along the stem, spinning around it
    /// by the golden angle with a little jitter
    pub fn scatter(&self, rng: &mut PseudoRandomSource) -> Vec<OrganAttachment> {
        let finite01 = |v: f32, d: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { d };
        let mut t_min = finite01(self.t_min, 0.0);
        let mut t_max = finite01(self.t_max, 1.0);
        if t_max < t_min {
            warn!("ThornSpec: t_max {} is below t_min {}, swapping", t_max, t_min);
            std::mem::swap(&mut t_min, &mut t_max);
        }
        let scale_min = if self.scale_min.is_finite() { self.scale_min.max(0.01) } else { 1.0 };
        let scale_max = if self.scale_max.is_finite() { self.scale_max.max(scale_min) } else { scale_min };

        let slot = (t_max - t_min) / self.count.max(1) as f32;
        (0..self.count)
            .map(|i| {
                let center = t_min + slot * (i as f32 + 0.5);
                let t = (center + rng.signed() * slot * THORN_T_JITTER).clamp(t_min, t_max);
                let azimuth = (i as f32 * golden_angle() + rng.signed() * THORN_AZIMUTH_JITTER).rem_euclid(TAU);
                OrganAttachment {
                    kind: OrganKind::Thorn,
                    t,
                    side_sign: if azimuth.cos() >= 0.0 { 1.0 } else { -1.0 },
                    azimuth,
                    roll_angle: rng.signed() * THORN_ROLL_JITTER,
                    scale: rng.range(scale_min, scale_max),
                    phase: rng.range(0.0, TAU),
                }
            })
            .collect()
    }
}

/// Stem path, tube shape and organs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemConfig {
    pub control_points: Vec<Vec3>,
    pub tension: f32,
    /// Frames sampled along the curve
    pub samples: usize,
    pub radius: f32,
    /// Fraction the radius shrinks toward the top
    pub taper: f32,
    /// Tube segments around the stem
    pub segments: u32,
    pub leaves: Vec<LeafSpec>,
    pub thorns: ThornSpec,
    pub leaf_reach: OrganReach,
    pub thorn_reach: OrganReach,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self {
            control_points: vec![
                Vec3::new(0.0, -1.2, 0.0),
                Vec3::new(0.03, -0.9, 0.01),
                Vec3::new(-0.02, -0.6, -0.02),
                Vec3::new(0.015, -0.3, 0.01),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            tension: 0.5,
            samples: 48,
            radius: 0.012,
            taper: 0.3,
            segments: 8,
            leaves: vec![
                LeafSpec { t: 0.35, side: 1.0, roll: 0.3, scale: 1.0, phase: 0.0 },
                LeafSpec { t: 0.6, side: -1.0, roll: -0.2, scale: 0.85, phase: 1.7 },
            ],
            thorns: ThornSpec::default(),
            leaf_reach: OrganReach { lean: 0.6, out: 1.0, offset: 1.0 },
            thorn_reach: OrganReach { lean: 0.35, out: 1.0, offset: 0.9 },
        }
    }
}

impl StemConfig {
    pub fn curve(&self) -> StemCurve {
        StemCurve::new(self.control_points.clone(), self.tension)
    }

    /// Tube radius at curve parameter `t`
    pub fn radius_at(&self, t: f32) -> f32 {
        let taper = if self.taper.is_finite() { self.taper.clamp(0.0, 1.0) } else { 0.0 };
        let radius = if self.radius.is_finite() { self.radius.max(0.0) } else { 0.0 };
        radius * (1.0 - taper * t.clamp(0.0, 1.0))
    }

    /// Leaf attachments followed by scattered thorns
    pub fn attachments(&self, rng: &mut PseudoRandomSource) -> Vec<OrganAttachment> {
        let mut organs: Vec<OrganAttachment> = self
            .leaves
            .iter()
            .map(|leaf| {
                let side_sign = if leaf.side < 0.0 { -1.0 } else { 1.0 };
                let finite = |v: f32, d: f32| if v.is_finite() { v } else { d };
                OrganAttachment {
                    kind: OrganKind::Leaf,
                    t: finite(leaf.t, 0.5).clamp(0.0, 1.0),
                    side_sign,
                    azimuth: if side_sign > 0.0 { 0.0 } else { PI },
                    roll_angle: finite(leaf.roll, 0.0),
                    scale: finite(leaf.scale, 1.0).max(0.01),
                    phase: finite(leaf.phase, 0.0),
                }
            })
            .collect();
        organs.extend(self.thorns.scatter(rng));
        organs
    }

    pub fn reach(&self, kind: OrganKind) -> OrganReach {
        match kind {
            OrganKind::Leaf => self.leaf_reach,
            OrganKind::Thorn => self.thorn_reach,
        }
    }
}

/// Where an organ sits on the stem
///
/// Position and orientation are derived on demand from the stem, never
/// stored here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganAttachment {
    pub kind: OrganKind,
    /// Curve parameter in [0, 1]
    pub t: f32,
    /// -1 or 1
    pub side_sign: f32,
    /// Angle around the stem measured from the frame normal toward the binormal
    pub azimuth: f32,
    pub roll_angle: f32,
    pub scale: f32,
    pub phase: f32,
}

/// Resolved placement of an organ
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganPose {
    pub position: Vec3,
    pub orientation: Quat,
}

fn pose_from_outward(point: Vec3, frame: &FrenetFrame, outward: Vec3, roll: f32, reach: OrganReach, offset: f32) -> OrganPose {
    let direction = (frame.tangent * reach.lean + outward * reach.out)
        .try_normalize()
        .unwrap_or(frame.tangent);
    let base = Quat::from_rotation_arc(Vec3::Y, direction);
    let roll = Quat::from_axis_angle(direction, if roll.is_finite() { roll } else { 0.0 });
    OrganPose {
        position: point + outward * offset,
        orientation: (roll * base).normalize(),
    }
}

/// Place an organ on the normal side (`side_sign > 0`) or the opposite side
pub fn attach_organ(
    curve: &StemCurve,
    frames: &StemFrames,
    t: f32,
    side_sign: f32,
    roll_angle: f32,
    reach: OrganReach,
    lateral_offset: f32,
) -> OrganPose {
    let point = curve.point_at(t);
    let frame = frames.sample_nearest(t);
    let sign = if side_sign < 0.0 { -1.0 } else { 1.0 };
    pose_from_outward(point, frame, frame.normal * sign, roll_angle, reach, lateral_offset)
}

/// Place an organ at an arbitrary angle around the stem
///
/// Azimuth 0 matches `attach_organ` with `side_sign = 1`, azimuth π with
/// `side_sign = -1`.
pub fn attach_organ_at_azimuth(
    curve: &StemCurve,
    frames: &StemFrames,
    t: f32,
    azimuth: f32,
    roll_angle: f32,
    reach: OrganReach,
    lateral_offset: f32,
) -> OrganPose {
    let point = curve.point_at(t);
    let frame = frames.sample_nearest(t);
    let azimuth = if azimuth.is_finite() { azimuth } else { 0.0 };
    let (sin, cos) = azimuth.sin_cos();
    let outward = frame.normal * cos + frame.binormal * sin;
    pose_from_outward(point, frame, outward, roll_angle, reach, lateral_offset)
}

/// An organ together with its resolved pose
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOrgan {
    pub attachment: OrganAttachment,
    pub pose: OrganPose,
}

impl ResolvedOrgan {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.attachment.scale),
            self.pose.orientation,
            self.pose.position,
        )
    }
}

/// A built stem: curve, frame table and resolved organs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stem {
    pub curve: StemCurve,
    pub frames: StemFrames,
    pub organs: Vec<ResolvedOrgan>,
    pub radius: f32,
    pub taper: f32,
    pub segments: u32,
}

impl Stem {
    pub fn build(config: &StemConfig, rng: &mut PseudoRandomSource) -> Self {
        let curve = config.curve();
        let frames = StemFrames::build(&curve, config.samples);

        let organs = config
            .attachments(rng)
            .into_iter()
            .map(|attachment| {
                let reach = config.reach(attachment.kind);
                let offset = reach.offset * config.radius_at(attachment.t);
                let pose = match attachment.kind {
                    OrganKind::Leaf => attach_organ(
                        &curve,
                        &frames,
                        attachment.t,
                        attachment.side_sign,
                        attachment.roll_angle,
                        reach,
                        offset,
                    ),
                    OrganKind::Thorn => attach_organ_at_azimuth(
                        &curve,
                        &frames,
                        attachment.t,
                        attachment.azimuth,
                        attachment.roll_angle,
                        reach,
                        offset,
                    ),
                };
                ResolvedOrgan { attachment, pose }
            })
            .collect();

        Self {
            curve,
            frames,
            organs,
            radius: config.radius,
            taper: config.taper,
            segments: config.segments,
        }
    }

    /// Tube mesh swept along the frame table
    pub fn mesh(&self) -> UnpackedMesh {
        self.frames.sweep_tube(self.radius, self.taper, self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    fn straight() -> (StemCurve, StemFrames) {
        let curve = StemCurve::new(vec![Vec3::new(0.0, -1.5, 0.0), Vec3::new(0.0, 1.5, 0.0)], 0.5);
        let frames = StemFrames::build(&curve, 10);
        (curve, frames)
    }

    #[test]
    fn test_attach_organ_sides() {
        let (curve, frames) = straight();
        let reach = OrganReach { lean: 0.0, out: 1.0, offset: 0.0 };

        let right = attach_organ(&curve, &frames, 0.5, 1.0, 0.0, reach, 0.1);
        let left = attach_organ(&curve, &frames, 0.5, -1.0, 0.0, reach, 0.1);

        // Straight Y stem: the frame normal is +X.
        assert!((right.position - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-5);
        assert!((left.position - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5);
        assert!((right.orientation * Vec3::Y - Vec3::X).length() < 1e-5);
        assert!((left.orientation * Vec3::Y + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_lean_tilts_toward_tangent() {
        let (curve, frames) = straight();
        let reach = OrganReach { lean: 1.0, out: 1.0, offset: 0.0 };
        let pose = attach_organ(&curve, &frames, 0.3, 1.0, 0.0, reach, 0.0);
        let dir = pose.orientation * Vec3::Y;
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((dir - expected).length() < 1e-5);
    }

    #[test]
    fn test_roll_keeps_direction() {
        let (curve, frames) = straight();
        let reach = OrganReach::default();
        let a = attach_organ(&curve, &frames, 0.4, 1.0, 0.0, reach, 0.0);
        let b = attach_organ(&curve, &frames, 0.4, 1.0, 1.2, reach, 0.0);
        assert!((a.orientation * Vec3::Y - b.orientation * Vec3::Y).length() < 1e-5);
        assert!((a.orientation * Vec3::X - b.orientation * Vec3::X).length() > 0.1);
    }

    #[test]
    fn test_azimuth_matches_side_sign() {
        let (curve, frames) = straight();
        let reach = OrganReach::default();
        let by_side = attach_organ(&curve, &frames, 0.7, -1.0, 0.4, reach, 0.02);
        let by_azimuth = attach_organ_at_azimuth(&curve, &frames, 0.7, PI, 0.4, reach, 0.02);
        assert!((by_side.position - by_azimuth.position).length() < 1e-5);
        assert!(by_side.orientation.dot(by_azimuth.orientation).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_thorns_scatter_within_range() {
        let spec = ThornSpec { count: 12, t_min: 0.1, t_max: 0.6, scale_min: 0.5, scale_max: 0.9 };
        let mut rng = PseudoRandomSource::new(Seed::new(3));
        let thorns = spec.scatter(&mut rng);

        assert_eq!(thorns.len(), 12);
        for thorn in &thorns {
            assert_eq!(thorn.kind, OrganKind::Thorn);
            assert!((0.1..=0.6).contains(&thorn.t));
            assert!((0.5..=0.9).contains(&thorn.scale));
            assert!((0.0..TAU).contains(&thorn.azimuth));
        }
        for pair in thorns.windows(2) {
            assert!(pair[1].t >= pair[0].t);
        }

        // Golden-angle spin puts thorns on both sides of the stem.
        assert!(thorns.iter().any(|t| t.side_sign > 0.0));
        assert!(thorns.iter().any(|t| t.side_sign < 0.0));
    }

    #[test]
    fn test_inverted_thorn_range_is_swapped() {
        let spec = ThornSpec { count: 4, t_min: 0.9, t_max: 0.2, ..Default::default() };
        let mut rng = PseudoRandomSource::new(Seed::new(1));
        for thorn in spec.scatter(&mut rng) {
            assert!((0.2..=0.9).contains(&thorn.t));
        }
    }

    #[test]
    fn test_stem_build_resolves_every_organ() {
        let config = StemConfig::default();
        let mut rng = PseudoRandomSource::new(Seed::new(8));
        let stem = Stem::build(&config, &mut rng);

        assert_eq!(stem.organs.len(), config.leaves.len() + config.thorns.count as usize);
        assert_eq!(stem.frames.len(), config.samples);
        for organ in &stem.organs {
            assert!(organ.pose.position.is_finite());
            assert!((organ.pose.orientation.length() - 1.0).abs() < 1e-6);
        }
        assert_eq!(stem.organs[0].attachment.kind, OrganKind::Leaf);
        assert_eq!(stem.organs[1].attachment.side_sign, -1.0);
    }

    #[test]
    fn test_organ_model_matrix_scales() {
        let organ = ResolvedOrgan {
            attachment: OrganAttachment {
                kind: OrganKind::Leaf,
                t: 0.0,
                side_sign: 1.0,
                azimuth: 0.0,
                roll_angle: 0.0,
                scale: 2.0,
                phase: 0.0,
            },
            pose: OrganPose { position: Vec3::Z, orientation: Quat::IDENTITY },
        };
        let p = organ.model_matrix().transform_point3(Vec3::Y);
        assert!((p - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-6);
    }
}
