//! Rotation-minimizing frames along the stem
//!
//! The first frame picks its normal from the world axis least aligned with
//! the tangent. Every later frame rotates the previous one by the smallest
//! rotation taking the old tangent onto the new tangent, so the normal never
//! flips, even where the stem runs vertical.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::{debug, warn};

use super::curve::StemCurve;
use crate::mesh::{MeshBuilder, UnpackedMesh};

/// Orthonormal frame at one curve sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrenetFrame {
    /// Curve parameter of this sample
    pub t: f32,
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    /// `tangent × normal`
    pub binormal: Vec3,
}

/// Table of frames sampled at evenly spaced curve parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StemFrames {
    frames: Vec<FrenetFrame>,
}

/// Normal for a tangent with no predecessor
fn initial_normal(tangent: Vec3) -> Vec3 {
    let a = tangent.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    (axis - tangent * axis.dot(tangent))
        .try_normalize()
        .unwrap_or_else(|| tangent.any_orthonormal_vector())
}

impl StemFrames {
    /// Sample `samples` frames (at least 2) along the curve
    pub fn build(curve: &StemCurve, samples: usize) -> Self {
        let samples = if samples < 2 {
            warn!("StemFrames: need at least 2 samples, clamping to 2");
            2
        } else {
            samples
        };

        let mut frames: Vec<FrenetFrame> = Vec::with_capacity(samples);
        let mut degenerate = 0usize;

        for i in 0..samples {
            let t = i as f32 / (samples - 1) as f32;
            let position = curve.point_at(t);
            let prev = frames.last().copied();

            let tangent = match curve.derivative(t).try_normalize() {
                Some(tangent) => tangent,
                None => {
                    degenerate += 1;
                    prev.map_or(Vec3::Y, |f| f.tangent)
                }
            };

            let normal = match prev {
                None => initial_normal(tangent),
                Some(prev) => {
                    let carried = Quat::from_rotation_arc(prev.tangent, tangent) * prev.normal;
                    (carried - tangent * carried.dot(tangent))
                        .try_normalize()
                        .unwrap_or_else(|| initial_normal(tangent))
                }
            };

            frames.push(FrenetFrame {
                t,
                position,
                tangent,
                normal,
                binormal: tangent.cross(normal),
            });
        }

        if degenerate > 0 {
            warn!(
                "StemFrames: {} samples had a zero-length tangent, reused the previous frame",
                degenerate
            );
        }
        debug!("Built {} stem frames", frames.len());

        Self { frames }
    }

    pub fn frames(&self) -> &[FrenetFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame whose parameter is closest to `t`
    pub fn sample_nearest(&self, t: f32) -> &FrenetFrame {
        let last = self.frames.len() - 1;
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let index = ((t * last as f32).round() as usize).min(last);
        &self.frames[index]
    }

    /// Sweep a circle along the frames to build the stem tube
    ///
    /// Radius shrinks linearly from `radius` at the base to
    /// `radius * (1 - taper)` at the top. The ends are left open.
    pub fn sweep_tube(&self, radius: f32, taper: f32, segments: u32) -> UnpackedMesh {
        let radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            warn!("sweep_tube: radius must be > 0.0, clamping to 0.001");
            0.001
        };
        let taper = if taper.is_finite() { taper.clamp(0.0, 1.0) } else { 0.0 };
        let segments = segments.clamp(3, 64);
        let ring = segments + 1;

        let mut mesh = UnpackedMesh::new();
        for frame in &self.frames {
            let r = radius * (1.0 - taper * frame.t);
            for j in 0..ring {
                let theta = j as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                let outward = frame.normal * cos + frame.binormal * sin;
                mesh.add_vertex_uv(
                    frame.position + outward * r,
                    Vec2::new(j as f32 / segments as f32, frame.t),
                    outward,
                );
            }
        }

        for i in 0..self.frames.len().saturating_sub(1) as u32 {
            for j in 0..segments {
                let a = i * ring + j;
                let b = a + 1;
                let c = a + ring;
                let d = c + 1;
                mesh.add_triangle(a, b, c);
                mesh.add_triangle(b, d, c);
            }
        }

        mesh
    }
}
