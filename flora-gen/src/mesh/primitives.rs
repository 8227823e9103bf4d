//! Procedural primitives: cone and outline extrusion
//!
//! Both take their parameters by value and clamp anything out of range
//! instead of failing, so a bad config still yields a renderable mesh.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::warn;

use super::types::MeshBuilder;

/// Generate a cone standing on the XZ plane with its apex on +Y
///
/// # Arguments
/// * `radius` - Base radius (>= 0.0)
/// * `height` - Apex height (> 0.0)
/// * `segments` - Number of radial divisions (min 3, max 256)
pub fn generate_cone<M: MeshBuilder>(radius: f32, height: f32, segments: u32) -> M {
    let radius = if radius < 0.0 || !radius.is_finite() {
        warn!("generate_cone: radius must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius
    };

    let height = if height <= 0.0 || !height.is_finite() {
        warn!("generate_cone: height must be > 0.0, clamping to 0.001");
        0.001
    } else {
        height
    };

    let segments = segments.clamp(3, 256);
    let mut mesh = M::default();
    let slope = radius / height;

    let mut body_indices = Vec::with_capacity((segments * 2) as usize);
    for i in 0..segments {
        let theta = (i as f32 / segments as f32) * TAU;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let radial = Vec3::new(cos_theta, 0.0, sin_theta);
        let normal = (radial + Vec3::new(0.0, slope, 0.0)).normalize();

        let bottom_idx = mesh.add_vertex(radial * radius, normal);
        let apex_idx = mesh.add_vertex(Vec3::new(0.0, height, 0.0), normal);
        body_indices.push(bottom_idx);
        body_indices.push(apex_idx);
    }

    for i in 0..segments {
        let next_i = (i + 1) % segments;
        let i0 = body_indices[(i * 2) as usize];
        let i1 = body_indices[(i * 2 + 1) as usize];
        let i2 = body_indices[(next_i * 2) as usize];
        mesh.add_triangle(i0, i1, i2);
    }

    if radius > 0.0 {
        let center = mesh.add_vertex(Vec3::ZERO, Vec3::NEG_Y);
        let rim: Vec<u32> = (0..segments)
            .map(|i| {
                let theta = (i as f32 / segments as f32) * TAU;
                mesh.add_vertex(
                    Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin()),
                    Vec3::NEG_Y,
                )
            })
            .collect();

        for i in 0..segments as usize {
            mesh.add_triangle(center, rim[i], rim[(i + 1) % rim.len()]);
        }
    }

    mesh
}

/// Extrusion parameters for turning a flat outline into a slab
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrudeParams {
    /// Total slab thickness along Z
    pub depth: f32,
    /// Inset of the front/back caps relative to the outline, rounding the rim
    pub bevel: f32,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            depth: 0.012,
            bevel: 0.004,
        }
    }
}

/// Extrude a closed 2D outline into a slab mesh
///
/// Front (+Z) and back (-Z) caps are triangulated as concentric rings around
/// the outline centroid, which suits the star-shaped outlines petals and
/// leaves have and leaves interior vertices for later bending. The side wall
/// runs from the inset cap rim out to the full outline at z = 0.
///
/// Vertex count is `2 * (1 + rings * n) + 3 * n` for an outline of `n`
/// points, regardless of the extrusion parameters.
pub fn extrude_outline<M: MeshBuilder>(outline: &[Vec2], params: ExtrudeParams, rings: u32) -> M {
    let mut mesh = M::default();

    if outline.len() < 3 {
        warn!(
            "extrude_outline: outline needs at least 3 points, got {}; returning empty mesh",
            outline.len()
        );
        return mesh;
    }

    let rings = rings.clamp(1, 64);
    let depth = if params.depth.is_finite() { params.depth.max(0.0) } else { 0.0 };
    let bevel = if params.bevel.is_finite() { params.bevel.max(0.0) } else { 0.0 };
    let half_depth = depth * 0.5;

    // Work in counter-clockwise order so cap winding faces +Z.
    let mut points: Vec<Vec2> = outline.to_vec();
    let signed_area: f32 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    if signed_area < 0.0 {
        points.reverse();
    }

    let n = points.len();
    let centroid = points.iter().copied().sum::<Vec2>() / n as f32;
    let (min, max) = points
        .iter()
        .fold((points[0], points[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let extent = (max - min).max(Vec2::splat(f32::EPSILON));
    let uv_of = |p: Vec2| (p - min) / extent;

    let inset: Vec<Vec2> = points
        .iter()
        .map(|p| {
            let to_center = centroid - *p;
            let dist = to_center.length();
            match to_center.try_normalize() {
                Some(dir) => *p + dir * bevel.min(dist * 0.5),
                None => *p,
            }
        })
        .collect();

    // Caps: centre vertex followed by `rings` loops of n vertices each.
    let build_cap = |mesh: &mut M, z: f32, normal: Vec3, flip: bool| {
        let center = mesh.add_vertex_uv(centroid.extend(z), uv_of(centroid), normal);
        let mut previous: Option<Vec<u32>> = None;

        for r in 1..=rings {
            let s = r as f32 / rings as f32;
            let ring: Vec<u32> = inset
                .iter()
                .map(|q| {
                    let p = centroid + (*q - centroid) * s;
                    mesh.add_vertex_uv(p.extend(z), uv_of(p), normal)
                })
                .collect();

            for j in 0..n {
                let k = (j + 1) % n;
                let tris = match &previous {
                    None => vec![(center, ring[j], ring[k])],
                    Some(inner) => vec![(inner[j], ring[j], ring[k]), (inner[j], ring[k], inner[k])],
                };
                for (a, b, c) in tris {
                    if flip {
                        mesh.add_triangle(a, c, b);
                    } else {
                        mesh.add_triangle(a, b, c);
                    }
                }
            }
            previous = Some(ring);
        }
    };

    build_cap(&mut mesh, half_depth, Vec3::Z, false);
    build_cap(&mut mesh, -half_depth, Vec3::NEG_Z, true);

    // Side wall: front rim -> outline -> back rim.
    let loops: Vec<Vec<u32>> = [(&inset, half_depth), (&points, 0.0), (&inset, -half_depth)]
        .into_iter()
        .map(|(ring, z)| {
            ring.iter()
                .map(|p| {
                    let outward = (*p - centroid).try_normalize().unwrap_or(Vec2::X);
                    mesh.add_vertex_uv(p.extend(z), uv_of(*p), outward.extend(0.0))
                })
                .collect()
        })
        .collect();

    for pair in loops.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..n {
            let k = (j + 1) % n;
            mesh.add_triangle(upper[j], lower[j], lower[k]);
            mesh.add_triangle(upper[j], lower[k], upper[k]);
        }
    }

    mesh
}
