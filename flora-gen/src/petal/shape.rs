//! Petal and leaf outlines built from cubic Bezier segments
//!
//! Outlines live in the XY plane with the attachment point at the origin and
//! the tip toward +Y. They are symmetric about x = 0 and wound
//! counter-clockwise.

use glam::Vec2;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Cubic Bezier segment in the outline plane
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    pub const fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the segment at `t` (clamped to [0, 1])
    pub fn point(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// Mirror the segment across x = 0, reversing its direction so a mirrored
    /// right half continues the counter-clockwise loop
    fn mirrored(&self) -> Self {
        let flip = |p: Vec2| Vec2::new(-p.x, p.y);
        Self::new(flip(self.p3), flip(self.p2), flip(self.p1), flip(self.p0))
    }
}

/// Closed outline made of consecutive Bezier segments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalProfile {
    pub segments: Vec<CubicBezier>,
    /// Width relative to the widest layer
    pub width_scale: f32,
    /// Height relative to the tallest layer
    pub height_scale: f32,
    /// Depth of the top notch as a fraction of the height
    pub notch_depth: f32,
}

impl PetalProfile {
    /// Sample the closed outline as a polyline
    ///
    /// Each segment contributes `per_segment` points; the closing point is not
    /// repeated.
    pub fn sample(&self, per_segment: u32) -> Vec<Vec2> {
        let per_segment = per_segment.max(1);
        let mut points = Vec::with_capacity(self.segments.len() * per_segment as usize);
        for segment in &self.segments {
            for i in 0..per_segment {
                points.push(segment.point(i as f32 / per_segment as f32));
            }
        }
        points
    }

    /// Half of the widest extent along x
    pub fn half_width(&self) -> f32 {
        self.sample(8)
            .iter()
            .fold(0.0f32, |acc, p| acc.max(p.x.abs()))
    }

    /// Build a symmetric outline from the right-hand half
    fn from_right_half(right: &[CubicBezier], width_scale: f32, height_scale: f32, notch_depth: f32) -> Self {
        let mut segments = right.to_vec();
        segments.extend(right.iter().rev().map(CubicBezier::mirrored));
        Self {
            segments,
            width_scale,
            height_scale,
            notch_depth,
        }
    }
}

/// Build the outline for one petal layer
///
/// Inner layers are narrow and tall with a shallow notch, outer layers wide
/// and short with a deep one, giving an ovate-to-heart progression. The index
/// is clamped into `[0, layer_count - 1]`.
pub fn generate_profile(layer_index: usize, layer_count: usize) -> PetalProfile {
    let layer_count = if layer_count == 0 {
        warn!("generate_profile: layer_count must be >= 1, clamping to 1");
        1
    } else {
        layer_count
    };
    let layer_index = layer_index.min(layer_count - 1);
    let s = if layer_count > 1 {
        layer_index as f32 / (layer_count - 1) as f32
    } else {
        0.0
    };

    let width_scale = 0.55 + 0.45 * s;
    let height_scale = 1.0 - 0.2 * s;
    let notch_depth = 0.015 + 0.085 * s;

    let w = 0.5 * width_scale;
    let h = height_scale;
    let notch = notch_depth * h;
    let v = Vec2::new;

    let right = [
        CubicBezier::new(v(0.0, 0.0), v(0.30 * w, 0.02 * h), v(0.95 * w, 0.22 * h), v(w, 0.55 * h)),
        CubicBezier::new(v(w, 0.55 * h), v(1.05 * w, 0.82 * h), v(0.72 * w, h), v(0.38 * w, h)),
        CubicBezier::new(v(0.38 * w, h), v(0.18 * w, h), v(0.06 * w, h - notch * 0.4), v(0.0, h - notch)),
    ];

    PetalProfile::from_right_half(&right, width_scale, height_scale, notch_depth)
}

/// Build a lanceolate leaf outline of the given width and length
pub fn generate_leaf_profile(width: f32, length: f32) -> PetalProfile {
    let w = 0.5 * width.max(0.01);
    let l = length.max(0.01);
    let v = Vec2::new;

    let right = [
        CubicBezier::new(v(0.0, 0.0), v(0.5 * w, 0.05 * l), v(w, 0.25 * l), v(0.95 * w, 0.45 * l)),
        CubicBezier::new(v(0.95 * w, 0.45 * l), v(0.85 * w, 0.7 * l), v(0.35 * w, 0.9 * l), v(0.0, l)),
    ];

    PetalProfile::from_right_half(&right, width, length, 0.0)
}

/// Per-layer outline cache
///
/// Every petal of a layer shares the same `Arc<PetalProfile>`.
#[derive(Debug, Default)]
pub struct PetalShapeFactory {
    layer_count: usize,
    cache: HashMap<usize, Arc<PetalProfile>>,
}

impl PetalShapeFactory {
    pub fn new(layer_count: usize) -> Self {
        Self {
            layer_count: layer_count.max(1),
            cache: HashMap::new(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Outline for a layer, built on first request
    pub fn profile(&mut self, layer_index: usize) -> Arc<PetalProfile> {
        let layer = layer_index.min(self.layer_count - 1);
        let layer_count = self.layer_count;
        self.cache
            .entry(layer)
            .or_insert_with(|| Arc::new(generate_profile(layer, layer_count)))
            .clone()
    }
}
