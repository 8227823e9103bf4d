//! Petal orientation shared by every layout strategy
//!
//! A petal starts pointing up (+Y). It is tilted toward its radial direction
//! by `tilt * 90°`, optionally leaned sideways and drooped, and then rolled
//! about its own growth direction so the concave face (local -Z) looks at
//! the flower axis.
//!
//! Azimuth is measured about +Y with the right-hand rule, so azimuth 0 is +Z
//! and azimuth π/2 is +X. This matches `Quat::from_rotation_y`.

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Optional terms added to the tilted direction before normalizing
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirectionTerms {
    /// Weight of the tangential (spiral wrap) lean
    pub lean: f32,
    /// Weight of the downward pull for strongly curled outer petals
    pub droop: f32,
}

/// Local axis the concave side of a petal faces before placement
pub const CONCAVE_AXIS: Vec3 = Vec3::NEG_Z;

/// Unit radial direction in the XZ plane for an azimuth
///
/// Equal to `Quat::from_rotation_y(azimuth) * Vec3::Z`.
pub fn radial(azimuth: f32) -> Vec3 {
    let (sin_a, cos_a) = azimuth.sin_cos();
    Vec3::new(sin_a, 0.0, cos_a)
}

/// Unit tangential direction, the derivative of `radial` by azimuth
pub fn tangential(azimuth: f32) -> Vec3 {
    let (sin_a, cos_a) = azimuth.sin_cos();
    Vec3::new(cos_a, 0.0, -sin_a)
}

/// Growth direction of a petal
///
/// Falls back to straight up when the terms cancel out.
pub fn petal_direction(azimuth: f32, tilt: f32, terms: DirectionTerms) -> Vec3 {
    let angle = tilt.clamp(0.0, 1.0) * FRAC_PI_2;
    let direction = Vec3::Y * angle.cos()
        + radial(azimuth) * angle.sin()
        + tangential(azimuth) * terms.lean
        + Vec3::NEG_Y * terms.droop;

    match direction.try_normalize() {
        Some(d) if d.is_finite() => d,
        _ => Vec3::Y,
    }
}

/// Final orientation for a petal
///
/// `base` swings +Y onto `direction`; `roll` then spins the petal about
/// `direction` by `azimuth + roll_offset`. The product is `roll * base`:
/// the roll acts on the already tilted petal. Reversing the product spins it
/// about world +Y instead.
///
/// `roll * base` equals `base * from_rotation_y(azimuth)`, which first turns
/// [`CONCAVE_AXIS`] onto `-radial(azimuth)` and then tilts it upward within
/// the radial plane, so the concave face keeps looking at the axis.
pub fn petal_orientation(direction: Vec3, azimuth: f32, roll_offset: f32) -> Quat {
    let base = Quat::from_rotation_arc(Vec3::Y, direction);
    let roll_angle = azimuth + roll_offset;
    let roll = if roll_angle.is_finite() {
        Quat::from_axis_angle(direction, roll_angle)
    } else {
        Quat::IDENTITY
    };
    (roll * base).normalize()
}
