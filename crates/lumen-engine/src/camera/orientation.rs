//! Euler-like orientation (pitch, yaw, roll) to direction vectors.
//!
//! Angles are radians packed in a `Vec3` as `(pitch, yaw, roll)`. Yaw 0 looks
//! along +X, increasing yaw turns toward +Z; positive pitch looks up.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

/// Largest allowed absolute pitch. Keeps forward away from the up vector so
/// `forward × up` never degenerates.
pub const PITCH_LIMIT: f32 = 0.99 * FRAC_PI_2;

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Returns `angles` with pitch clamped to `[-PITCH_LIMIT, PITCH_LIMIT]`.
#[inline]
pub fn clamp_pitch(angles: Vec3) -> Vec3 {
    Vec3::new(angles.x.clamp(-PITCH_LIMIT, PITCH_LIMIT), angles.y, angles.z)
}

/// Unit look direction for `angles`.
pub fn forward_from_euler(angles: Vec3) -> Vec3 {
    let (sin_p, cos_p) = angles.x.sin_cos();
    let (sin_y, cos_y) = angles.y.sin_cos();
    Vec3::new(cos_p * cos_y, sin_p, cos_p * sin_y).normalize()
}

/// Up vector for `angles`.
///
/// Always world-up: roll is not applied, so the third angle is inert.
pub fn up_from_euler(_angles: Vec3) -> Vec3 {
    WORLD_UP
}
