use glam::Vec3;

use crate::camera::Camera;

use super::{Attenuation, Light, MAX_LIGHTS};

/// Inner cone half-angle of the camera flashlight, in degrees.
pub const FLASHLIGHT_CUT_OFF_DEG: f32 = 12.5;
/// Outer cone half-angle of the camera flashlight, in degrees.
pub const FLASHLIGHT_OUTER_CUT_OFF_DEG: f32 = 17.5;

/// A point light the scene may switch on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CandidateLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// Builds the active light set for one frame.
///
/// Takes the first `requested` candidates in pool order as point lights and
/// appends a camera-bound spot light when `flashlight_on`. The flashlight
/// always gets a slot: point lights are cut to `MAX_LIGHTS - 1` when it is on,
/// so the result never exceeds [`MAX_LIGHTS`].
pub fn compose_lights(pool: &[CandidateLight], camera: &Camera, requested: usize, flashlight_on: bool) -> Vec<Light> {
    let capacity = MAX_LIGHTS - usize::from(flashlight_on);
    let count = requested.min(pool.len()).min(capacity);

    let mut lights: Vec<Light> = pool[..count]
        .iter()
        .map(|c| Light::point(c.position, c.color, Attenuation::RANGE_50))
        .collect();

    if flashlight_on {
        lights.push(Light::spot(
            camera.position(),
            camera.forward(),
            Vec3::ONE,
            FLASHLIGHT_CUT_OFF_DEG,
            FLASHLIGHT_OUTER_CUT_OFF_DEG,
        ));
    }

    lights
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::lighting::LightKind;

    fn pool(n: usize) -> Vec<CandidateLight> {
        (0..n)
            .map(|i| CandidateLight {
                position: Vec3::new(i as f32, 0.0, 0.0),
                color: Vec3::new(1.0, 0.5, 0.25) * (i + 1) as f32,
            })
            .collect()
    }

    fn camera() -> Camera {
        Camera::new(FRAC_PI_2, Vec3::new(1.0, 3.0, 1.0), Vec3::new(-0.3, 0.7, 0.0))
    }

    #[test]
    fn takes_requested_lights_in_pool_order() {
        let pool = pool(4);
        let lights = compose_lights(&pool, &camera(), 3, false);
        assert_eq!(lights.len(), 3);
        for (light, candidate) in lights.iter().zip(&pool) {
            assert_eq!(light.kind, LightKind::Point);
            assert_eq!(light.position, candidate.position);
            assert!(light.ambient.abs_diff_eq(0.2 * candidate.color, 1e-6));
            assert!(light.diffuse.abs_diff_eq(0.5 * candidate.color, 1e-6));
            assert_eq!(light.specular, candidate.color);
            assert_eq!(light.attenuation, Attenuation::RANGE_50);
        }
    }

    #[test]
    fn request_is_limited_by_pool() {
        assert_eq!(compose_lights(&pool(2), &camera(), 5, false).len(), 2);
        assert!(compose_lights(&pool(0), &camera(), 5, false).is_empty());
    }

    #[test]
    fn flashlight_wins_a_slot_at_capacity() {
        let lights = compose_lights(&pool(8), &camera(), 8, true);
        assert_eq!(lights.len(), MAX_LIGHTS);
        assert_eq!(lights.iter().filter(|l| l.kind == LightKind::Point).count(), 7);
        assert_eq!(lights[7].kind, LightKind::Spot);
    }

    #[test]
    fn flashlight_follows_camera() {
        let cam = camera();
        let lights = compose_lights(&pool(3), &cam, 0, true);
        assert_eq!(lights.len(), 1);

        let spot = lights[0];
        assert_eq!(spot.position, cam.position());
        assert!(spot.direction.abs_diff_eq(cam.forward(), 1e-6));
        assert_eq!(spot.ambient, Vec3::ZERO);
        assert_eq!(spot.diffuse, Vec3::ONE);
        assert!((spot.cut_off - 12.5f32.to_radians().cos()).abs() < 1e-6);
        assert!((spot.outer_cut_off - 17.5f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn never_exceeds_capacity() {
        let pool = pool(12);
        for requested in 0..12 {
            for flashlight in [false, true] {
                assert!(compose_lights(&pool, &camera(), requested, flashlight).len() <= MAX_LIGHTS);
            }
        }
    }
}
