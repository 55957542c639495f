use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};
use std::path::PathBuf;

use glam::Vec3;

use lumen_engine::control::DEFAULT_SENSITIVITY;
use lumen_engine::lighting::{CandidateLight, MAX_LIGHTS};

/// Circular path of one candidate point light around the world Y axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightOrbit {
    pub radius: f32,
    pub height: f32,
    /// Starting angle as a fraction of a full turn.
    pub phase: f32,
    /// Turns per second of scene time.
    pub speed: f32,
    pub color: Vec3,
}

impl LightOrbit {
    pub fn position(&self, scene_time: f32) -> Vec3 {
        let angle = TAU * (self.phase + self.speed * scene_time);
        Vec3::new(self.radius * angle.sin(), self.height, self.radius * angle.cos())
    }

    pub fn candidate(&self, scene_time: f32) -> CandidateLight {
        CandidateLight {
            position: self.position(scene_time),
            color: self.color,
        }
    }
}

/// Viewer settings. Everything has a default; the CLI overrides a few.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub field_of_view: f32,
    pub position: Vec3,
    /// `(pitch, yaw, roll)` in radians.
    pub orientation: Vec3,

    /// World units per second.
    pub move_speed: f32,
    pub sensitivity: f32,
    pub initial_lights: usize,

    pub near: f32,
    pub far: f32,
    pub clear_color: wgpu::Color,

    pub shininess: f32,
    /// Emissive map scroll, in texture heights per second of scene time.
    pub emissive_scroll: f32,

    /// Candidate point lights in the order they are switched on.
    pub orbits: Vec<LightOrbit>,
    /// Directory with the container and emissive images; procedural
    /// textures are used when unset.
    pub texture_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            field_of_view: FRAC_PI_2,
            position: Vec3::new(1.0, 3.0, 1.0),
            orientation: Vec3::new(-FRAC_PI_3, -3.0 * PI / 4.0, 0.0),
            move_speed: 5.0,
            sensitivity: DEFAULT_SENSITIVITY,
            initial_lights: 1,
            near: 0.1,
            far: 100.0,
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
            shininess: 32.0,
            emissive_scroll: 0.1,
            orbits: default_orbits(),
            texture_dir: None,
        }
    }
}

/// A white light on a 3-unit orbit at cube height, then tinted lights spread
/// around the cube at alternating radii and heights.
fn default_orbits() -> Vec<LightOrbit> {
    (0..MAX_LIGHTS)
        .map(|i| {
            let t = i as f32 / MAX_LIGHTS as f32;
            LightOrbit {
                radius: if i % 2 == 0 { 3.0 } else { 2.2 },
                height: if i == 0 { 0.0 } else { (i % 3) as f32 - 1.0 },
                phase: t,
                speed: 0.1,
                color: if i == 0 { Vec3::ONE } else { spectrum(t) },
            }
        })
        .collect()
}

/// Smooth color ramp over `t` in `[0, 1]`.
fn spectrum(t: f32) -> Vec3 {
    let rgb = Vec3::new((TAU * t).cos(), (TAU / 2.0 * t).cos(), (TAU / 4.0 * t).cos());
    0.5 * rgb + Vec3::splat(0.5)
}
