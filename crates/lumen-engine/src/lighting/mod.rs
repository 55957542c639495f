//! Light descriptors and per-frame light composition.

mod compose;
mod light;

pub use compose::{compose_lights, CandidateLight, FLASHLIGHT_CUT_OFF_DEG, FLASHLIGHT_OUTER_CUT_OFF_DEG};
pub use light::{Attenuation, Light, LightKind};

/// Capacity of the shader's light array.
pub const MAX_LIGHTS: usize = 8;
