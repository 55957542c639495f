use glam::{Vec3, Vec4};

use crate::shader::{Uniform, UniformValue};

/// Light type, uploaded as an integer discriminant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

impl LightKind {
    /// Value the shader switches on.
    pub fn code(self) -> i32 {
        match self {
            LightKind::Point => 0,
            LightKind::Directional => 1,
            LightKind::Spot => 2,
        }
    }

    fn is_positional(self) -> bool {
        !matches!(self, LightKind::Directional)
    }
}

/// Distance falloff: `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// No falloff.
    pub const NONE: Self = Self {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    /// Falloff reaching roughly 50 world units.
    pub const RANGE_50: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };
}

/// One entry of the shader's light array.
///
/// `cut_off` and `outer_cut_off` are cosines of the spot cone half-angles and
/// only matter for [`LightKind::Spot`]. `position` is ignored for directional
/// lights, `direction` for point lights.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

impl Light {
    /// Phong point light with ambient/diffuse/specular at 0.2/0.5/1.0 of `color`.
    pub fn point(position: Vec3, color: Vec3, attenuation: Attenuation) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vec3::ZERO,
            ambient: 0.2 * color,
            diffuse: 0.5 * color,
            specular: color,
            attenuation,
            cut_off: 0.0,
            outer_cut_off: 0.0,
        }
    }

    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vec3::ZERO,
            direction: direction.normalize_or_zero(),
            ambient: 0.2 * color,
            diffuse: 0.5 * color,
            specular: color,
            attenuation: Attenuation::NONE,
            cut_off: 0.0,
            outer_cut_off: 0.0,
        }
    }

    /// Spot light; cut-offs are half-angles in degrees.
    pub fn spot(position: Vec3, direction: Vec3, color: Vec3, cut_off_deg: f32, outer_cut_off_deg: f32) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            direction: direction.normalize_or_zero(),
            ambient: Vec3::ZERO,
            diffuse: color,
            specular: color,
            attenuation: Attenuation::RANGE_50,
            cut_off: cut_off_deg.to_radians().cos(),
            outer_cut_off: outer_cut_off_deg.to_radians().cos(),
        }
    }

    /// `position` with `w = 1` for positional lights and `w = 0` for directional ones.
    pub fn homogeneous_position(&self) -> Vec4 {
        if self.kind.is_positional() {
            self.position.extend(1.0)
        } else {
            self.direction.extend(0.0)
        }
    }

    /// Uniform list for this light as element `prefix`, e.g. `u_lights[2]`.
    pub fn uniforms(&self, prefix: &str) -> Vec<Uniform> {
        let field = |name: &str, value: UniformValue| Uniform::new(format!("{prefix}.{name}"), value);

        vec![
            field("kind", UniformValue::Int(self.kind.code())),
            field("position", UniformValue::Vec4(self.homogeneous_position())),
            field("direction", UniformValue::Vec3(self.direction)),
            field("ambient", UniformValue::Vec3(self.ambient)),
            field("diffuse", UniformValue::Vec3(self.diffuse)),
            field("specular", UniformValue::Vec3(self.specular)),
            field("constant", UniformValue::Float(self.attenuation.constant)),
            field("linear", UniformValue::Float(self.attenuation.linear)),
            field("quadratic", UniformValue::Float(self.attenuation.quadratic)),
            field("cut_off", UniformValue::Float(self.cut_off)),
            field("outer_cut_off", UniformValue::Float(self.outer_cut_off)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_position_has_zero_w() {
        let l = Light::directional(Vec3::new(0.0, -2.0, 0.0), Vec3::ONE);
        assert_eq!(l.homogeneous_position(), Vec4::new(0.0, -1.0, 0.0, 0.0));
    }

    #[test]
    fn point_position_has_unit_w() {
        let l = Light::point(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE, Attenuation::RANGE_50);
        assert_eq!(l.homogeneous_position(), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn uniform_names_are_prefixed() {
        let l = Light::point(Vec3::ZERO, Vec3::ONE, Attenuation::NONE);
        let uniforms = l.uniforms("u_lights[3]");
        assert_eq!(uniforms.len(), 11);
        assert!(uniforms.iter().all(|u| u.name.starts_with("u_lights[3].")));
        assert_eq!(uniforms[0].value, UniformValue::Int(0));
    }

    #[test]
    fn spot_cut_offs_are_cosines() {
        let l = Light::spot(Vec3::ZERO, Vec3::Z, Vec3::ONE, 60.0, 90.0);
        assert!((l.cut_off - 0.5).abs() < 1e-6);
        assert!(l.outer_cut_off.abs() < 1e-6);
    }
}
