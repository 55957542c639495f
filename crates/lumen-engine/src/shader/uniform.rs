use glam::{Mat4, Vec3, Vec4};

/// A shader parameter value.
///
/// Closed set: backends dispatch on it with one exhaustive `match`.
/// `Float3`/`Float4` are plain arrays, `Vec3`/`Vec4`/`Mat4` are glam types;
/// both spellings upload identically.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Float3([f32; 3]),
    Float4([f32; 4]),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Column-major.
    Mat4(Mat4),
}

impl UniformValue {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) => "int",
            UniformValue::Float(_) => "float",
            UniformValue::Float3(_) | UniformValue::Vec3(_) => "vec3",
            UniformValue::Float4(_) | UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Float3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Float4(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// A named shader parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

impl Uniform {
    pub fn new(name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
