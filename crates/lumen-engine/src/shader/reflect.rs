use std::collections::HashMap;

use naga::{AddressSpace, ArraySize, Handle, Module, ScalarKind, Type, TypeInner, VectorSize};

/// Leaf type of a reflected uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotType {
    Int,
    Uint,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    /// Anything the upload protocol has no value kind for.
    Other,
}

impl SlotType {
    pub fn name(self) -> &'static str {
        match self {
            SlotType::Int => "int",
            SlotType::Uint => "uint",
            SlotType::Float => "float",
            SlotType::Vec2 => "vec2",
            SlotType::Vec3 => "vec3",
            SlotType::Vec4 => "vec4",
            SlotType::Mat4 => "mat4",
            SlotType::Other => "unsupported type",
        }
    }

    fn classify(inner: &TypeInner) -> Self {
        match *inner {
            TypeInner::Scalar(s) => match s.kind {
                ScalarKind::Sint => SlotType::Int,
                ScalarKind::Uint => SlotType::Uint,
                ScalarKind::Float if s.width == 4 => SlotType::Float,
                _ => SlotType::Other,
            },
            TypeInner::Vector { size, scalar }
                if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
            {
                match size {
                    VectorSize::Bi => SlotType::Vec2,
                    VectorSize::Tri => SlotType::Vec3,
                    VectorSize::Quad => SlotType::Vec4,
                }
            }
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar,
            } if scalar.kind == ScalarKind::Float && scalar.width == 4 => SlotType::Mat4,
            _ => SlotType::Other,
        }
    }
}

/// Byte offset and type of one uniform inside the block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub offset: u32,
    pub ty: SlotType,
}

/// Flattened view of a uniform block.
///
/// Struct members are named `a.b`, array elements `a[i]`. The top-level
/// struct is transparent: its members are the root names.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLayout {
    pub size: u32,
    pub slots: HashMap<String, UniformSlot>,
}

impl UniformLayout {
    pub fn get(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }
}

/// Reflects the `var<uniform>` at `@group(0) @binding(0)`, if the module has one.
pub fn reflect_uniform_block(module: &Module) -> Option<UniformLayout> {
    let (_, var) = module.global_variables.iter().find(|(_, var)| {
        var.space == AddressSpace::Uniform
            && var
                .binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
    })?;

    let inner = &module.types[var.ty].inner;
    let mut slots = HashMap::new();

    match inner {
        TypeInner::Struct { .. } => flatten(module, var.ty, String::new(), 0, &mut slots),
        _ => flatten(module, var.ty, var.name.clone().unwrap_or_default(), 0, &mut slots),
    }

    Some(UniformLayout {
        size: inner.size(module.to_ctx()),
        slots,
    })
}

fn flatten(
    module: &Module,
    ty: Handle<Type>,
    name: String,
    offset: u32,
    out: &mut HashMap<String, UniformSlot>,
) {
    match module.types[ty].inner {
        TypeInner::Struct { ref members, .. } => {
            for member in members {
                let Some(member_name) = member.name.as_deref() else {
                    continue;
                };
                let path = if name.is_empty() {
                    member_name.to_owned()
                } else {
                    format!("{name}.{member_name}")
                };
                flatten(module, member.ty, path, offset + member.offset, out);
            }
        }
        TypeInner::Array {
            base,
            size: ArraySize::Constant(len),
            stride,
        } => {
            for i in 0..len.get() {
                flatten(module, base, format!("{name}[{i}]"), offset + i * stride, out);
            }
        }
        ref leaf => {
            out.insert(
                name,
                UniformSlot {
                    offset,
                    ty: SlotType::classify(leaf),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"
        struct Material {
            diffuse: i32,
            specular: i32,
            emissive: i32,
            shininess: f32,
        }

        struct Light {
            position: vec4<f32>,
            color: vec3<f32>,
            strength: f32,
        }

        struct Uniforms {
            model: mat4x4<f32>,
            tint: vec3<f32>,
            time: f32,
            material: Material,
            lights: array<Light, 2>,
            count: i32,
        }

        @group(0) @binding(0) var<uniform> u: Uniforms;

        @vertex
        fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
            return u.model * vec4<f32>(p * u.time, 1.0);
        }
    "#;

    fn parse(src: &str) -> Module {
        let module = naga::front::wgsl::parse_str(src).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
        module
    }

    fn slot(offset: u32, ty: SlotType) -> Option<UniformSlot> {
        Some(UniformSlot { offset, ty })
    }

    #[test]
    fn top_level_members_are_root_names() {
        let layout = reflect_uniform_block(&parse(BLOCK)).unwrap();
        assert_eq!(layout.get("model"), slot(0, SlotType::Mat4));
        assert_eq!(layout.get("tint"), slot(64, SlotType::Vec3));
        assert_eq!(layout.get("time"), slot(76, SlotType::Float));
        assert_eq!(layout.get("u"), None);
    }

    #[test]
    fn nested_struct_members_are_dotted() {
        let layout = reflect_uniform_block(&parse(BLOCK)).unwrap();
        assert_eq!(layout.get("material.diffuse"), slot(80, SlotType::Int));
        assert_eq!(layout.get("material.shininess"), slot(92, SlotType::Float));
        assert_eq!(layout.get("material"), None);
    }

    #[test]
    fn array_elements_use_stride() {
        let layout = reflect_uniform_block(&parse(BLOCK)).unwrap();
        assert_eq!(layout.get("lights[0].position"), slot(96, SlotType::Vec4));
        assert_eq!(layout.get("lights[1].position"), slot(128, SlotType::Vec4));
        assert_eq!(layout.get("lights[1].strength"), slot(156, SlotType::Float));
        assert_eq!(layout.get("lights[2].position"), None);
        assert_eq!(layout.get("count"), slot(160, SlotType::Int));
        assert_eq!(layout.size, 176);
    }

    #[test]
    fn modules_without_block_reflect_nothing() {
        let module = parse(
            r#"
            @vertex
            fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(p, 1.0);
            }
            "#,
        );
        assert!(reflect_uniform_block(&module).is_none());
    }

    #[test]
    fn other_bindings_are_ignored() {
        let module = parse(
            r#"
            @group(1) @binding(0) var<uniform> other: vec4<f32>;

            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return other;
            }
            "#,
        );
        assert!(reflect_uniform_block(&module).is_none());
    }
}
