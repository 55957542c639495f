use std::num::NonZeroU64;

use bytemuck::Pod;

use crate::render::{Mesh, RenderCtx, Texture, Vertex};

use super::error::{ProgramError, Stage, UniformError};
use super::program::{ProgramBackend, ShaderProgram, TextureSlot};
use super::reflect::{reflect_uniform_block, SlotType, UniformLayout, UniformSlot};
use super::uniform::UniformValue;

/// Texture slots per program.
///
/// Textures live in `@group(1)`: slot `i` is the texture at `@binding(i)` and
/// its sampler at `@binding(TEXTURE_SLOTS + i)`.
pub const TEXTURE_SLOTS: u32 = 4;

const DEFAULT_DRAWS_PER_FRAME: u32 = 64;

/// WGSL source and entry point of one stage.
#[derive(Debug, Copy, Clone)]
pub struct StageSource<'a> {
    pub source: &'a str,
    pub entry_point: &'a str,
}

impl<'a> StageSource<'a> {
    pub fn new(source: &'a str, entry_point: &'a str) -> Self {
        Self { source, entry_point }
    }
}

/// Everything [`WgpuProgram::compile`] needs.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex: StageSource<'a>,
    pub fragment: StageSource<'a>,
    pub topology: wgpu::PrimitiveTopology,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    /// Also build a line-mode pipeline when the device supports it.
    pub wireframe: bool,
    /// Uniform arena capacity; each draw in a frame takes one entry.
    pub max_draws_per_frame: u32,
}

impl<'a> ProgramDesc<'a> {
    /// Triangle-list program with both stages in `source` (`vs_main`, `fs_main`).
    pub fn new(label: &'a str, source: &'a str, ctx: &RenderCtx<'_>) -> Self {
        Self {
            label,
            vertex: StageSource::new(source, "vs_main"),
            fragment: StageSource::new(source, "fs_main"),
            topology: wgpu::PrimitiveTopology::TriangleList,
            color_format: ctx.surface_format,
            depth_format: ctx.depth_format,
            wireframe: false,
            max_draws_per_frame: DEFAULT_DRAWS_PER_FRAME,
        }
    }
}

/// A WGSL program backed by wgpu pipelines.
///
/// Uniform uploads land in a CPU copy of the reflected block. Each
/// [`draw`](Self::draw) snapshots that copy into the next entry of a
/// per-frame arena and binds it with a dynamic offset, so successive draws
/// with different uniforms do not overwrite each other.
pub struct WgpuProgram {
    label: String,
    layout: UniformLayout,
    staging: Vec<u8>,

    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: Option<wgpu::RenderPipeline>,

    arena: wgpu::Buffer,
    arena_stride: u64,
    arena_capacity: u32,
    arena_cursor: u32,
    arena_frame: Option<u64>,
    uniform_group: wgpu::BindGroup,

    texture_group_layout: wgpu::BindGroupLayout,
    texture_group: Option<wgpu::BindGroup>,
    bound: Vec<Option<(wgpu::TextureView, wgpu::Sampler)>>,
    fallback: Texture,
}

impl WgpuProgram {
    /// Validates both stages with naga, reflects their uniform block and
    /// builds the pipelines.
    pub fn compile(device: &wgpu::Device, queue: &wgpu::Queue, desc: &ProgramDesc<'_>) -> Result<Self, ProgramError> {
        let vertex = parse_stage(desc.label, Stage::Vertex, &desc.vertex)?;
        let fragment = parse_stage(desc.label, Stage::Fragment, &desc.fragment)?;

        let layout = match (reflect_uniform_block(&vertex), reflect_uniform_block(&fragment)) {
            (Some(v), Some(f)) if v == f => v,
            (Some(_), Some(_)) => {
                return Err(ProgramError::LayoutMismatch {
                    label: desc.label.to_owned(),
                });
            }
            (Some(layout), None) | (None, Some(layout)) => layout,
            (None, None) => {
                return Err(ProgramError::MissingUniformBlock {
                    label: desc.label.to_owned(),
                });
            }
        };

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.vertex.source.into()),
        });
        let separate_fragment = (desc.fragment.source != desc.vertex.source).then(|| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{} fragment", desc.label)),
                source: wgpu::ShaderSource::Wgsl(desc.fragment.source.into()),
            })
        });
        let fragment_module = separate_fragment.as_ref().unwrap_or(&vertex_module);

        let block_size = NonZeroU64::new(u64::from(layout.size));

        let uniform_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} uniform bgl", desc.label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: block_size,
                },
                count: None,
            }],
        });

        let texture_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} texture bgl", desc.label)),
            entries: &texture_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", desc.label)),
            bind_group_layouts: &[&uniform_group_layout, &texture_group_layout],
            immediate_size: 0,
        });

        let build = |polygon_mode: wgpu::PolygonMode, suffix: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{} {suffix} pipeline", desc.label)),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(desc.vertex.entry_point),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment_module,
                    entry_point: Some(desc.fragment.entry_point),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: desc.depth_format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let fill_pipeline = build(wgpu::PolygonMode::Fill, "fill");

        let line_supported = device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        let line_pipeline = match (desc.wireframe, line_supported) {
            (true, true) if desc.topology == wgpu::PrimitiveTopology::TriangleList => {
                Some(build(wgpu::PolygonMode::Line, "line"))
            }
            (true, false) => {
                log::warn!("program '{}': device lacks POLYGON_MODE_LINE, wireframe disabled", desc.label);
                None
            }
            _ => None,
        };

        let arena_capacity = desc.max_draws_per_frame.max(1);
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let arena_stride = u64::from(layout.size).div_ceil(alignment) * alignment;

        let arena = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} uniform arena", desc.label)),
            size: arena_stride * u64::from(arena_capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} uniform bind group", desc.label)),
            layout: &uniform_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &arena,
                    offset: 0,
                    size: block_size,
                }),
            }],
        });

        log::debug!(
            "program '{}': {} uniforms in {} bytes, arena {}x{}",
            desc.label,
            layout.slots.len(),
            layout.size,
            arena_capacity,
            arena_stride
        );

        Ok(Self {
            label: desc.label.to_owned(),
            staging: vec![0; layout.size as usize],
            layout,
            fill_pipeline,
            line_pipeline,
            arena,
            arena_stride,
            arena_capacity,
            arena_cursor: 0,
            arena_frame: None,
            uniform_group,
            texture_group_layout,
            texture_group: None,
            bound: (0..TEXTURE_SLOTS).map(|_| None).collect(),
            fallback: Texture::solid(device, queue, [255; 4], 0),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn supports_wireframe(&self) -> bool {
        self.line_pipeline.is_some()
    }

    /// Records one indexed draw of `mesh` with the current uniforms and textures.
    ///
    /// `wireframe` selects the line pipeline when one was built.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        mesh: &Mesh,
        wireframe: bool,
    ) -> Result<(), ProgramError> {
        if self.arena_frame != Some(ctx.frame_index) {
            self.arena_frame = Some(ctx.frame_index);
            self.arena_cursor = 0;
        }

        if self.arena_cursor >= self.arena_capacity {
            return Err(ProgramError::ArenaExhausted {
                label: self.label.clone(),
                capacity: self.arena_capacity,
            });
        }

        let offset = u64::from(self.arena_cursor) * self.arena_stride;
        ctx.queue.write_buffer(&self.arena, offset, &self.staging);
        self.arena_cursor += 1;

        self.ensure_texture_group(ctx.device);

        let pipeline = match (&self.line_pipeline, wireframe) {
            (Some(line), true) => line,
            _ => &self.fill_pipeline,
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.uniform_group, &[offset as u32]);
        if let Some(group) = &self.texture_group {
            pass.set_bind_group(1, group, &[]);
        }
        mesh.bind(pass);
        pass.draw_indexed(0..mesh.index_count(), 0, 0..1);

        Ok(())
    }

    fn ensure_texture_group(&mut self, device: &wgpu::Device) {
        if self.texture_group.is_some() {
            return;
        }

        let resources: Vec<(&wgpu::TextureView, &wgpu::Sampler)> = self
            .bound
            .iter()
            .map(|slot| match slot {
                Some((view, sampler)) => (view, sampler),
                None => (self.fallback.view(), self.fallback.sampler()),
            })
            .collect();

        let mut entries = Vec::with_capacity(2 * resources.len());
        for (i, (view, _)) in resources.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        for (i, (_, sampler)) in resources.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: TEXTURE_SLOTS + i as u32,
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }

        self.texture_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} texture bind group", self.label)),
            layout: &self.texture_group_layout,
            entries: &entries,
        }));
    }

    fn write<T: Pod>(&mut self, offset: u32, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let start = offset as usize;
        self.staging[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl ProgramBackend for WgpuProgram {
    type Location = UniformSlot;
    type Texture = Texture;

    fn uniform_location(&self, name: &str) -> Option<UniformSlot> {
        self.layout.get(name)
    }

    fn upload(&mut self, name: &str, slot: UniformSlot, value: &UniformValue) -> Result<(), UniformError> {
        let at = slot.offset;
        match (*value, slot.ty) {
            (UniformValue::Bool(b), SlotType::Int | SlotType::Uint) => self.write(at, &[u32::from(b)]),
            (UniformValue::Int(i), SlotType::Int) => self.write(at, &[i]),
            (UniformValue::Int(i), SlotType::Uint) if i >= 0 => self.write(at, &[i as u32]),
            (UniformValue::Float(f), SlotType::Float) => self.write(at, &[f]),
            (UniformValue::Float3(v), SlotType::Vec3) => self.write(at, &v),
            (UniformValue::Vec3(v), SlotType::Vec3) => self.write(at, &v.to_array()),
            (UniformValue::Float4(v), SlotType::Vec4) => self.write(at, &v),
            (UniformValue::Vec4(v), SlotType::Vec4) => self.write(at, &v.to_array()),
            (UniformValue::Mat4(m), SlotType::Mat4) => self.write(at, &m.to_cols_array()),
            _ => {
                return Err(UniformError::TypeMismatch {
                    name: name.to_owned(),
                    expected: slot.ty.name(),
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }

    fn bind_texture(&mut self, texture: &Texture) -> Result<(), UniformError> {
        let slot = texture.slot();
        let entry = self
            .bound
            .get_mut(slot as usize)
            .ok_or(UniformError::TextureSlot { slot, slots: TEXTURE_SLOTS })?;

        *entry = Some((texture.view().clone(), texture.sampler().clone()));
        self.texture_group = None;
        Ok(())
    }
}

impl ShaderProgram<WgpuProgram> {
    pub fn compile(device: &wgpu::Device, queue: &wgpu::Queue, desc: &ProgramDesc<'_>) -> Result<Self, ProgramError> {
        WgpuProgram::compile(device, queue, desc).map(ShaderProgram::new)
    }

    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        mesh: &Mesh,
        wireframe: bool,
    ) -> Result<(), ProgramError> {
        self.backend_mut().draw(ctx, pass, mesh, wireframe)
    }
}

fn parse_stage(label: &str, stage: Stage, src: &StageSource<'_>) -> Result<naga::Module, ProgramError> {
    let compile_error = |message: String| ProgramError::Compile {
        label: label.to_owned(),
        stage,
        message,
    };

    let module = naga::front::wgsl::parse_str(src.source).map_err(|e| compile_error(e.emit_to_string(src.source)))?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(error_chain(e.as_inner())))?;

    let naga_stage = match stage {
        Stage::Vertex => naga::ShaderStage::Vertex,
        Stage::Fragment => naga::ShaderStage::Fragment,
    };
    if !module
        .entry_points
        .iter()
        .any(|ep| ep.name == src.entry_point && ep.stage == naga_stage)
    {
        return Err(compile_error(format!("no {stage} entry point named '{}'", src.entry_point)));
    }

    Ok(module)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn texture_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    let textures = (0..TEXTURE_SLOTS).map(|i| wgpu::BindGroupLayoutEntry {
        binding: i,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    });
    let samplers = (0..TEXTURE_SLOTS).map(|i| wgpu::BindGroupLayoutEntry {
        binding: TEXTURE_SLOTS + i,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    textures.chain(samplers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        struct Uniforms { model: mat4x4<f32> }
        @group(0) @binding(0) var<uniform> u: Uniforms;

        @vertex
        fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
            return u.model * vec4<f32>(p, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    "#;

    #[test]
    fn syntax_errors_name_the_stage() {
        let err = parse_stage("broken", Stage::Fragment, &StageSource::new("fn fs_main( {", "fs_main")).unwrap_err();
        match err {
            ProgramError::Compile { label, stage, message } => {
                assert_eq!(label, "broken");
                assert_eq!(stage, Stage::Fragment);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let err = parse_stage("p", Stage::Vertex, &StageSource::new(VALID, "main")).unwrap_err();
        assert!(err.to_string().contains("no vertex entry point named 'main'"));
    }

    #[test]
    fn entry_point_must_match_stage() {
        assert!(parse_stage("p", Stage::Vertex, &StageSource::new(VALID, "fs_main")).is_err());
        assert!(parse_stage("p", Stage::Fragment, &StageSource::new(VALID, "fs_main")).is_ok());
    }

    #[test]
    fn texture_layout_puts_samplers_after_textures() {
        let entries = texture_layout_entries();
        assert_eq!(entries.len(), 2 * TEXTURE_SLOTS as usize);
        assert!(matches!(entries[0].ty, wgpu::BindingType::Texture { .. }));
        assert_eq!(entries[TEXTURE_SLOTS as usize].binding, TEXTURE_SLOTS);
        assert!(matches!(entries[TEXTURE_SLOTS as usize].ty, wgpu::BindingType::Sampler(_)));
    }
}
