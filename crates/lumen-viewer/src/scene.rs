use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use image::{Rgba, RgbaImage};

use lumen_engine::lighting::{Light, LightKind};
use lumen_engine::render::primitives::{cube, line, line_indices, quad_indices, VertexStyle};
use lumen_engine::render::{Mesh, RenderCtx, Texture, TextureParams};
use lumen_engine::shader::{ProgramDesc, ShaderProgram, Uniform, WgpuProgram};

use crate::config::ViewerConfig;

const LIT_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/lit.wgsl")
);
const LIGHT_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/light.wgsl")
);
const LINES_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/lines.wgsl")
);

const DIFFUSE_FILE: &str = "woodcontainer_steelborder.png";
const SPECULAR_FILE: &str = "woodcontainer_steelborder_specular.png";
const EMISSIVE_FILE: &str = "matrix.jpg";

const DIFFUSE_SLOT: u32 = 0;
const SPECULAR_SLOT: u32 = 1;
const EMISSIVE_SLOT: u32 = 2;

const PROCEDURAL_SIZE: u32 = 256;
const BORDER: u32 = 18;

const CUBE_POSITION: Vec3 = Vec3::ZERO;
const MARKER_SCALE: f32 = 0.2;

/// Per-frame camera and mode values shared by every draw.
pub struct FrameView {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub scene_time: f32,
    pub wireframe: bool,
}

/// GPU resources of the demo scene.
pub struct Scene {
    cube: Mesh,
    axes: Mesh,

    diffuse: Texture,
    specular: Texture,
    emissive: Texture,

    lit: ShaderProgram<WgpuProgram>,
    marker: ShaderProgram<WgpuProgram>,
    lines: ShaderProgram<WgpuProgram>,

    shininess: f32,
    emissive_scroll: f32,
}

impl Scene {
    pub fn load(ctx: &RenderCtx<'_>, config: &ViewerConfig) -> Result<Self> {
        let style = VertexStyle::default();
        let cube_vertices = cube(CUBE_POSITION, Vec3::X, Vec3::Y, Vec3::Z, 1.0, &style);
        let cube = Mesh::new(ctx.device, "cube", &cube_vertices, &quad_indices(&cube_vertices));

        let axis_vertices = [
            line(Vec3::ZERO, Vec3::X, 1.0, Vec3::X),
            line(Vec3::ZERO, Vec3::Y, 1.0, Vec3::Y),
            line(Vec3::ZERO, Vec3::Z, 1.0, Vec3::Z),
        ]
        .concat();
        let axes = Mesh::new(ctx.device, "axes", &axis_vertices, &line_indices(&axis_vertices));

        let [diffuse, specular, emissive] = match &config.texture_dir {
            Some(dir) => load_texture_files(ctx, dir)?,
            None => {
                log::info!("no texture directory given, using procedural textures");
                procedural_textures(ctx)
            }
        };

        let mut lit_desc = ProgramDesc::new("lit", LIT_SHADER, ctx);
        lit_desc.wireframe = true;
        let mut marker_desc = ProgramDesc::new("light marker", LIGHT_SHADER, ctx);
        marker_desc.wireframe = true;
        let mut lines_desc = ProgramDesc::new("lines", LINES_SHADER, ctx);
        lines_desc.topology = wgpu::PrimitiveTopology::LineList;

        let lit = ShaderProgram::<WgpuProgram>::compile(ctx.device, ctx.queue, &lit_desc)
            .context("failed to build lit program")?;
        let marker = ShaderProgram::<WgpuProgram>::compile(ctx.device, ctx.queue, &marker_desc)
            .context("failed to build light marker program")?;
        let lines = ShaderProgram::<WgpuProgram>::compile(ctx.device, ctx.queue, &lines_desc)
            .context("failed to build lines program")?;

        Ok(Self {
            cube,
            axes,
            diffuse,
            specular,
            emissive,
            lit,
            marker,
            lines,
            shininess: config.shininess,
            emissive_scroll: config.emissive_scroll,
        })
    }

    /// Records the container, one marker per point light, and the axes.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        frame: &FrameView,
        lights: &[Light],
    ) -> Result<()> {
        self.draw_container(ctx, pass, frame, lights).context("container draw failed")?;

        for light in lights.iter().filter(|l| l.kind == LightKind::Point) {
            let model = Mat4::from_translation(light.position)
                * Mat4::from_scale(Vec3::splat(MARKER_SCALE));
            self.marker.set_uniforms(&[
                Uniform::new("u_model", model),
                Uniform::new("u_view", frame.view),
                Uniform::new("u_projection", frame.projection),
                Uniform::new("u_light_color", light.specular),
                Uniform::new("u_object_color", Vec3::ONE),
            ])?;
            self.marker.draw(ctx, pass, &self.cube, frame.wireframe)?;
        }

        self.lines.set_uniforms(&[
            Uniform::new("u_model", Mat4::IDENTITY),
            Uniform::new("u_view", frame.view),
            Uniform::new("u_projection", frame.projection),
        ])?;
        self.lines.draw(ctx, pass, &self.axes, false)?;

        Ok(())
    }

    fn draw_container(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        frame: &FrameView,
        lights: &[Light],
    ) -> Result<()> {
        let model = Mat4::from_translation(CUBE_POSITION);

        self.lit.set_textures(&[
            ("u_material.diffuse", &self.diffuse),
            ("u_material.specular", &self.specular),
            ("u_material.emissive", &self.emissive),
        ])?;
        self.lit.set_uniforms(&[
            Uniform::new("u_model", model),
            Uniform::new("u_ti_model", model.inverse().transpose()),
            Uniform::new("u_view", frame.view),
            Uniform::new("u_projection", frame.projection),
            Uniform::new("u_view_position", frame.eye),
            Uniform::new("u_material.shininess", self.shininess),
            Uniform::new("u_tex_t_offset", self.emissive_scroll * frame.scene_time),
        ])?;
        self.lit.set_lights("u_lights", "u_light_count", lights)?;
        self.lit.draw(ctx, pass, &self.cube, frame.wireframe)?;

        Ok(())
    }
}

fn load_texture_files(ctx: &RenderCtx<'_>, dir: &Path) -> Result<[Texture; 3]> {
    let load = |file: &str, slot: u32| {
        Texture::from_file(ctx.device, ctx.queue, dir.join(file), slot, TextureParams::default())
    };

    Ok([
        load(DIFFUSE_FILE, DIFFUSE_SLOT)?,
        load(SPECULAR_FILE, SPECULAR_SLOT)?,
        load(EMISSIVE_FILE, EMISSIVE_SLOT)?,
    ])
}

fn procedural_textures(ctx: &RenderCtx<'_>) -> [Texture; 3] {
    let upload = |label: &str, image: RgbaImage, slot: u32| {
        Texture::from_image(
            ctx.device,
            ctx.queue,
            Some(label),
            image,
            slot,
            TextureParams::default(),
        )
    };

    [
        upload("procedural diffuse", container_diffuse(PROCEDURAL_SIZE), DIFFUSE_SLOT),
        upload("procedural specular", container_specular(PROCEDURAL_SIZE), SPECULAR_SLOT),
        upload("procedural emissive", matrix_emissive(PROCEDURAL_SIZE), EMISSIVE_SLOT),
    ]
}

fn on_border(x: u32, y: u32, size: u32) -> bool {
    x < BORDER || y < BORDER || x >= size - BORDER || y >= size - BORDER
}

/// Wooden planks inside a steel frame.
fn container_diffuse(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if on_border(x, y, size) {
            return Rgba([150, 155, 160, 255]);
        }
        let plank = (y / 32) % 2;
        let grain = ((x * 7 + y * 3) % 23) as u8;
        match plank {
            0 => Rgba([140 + grain, 90 + grain / 2, 45, 255]),
            _ => Rgba([120 + grain, 75 + grain / 2, 38, 255]),
        }
    })
}

/// Shiny frame, matte wood.
fn container_specular(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if on_border(x, y, size) {
            Rgba([210, 210, 210, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// Green glyph columns on black.
fn matrix_emissive(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let column = x / 8;
        let lit = x % 8 != 0 && hash(column, y / 6) % 3 == 0;
        if lit {
            let g = 120 + (hash(column, y) % 136) as u8;
            Rgba([0, g, g / 4, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// Cheap integer hash for procedural patterns.
fn hash(a: u32, b: u32) -> u32 {
    let mut h = a.wrapping_mul(0x9E37_79B9) ^ b.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 13)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── procedural textures ───────────────────────────────────────────────

    #[test]
    fn specular_frame_is_shiny_and_wood_is_matte() {
        let image = container_specular(64);
        assert_eq!(image.get_pixel(0, 0)[0], 210);
        assert_eq!(image.get_pixel(63, 40)[0], 210);
        assert_eq!(image.get_pixel(32, 32)[0], 0);
    }

    #[test]
    fn diffuse_frame_matches_specular_frame() {
        let size = 96;
        let diffuse = container_diffuse(size);
        let specular = container_specular(size);
        for (x, y, px) in specular.enumerate_pixels() {
            let steel = diffuse.get_pixel(x, y) == &Rgba([150, 155, 160, 255]);
            assert_eq!(px[0] > 0, steel, "({x}, {y})");
        }
    }

    #[test]
    fn emissive_is_green_on_black() {
        let image = matrix_emissive(128);
        assert!(image.pixels().any(|p| p[1] > 0));
        assert!(image.pixels().all(|p| p[0] == 0 && p[3] == 255));
    }

    // ── shaders ───────────────────────────────────────────────────────────

    fn validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
        module
    }

    #[test]
    fn viewer_shaders_validate() {
        for source in [LIT_SHADER, LIGHT_SHADER, LINES_SHADER] {
            validate(source);
        }
    }

    #[test]
    fn lit_shader_exposes_material_and_light_array() {
        let layout = lumen_engine::shader::reflect_uniform_block(&validate(LIT_SHADER)).unwrap();
        for name in [
            "u_model",
            "u_ti_model",
            "u_view_position",
            "u_tex_t_offset",
            "u_material.diffuse",
            "u_material.shininess",
            "u_lights[0].position",
            "u_lights[7].outer_cut_off",
            "u_light_count",
        ] {
            assert!(layout.get(name).is_some(), "{name}");
        }
    }
}
