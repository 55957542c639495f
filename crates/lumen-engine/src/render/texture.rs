use std::path::Path;

use anyhow::{Context, Result};

use crate::shader::TextureSlot;

/// Sampling parameters for a texture.
#[derive(Debug, Copy, Clone)]
pub struct TextureParams {
    pub address_mode: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    /// Flip rows on load so `v = 0` is the bottom of the image.
    pub flip_y: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            address_mode: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            flip_y: false,
        }
    }
}

/// A 2D RGBA8 texture with its sampler and the slot it binds to.
pub struct Texture {
    slot: u32,
    size: (u32, u32),
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    /// Decodes an image file and uploads it.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        slot: u32,
        params: TextureParams,
    ) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to decode texture {}", path.display()))?
            .to_rgba8();

        let label = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(Self::from_image(device, queue, label.as_deref(), image, slot, params))
    }

    /// Uploads an already decoded image.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: Option<&str>,
        mut image: image::RgbaImage,
        slot: u32,
        params: TextureParams,
    ) -> Self {
        if params.flip_y {
            image::imageops::flip_vertical_in_place(&mut image);
        }

        let (width, height) = image.dimensions();
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label,
            address_mode_u: params.address_mode,
            address_mode_v: params.address_mode,
            address_mode_w: params.address_mode,
            mag_filter: params.mag_filter,
            min_filter: params.min_filter,
            ..Default::default()
        });

        log::debug!("texture {:?}: {width}x{height} on slot {slot}", label.unwrap_or("<unnamed>"));

        Self {
            slot,
            size: (width, height),
            _texture: texture,
            view,
            sampler,
        }
    }

    /// A 1x1 texture of a single color, used for unbound slots.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], slot: u32) -> Self {
        let image = image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_image(device, queue, Some("lumen solid texture"), image, slot, TextureParams::default())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

impl TextureSlot for Texture {
    fn slot(&self) -> u32 {
        self.slot
    }
}
