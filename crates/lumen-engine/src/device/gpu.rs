use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{SurfacePrefs, SurfaceTarget};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and the window's surface target.
///
/// `'w` ties the surface to the window it was created from; the runtime keeps
/// both in one self-referencing entry so the window outlives this value.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    _adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: SurfaceTarget<'w>,
}

impl<'w> Gpu<'w> {
    /// Creates the device and configures a surface for `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let (features, wireframe) = negotiate_features(&adapter, &init);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features: features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device")?;

        let prefs = SurfacePrefs {
            prefer_srgb: init.prefer_srgb,
            present_mode: init.present_mode,
            alpha_mode: init.alpha_mode,
            depth_format: init.depth_format,
            frame_latency: init.desired_maximum_frame_latency,
        };
        let target = SurfaceTarget::new(surface, &adapter, &device, prefs, size)
            .context("surface reports no supported formats")?;

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}, {:?}), surface {:?}, wireframe {}",
            info.name,
            info.device_type,
            info.backend,
            target.format(),
            if wireframe { "available" } else { "unavailable" }
        );

        Ok(Self {
            _instance: instance,
            _adapter: adapter,
            device,
            queue,
            target,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.target.format()
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.target.depth().format()
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.target.depth().view()
    }

    /// Drawable size in physical pixels; may be 0x0 while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.target.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.target.resize(&self.device, size);
    }

    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        self.target.acquire(&self.device)
    }

    /// Submits the frame's commands and presents its image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        self.target.recover(&self.device, err)
    }
}

/// Adds `POLYGON_MODE_LINE` to the required features when it was requested
/// and the adapter has it.
fn negotiate_features(adapter: &wgpu::Adapter, init: &GpuInit) -> (wgpu::Features, bool) {
    let line_mode = wgpu::Features::POLYGON_MODE_LINE;
    let wireframe = init.request_wireframe && adapter.features().contains(line_mode);

    if init.request_wireframe && !wireframe {
        log::info!("adapter lacks POLYGON_MODE_LINE; wireframe toggle disabled");
    }

    let mut features = init.required_features;
    if wireframe {
        features |= line_mode;
    }
    (features, wireframe)
}
