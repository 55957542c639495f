//! Window surface, its depth attachment and the acquire/present cycle.

use winit::dpi::PhysicalSize;

use super::DepthBuffer;

/// What the caller should do after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory).
    Fatal,
}

/// One acquired swapchain image plus the encoder recording into it.
///
/// Holding it blocks the next acquire; [`Gpu::submit`](super::Gpu::submit)
/// consumes and presents it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Surface preferences resolved against the adapter's capabilities.
pub(crate) struct SurfacePrefs {
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub depth_format: wgpu::TextureFormat,
    pub frame_latency: u32,
}

/// A configured surface and the depth buffer sized with it.
pub(crate) struct SurfaceTarget<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceTarget<'w> {
    pub fn new(
        surface: wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        prefs: SurfacePrefs,
        size: PhysicalSize<u32>,
    ) -> Option<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = choose_surface_format(&caps.formats, prefs.prefer_srgb)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: choose_present_mode(&caps.present_modes, prefs.present_mode),
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, prefs.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: prefs.frame_latency,
        };
        surface.configure(device, &config);

        log::debug!(
            "surface configured: {:?} {}x{} {:?}",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Some(Self {
            surface,
            depth: DepthBuffer::new(device, prefs.depth_format, size),
            config,
            size,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Records the new size and reconfigures when it has an area.
    ///
    /// A minimized window reports 0x0, which wgpu rejects; configuration then
    /// waits for the next non-empty resize.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.size = size;
        if !has_area(size) {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device, &self.config);
        self.depth = DepthBuffer::new(device, self.depth.format(), size);
    }

    pub fn acquire(&self, device: &wgpu::Device) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lumen frame encoder"),
        });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Applies the policy of [`classify_surface_error`], reconfiguring the
    /// surface when that is the remedy.
    pub fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = classify_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured if has_area(self.size) => self.surface.configure(device, &self.config),
            SurfaceErrorAction::Fatal => log::error!("surface error: {err}"),
            _ => log::debug!("surface error: {err}"),
        }
        action
    }
}

fn has_area(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// First sRGB format when preferred, otherwise the surface's first choice.
pub(crate) fn choose_surface_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| prefer_srgb && f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// The requested mode when offered, otherwise FIFO (always supported).
pub(crate) fn choose_present_mode(modes: &[wgpu::PresentMode], requested: wgpu::PresentMode) -> wgpu::PresentMode {
    if modes.contains(&requested) {
        requested
    } else {
        log::warn!("present mode {requested:?} unsupported, using Fifo");
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use wgpu::{CompositeAlphaMode, PresentMode, SurfaceError, TextureFormat};

    use super::*;

    // ── format / mode selection ───────────────────────────────────────────

    #[test]
    fn srgb_preferred_when_available() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Rgba16Float));
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let modes = [PresentMode::Fifo, PresentMode::Mailbox];
        assert_eq!(choose_present_mode(&modes, PresentMode::Mailbox), PresentMode::Mailbox);
        assert_eq!(choose_present_mode(&modes, PresentMode::Immediate), PresentMode::Fifo);
    }

    #[test]
    fn alpha_mode_honours_supported_request() {
        let modes = [CompositeAlphaMode::Opaque, CompositeAlphaMode::PreMultiplied];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PostMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    // ── error policy ──────────────────────────────────────────────────────

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(classify_surface_error(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify_surface_error(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }

    #[test]
    fn zero_sized_window_has_no_area() {
        assert!(!has_area(PhysicalSize::new(0, 720)));
        assert!(!has_area(PhysicalSize::new(1280, 0)));
        assert!(has_area(PhysicalSize::new(1, 1)));
    }
}
