/// Device and surface settings requested at startup.
///
/// Surface preferences are requests: anything the adapter does not offer
/// falls back to a supported value (see `surface.rs`).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one exists so linear shading output
    /// is encoded on store.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,

    pub depth_format: wgpu::TextureFormat,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    /// Ask for `POLYGON_MODE_LINE`; its absence only disables wireframe.
    pub request_wireframe: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth32Float,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            request_wireframe: true,
        }
    }
}
