/// Renderer-facing context for one frame.
///
/// Borrowed from the GPU layer for the duration of the draw callback.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub size: (u32, u32),
    /// Index of the frame being recorded; per-frame GPU arenas reset when it changes.
    pub frame_index: u64,
}

impl<'a> RenderCtx<'a> {
    /// Width over height, guarded against a zero height while minimized.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        w.max(1) as f32 / h.max(1) as f32
    }
}
