use winit::dpi::PhysicalSize;

/// Renderer-facing context (device/queue + surface parameters).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable surface size in physical pixels.
    pub surface_size: PhysicalSize<u32>,
    /// Window scale factor (physical px per logical px).
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        surface_size: PhysicalSize<u32>,
        scale_factor: f32,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            surface_size,
            scale_factor,
        }
    }
}

/// Recording surface for one frame (encoder + surface color view).
///
/// Applications record their passes here: the off-screen scene pass first,
/// then the UI pass onto `surface_view`.
pub struct FramePass<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub surface_view: &'a wgpu::TextureView,
}

impl<'a> FramePass<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, surface_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            surface_view,
        }
    }
}
