/// Color format of the off-screen scene target.
///
/// sRGB so the UI pass can sample it and composite without a transfer step.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Depth format of the off-screen scene target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Validated target dimensions.
///
/// Requests are clamped to at least 1x1; a zero-area viewport panel (e.g.
/// collapsed by the user) must never produce an invalid allocation. Fields
/// are private so the clamp cannot be bypassed with a struct literal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.height
    }

    /// Applies a resize request; returns true when the stored size changed
    /// (i.e. the caller must reallocate attachments).
    #[inline]
    pub fn request(&mut self, width: u32, height: u32) -> bool {
        let next = Self::new(width, height);
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Off-screen render target: color + depth attachments sized to the
/// viewport panel.
///
/// Attachments are reallocated (new textures, fresh views) whenever the
/// requested size differs from the current one; identical requests are
/// no-ops. The color texture carries `TEXTURE_BINDING` usage so the UI layer
/// can display it as an image.
pub struct SceneTarget {
    size: TargetSize,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl SceneTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = TargetSize::new(width, height);
        let (color_view, depth_view) = allocate(device, size);
        Self {
            size,
            color_view,
            depth_view,
        }
    }

    /// Reallocates the attachments when the requested dimensions differ from
    /// the current ones. Returns true on reallocation so the caller can
    /// rebind anything that references the old color view.
    pub fn resize_if_needed(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("scene target resize request {width}x{height} clamped to 1x1 minimum");
        }

        if !self.size.request(width, height) {
            return false;
        }

        let (color_view, depth_view) = allocate(device, self.size);
        self.color_view = color_view;
        self.depth_view = depth_view;

        log::debug!(
            "scene target resized to {}x{}",
            self.size.width,
            self.size.height
        );
        true
    }

    pub fn size(&self) -> TargetSize {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.size.aspect()
    }

    /// The color attachment's view, for sampling/display by the UI layer.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Begins the scene pass: clears color + depth and directs subsequent
    /// draws into this target. Dropping the returned pass restores the
    /// encoder for the presentation pass.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

fn allocate(device: &wgpu::Device, size: TargetSize) -> (wgpu::TextureView, wgpu::TextureView) {
    let extent = wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    };

    let color = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glint scene color"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });

    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glint scene depth"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

    (color_view, depth_view)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn zero_dimensions_clamp_to_one() {
        assert_eq!(TargetSize::new(0, 0), TargetSize::new(1, 1));
        assert_eq!(TargetSize::new(0, 720).width(), 1);
        assert_eq!(TargetSize::new(1280, 0).height(), 1);
    }

    // ── request / reallocation decisions ──────────────────────────────────

    #[test]
    fn identical_request_is_a_no_op() {
        let mut size = TargetSize::new(800, 600);
        assert!(!size.request(800, 600));
        assert_eq!(size, TargetSize::new(800, 600));
    }

    #[test]
    fn resize_sequence_reallocates_exactly_once() {
        let mut size = TargetSize::new(1280, 720);

        let mut reallocations = 0;
        for (w, h) in [(640, 360), (640, 360)] {
            if size.request(w, h) {
                reallocations += 1;
            }
        }

        assert_eq!(reallocations, 1);
        assert_eq!(size, TargetSize::new(640, 360));
    }

    #[test]
    fn clamped_request_matches_clamped_current_size() {
        // 0x0 and 1x1 normalize to the same size; no reallocation between them.
        let mut size = TargetSize::new(1, 1);
        assert!(!size.request(0, 0));
    }

    #[test]
    fn aspect_tracks_dimensions() {
        assert!((TargetSize::new(800, 600).aspect() - 800.0 / 600.0).abs() < f32::EPSILON);
        assert!((TargetSize::new(1280, 720).aspect() - 16.0 / 9.0).abs() < 1e-6);
    }
}
