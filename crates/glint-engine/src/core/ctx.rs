use winit::dpi::LogicalSize;
use winit::window::{Window, WindowId};

use super::app::AppControl;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{FramePass, RenderCtx};
use crate::time::FrameTime;

/// Window handle exposed to the application.
pub struct WindowCtx<'a> {
    id: WindowId,
    window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub(crate) fn new(window: &'a Window) -> Self {
        Self {
            id: window.id(),
            window,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn raw(&self) -> &'a Window {
        self.window
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    pub fn logical_size(&self) -> LogicalSize<f32> {
        self.window
            .inner_size()
            .to_logical(self.window.scale_factor())
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Everything the application needs for one frame.
///
/// Input is a read-only snapshot sampled before the frame callback; the
/// runtime clears the per-frame edges after the callback returns.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub time: FrameTime,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    gpu: &'a mut Gpu<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    pub(crate) fn new(
        window: &'a Window,
        gpu: &'a mut Gpu<'w>,
        input: &'a InputState,
        input_frame: &'a InputFrame,
        time: FrameTime,
    ) -> Self {
        Self {
            window: WindowCtx::new(window),
            time,
            input,
            input_frame,
            gpu,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    /// Acquires a frame, clears the surface, and hands the encoder to the
    /// caller for pass recording.
    ///
    /// Surface loss is handled here: transient errors skip the frame,
    /// out-of-memory requests exit. The surface is presented only after the
    /// callback's commands are submitted.
    pub fn render<F>(&mut self, clear: wgpu::Color, record: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut FramePass<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error; shutting down");
                        AppControl::Exit
                    }
                };
            }
        };

        frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("surface clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        {
            let ctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                self.gpu.size(),
                self.window.scale_factor() as f32,
            );
            let mut pass = FramePass::new(&mut frame.encoder, &frame.view);
            record(&ctx, &mut pass);
        }

        self.window.raw().pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
