//! egui integration: winit event plumbing plus wgpu painting.
//!
//! The shell owns the egui context, the per-window winit state, and the
//! wgpu renderer. The off-screen scene texture is registered here and kept
//! under a stable `TextureId` so panel code can reference it every frame.

use egui_wgpu::ScreenDescriptor;
use winit::event::WindowEvent;
use winit::window::{Theme, Window};

use glint_engine::render::{FramePass, RenderCtx};

/// Output of one UI pass, carried from [`UiShell::run`] to [`UiShell::paint`].
pub struct UiFrameOutput {
    shapes: Vec<egui::epaint::ClippedShape>,
    pixels_per_point: f32,
}

/// Texture patches queued until the next successful paint.
///
/// egui emits each patch (font-atlas updates, new glyphs) exactly once.
/// When a frame is skipped after the UI pass ran (surface lost/outdated),
/// the patches must survive to the next frame or the renderer's atlas
/// diverges from egui's for the rest of the session.
#[derive(Default)]
struct TextureDeltaQueue {
    pending: egui::TexturesDelta,
}

impl TextureDeltaQueue {
    fn push(&mut self, delta: egui::TexturesDelta) {
        self.pending.append(delta);
    }

    fn take(&mut self) -> egui::TexturesDelta {
        std::mem::take(&mut self.pending)
    }
}

pub struct UiShell {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    textures: TextureDeltaQueue,
    scene_tex: Option<egui::TextureId>,
}

impl UiShell {
    pub fn new(window: &Window, device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();

        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            Some(Theme::Dark),
            None,
        );

        // No MSAA and no depth on the UI pass; the scene arrives as a
        // pre-rendered texture.
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            ctx,
            winit_state,
            renderer,
            textures: TextureDeltaQueue::default(),
            scene_tex: None,
        }
    }

    /// Feeds a window event to egui. The returned flag is true when egui
    /// claimed the event for one of its widgets.
    pub fn on_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Registers (or re-registers) the scene color texture.
    ///
    /// The `TextureId` stays stable across target reallocations; only the
    /// underlying binding is swapped.
    pub fn bind_scene(&mut self, device: &wgpu::Device, view: &wgpu::TextureView) -> egui::TextureId {
        match self.scene_tex {
            Some(id) => {
                self.renderer.update_egui_texture_from_wgpu_texture(
                    device,
                    view,
                    wgpu::FilterMode::Linear,
                    id,
                );
                id
            }
            None => {
                let id = self
                    .renderer
                    .register_native_texture(device, view, wgpu::FilterMode::Linear);
                self.scene_tex = Some(id);
                id
            }
        }
    }

    pub fn scene_tex(&self) -> Option<egui::TextureId> {
        self.scene_tex
    }

    /// True when an egui widget (e.g. a text field) wants keyboard input.
    pub fn wants_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Runs the UI callback for this frame and returns what [`paint`]
    /// needs later in the frame.
    ///
    /// Texture patches are queued on the shell rather than returned: if the
    /// frame is skipped and [`paint`] never runs, they are delivered with
    /// the next frame's patches instead of being lost.
    ///
    /// [`paint`]: UiShell::paint
    pub fn run(&mut self, window: &Window, mut build: impl FnMut(&egui::Context)) -> UiFrameOutput {
        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| build(ctx));

        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        self.textures.push(full_output.textures_delta);

        UiFrameOutput {
            shapes: full_output.shapes,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Paints the UI over the already-cleared surface, applying every
    /// texture patch queued since the last successful paint.
    pub fn paint(&mut self, ctx: &RenderCtx<'_>, pass: &mut FramePass<'_>, output: UiFrameOutput) {
        let UiFrameOutput {
            shapes,
            pixels_per_point,
        } = output;

        let textures_delta = self.textures.take();

        for (id, delta) in &textures_delta.set {
            self.renderer
                .update_texture(ctx.device, ctx.queue, *id, delta);
        }

        let primitives = self.ctx.tessellate(shapes, pixels_per_point);

        let screen = ScreenDescriptor {
            size_in_pixels: [ctx.surface_size.width, ctx.surface_size.height],
            pixels_per_point,
        };

        let callback_bufs =
            self.renderer
                .update_buffers(ctx.device, ctx.queue, pass.encoder, &primitives, &screen);
        if !callback_bufs.is_empty() {
            ctx.queue.submit(callback_bufs);
        }

        {
            // egui-wgpu wants a 'static pass; the encoder outlives it.
            let mut rpass = pass
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("ui pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: pass.surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.renderer.render(&mut rpass, &primitives, &screen);
        }

        for id in &textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(id: u64) -> (egui::TextureId, egui::epaint::ImageDelta) {
        let image = egui::ColorImage::new([2, 2], egui::Color32::WHITE);
        (
            egui::TextureId::User(id),
            egui::epaint::ImageDelta::full(image, egui::TextureOptions::LINEAR),
        )
    }

    #[test]
    fn patches_from_a_skipped_frame_survive_until_taken() {
        let mut queue = TextureDeltaQueue::default();

        let mut first = egui::TexturesDelta::default();
        first.set.push(patch(1));
        queue.push(first);

        // The frame that produced `first` was never painted; the next
        // frame's patches join it.
        let mut second = egui::TexturesDelta::default();
        second.set.push(patch(2));
        second.free.push(egui::TextureId::User(1));
        queue.push(second);

        let merged = queue.take();
        assert_eq!(merged.set.len(), 2);
        assert_eq!(merged.set[0].0, egui::TextureId::User(1));
        assert_eq!(merged.set[1].0, egui::TextureId::User(2));
        assert_eq!(merged.free.len(), 1);
    }

    #[test]
    fn take_drains_the_queue() {
        let mut queue = TextureDeltaQueue::default();

        let mut delta = egui::TexturesDelta::default();
        delta.set.push(patch(1));
        queue.push(delta);

        assert_eq!(queue.take().set.len(), 1);
        assert!(queue.take().set.is_empty());
    }
}
