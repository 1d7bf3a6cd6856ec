//! The studio application: scene + camera + editor panels over the runtime.

use std::path::PathBuf;

use anyhow::Result;
use glam::Vec3;
use winit::event::WindowEvent;
use winit::window::Window;

use glint_engine::asset::Model;
use glint_engine::camera::{Camera, ViewportGate, sample_motion};
use glint_engine::coords::Rect;
use glint_engine::core::{App, AppControl, EventReply, FrameCtx};
use glint_engine::render::{SceneRenderer, SceneTarget};
use glint_engine::time::{FpsCounter, FpsSample};

use crate::ui::UiShell;

/// Scene background, a dark teal.
const SCENE_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.07,
    g: 0.13,
    b: 0.17,
    a: 1.0,
};

/// Window background behind the panels.
const WINDOW_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.06,
    a: 1.0,
};

/// GPU-backed scene state, created on the first frame once a device exists.
struct SceneState {
    renderer: SceneRenderer,
    target: SceneTarget,
    models: Vec<Model>,
    camera: Camera,
}

/// Where the viewport panel ended up last frame.
///
/// The scene target is resized to the panel's previous-frame extent, one
/// frame behind the UI.
struct ViewportPanel {
    /// Panel rectangle in UI points (== logical pixels).
    rect: Rect,
    /// Requested scene target extent in physical pixels.
    size_px: (u32, u32),
    hovered: bool,
}

pub struct StudioApp {
    model_paths: Vec<PathBuf>,
    fps: FpsCounter,
    last_fps: Option<FpsSample>,
    /// Draw submissions recorded by the previous frame's scene pass.
    last_draws: u32,
    scene: Option<SceneState>,
    ui: Option<UiShell>,
    viewport: ViewportPanel,
}

impl StudioApp {
    pub fn new(model_paths: Vec<PathBuf>) -> Self {
        Self {
            model_paths,
            fps: FpsCounter::default(),
            last_fps: None,
            last_draws: 0,
            scene: None,
            ui: None,
            viewport: ViewportPanel {
                rect: Rect::new(0.0, 0.0, 0.0, 0.0),
                size_px: (1, 1),
                hovered: false,
            },
        }
    }

    /// Builds GPU state on the first frame. A model that fails to load is a
    /// startup error; an empty model list is a valid (empty) scene.
    fn ensure_initialized(&mut self, ctx: &FrameCtx<'_, '_>) -> Result<()> {
        if self.scene.is_some() {
            return Ok(());
        }

        let device = ctx.device();
        let renderer = SceneRenderer::new(device);

        let mut models = Vec::with_capacity(self.model_paths.len());
        for path in &self.model_paths {
            models.push(Model::load(device, ctx.queue(), renderer.layouts(), path)?);
        }
        if models.is_empty() {
            log::warn!("no models found; rendering an empty scene");
        }

        // Sized to the window until the viewport panel reports its extent.
        let size = ctx.window.raw().inner_size();
        let target = SceneTarget::new(device, size.width, size.height);
        self.viewport.size_px = (size.width, size.height);

        let logical = ctx.window.logical_size();
        self.viewport.rect = Rect::new(0.0, 0.0, logical.width, logical.height);

        // Eye above and behind the origin, pitched down at it.
        let camera = Camera::new(Vec3::new(0.0, 6.0, 8.0), -90.0, -36.9);

        let mut ui = UiShell::new(ctx.window.raw(), device, ctx.surface_format());
        ui.bind_scene(device, target.color_view());

        self.scene = Some(SceneState {
            renderer,
            target,
            models,
            camera,
        });
        self.ui = Some(ui);
        Ok(())
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> EventReply {
        let Some(ui) = &mut self.ui else {
            return EventReply::Continue;
        };

        if ui.on_event(window, event) {
            EventReply::Consumed
        } else {
            EventReply::Continue
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(e) = self.ensure_initialized(ctx) {
            log::error!("startup failed: {e:#}");
            return AppControl::Exit;
        }

        if let Some(sample) = self.fps.add(f64::from(ctx.time.dt)) {
            ctx.window.set_title(&format!(
                "glint studio - {:.1} fps / {:.2} ms",
                sample.fps, sample.frame_ms
            ));
            self.last_fps = Some(sample);
        }

        let (Some(scene), Some(ui)) = (self.scene.as_mut(), self.ui.as_mut()) else {
            return AppControl::Exit;
        };

        // Apply the viewport extent reported by last frame's UI pass. On
        // reallocation the egui texture binding must follow the new view.
        let (w, h) = self.viewport.size_px;
        if scene.target.resize_if_needed(ctx.device(), w, h) {
            ui.bind_scene(ctx.device(), scene.target.color_view());
        }

        let gate = ViewportGate {
            region: self.viewport.rect,
            active: self.viewport.hovered && !ui.wants_keyboard(),
        };
        let motion = sample_motion(ctx.input, ctx.input_frame, &gate);
        scene.camera.update(motion, ctx.time.dt, scene.target.aspect());

        let scene_tex = match ui.scene_tex() {
            Some(id) => id,
            None => ui.bind_scene(ctx.device(), scene.target.color_view()),
        };

        let viewport = &mut self.viewport;
        let fps_sample = self.last_fps;
        let draws = self.last_draws;
        let camera_pos = scene.camera.position();
        let model_labels: Vec<String> = scene
            .models
            .iter()
            .map(|m| format!("{} ({} meshes)", m.label(), m.mesh_count()))
            .collect();
        let mut quit = false;

        let ui_output = ui.run(ctx.window.raw(), |egui_ctx| {
            egui::TopBottomPanel::top("menu_bar").show(egui_ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            quit = true;
                            ui.close_menu();
                        }
                    });
                });
            });

            egui::SidePanel::right("debug_panel")
                .default_width(220.0)
                .show(egui_ctx, |ui| {
                    ui.heading("Debug");
                    match fps_sample {
                        Some(s) => {
                            ui.label(format!("{:.1} fps", s.fps));
                            ui.label(format!("{:.2} ms / frame", s.frame_ms));
                        }
                        None => {
                            ui.label("measuring...");
                        }
                    }
                    ui.separator();
                    ui.label(format!(
                        "camera ({:.2}, {:.2}, {:.2})",
                        camera_pos.x, camera_pos.y, camera_pos.z
                    ));
                    ui.label(format!("{draws} draw calls"));
                    ui.separator();
                    ui.heading("Models");
                    if model_labels.is_empty() {
                        ui.label("(none)");
                    }
                    for label in &model_labels {
                        ui.label(label);
                    }
                });

            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(egui_ctx, |ui| {
                    let avail = ui.available_size();
                    let response = ui.add(
                        egui::Image::new(egui::load::SizedTexture::new(scene_tex, avail))
                            .sense(egui::Sense::click_and_drag()),
                    );

                    let rect = response.rect;
                    viewport.rect = Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height());
                    viewport.hovered = response.hovered();

                    let ppp = egui_ctx.pixels_per_point();
                    viewport.size_px = (
                        (rect.width() * ppp).round() as u32,
                        (rect.height() * ppp).round() as u32,
                    );
                });
        });

        let last_draws = &mut self.last_draws;
        let control = ctx.render(WINDOW_CLEAR, |rctx, pass| {
            {
                let mut rpass = scene.target.begin_pass(pass.encoder, SCENE_CLEAR);
                *last_draws =
                    scene
                        .renderer
                        .draw_all(rctx.queue, &mut rpass, &scene.models, &scene.camera);
            }

            ui.paint(rctx, pass, ui_output);
        });

        if quit {
            log::info!("quit requested from menu");
            return AppControl::Exit;
        }
        control
    }
}
