//! glint studio: a small model viewer.
//!
//! Renders glTF models found under `assets/models/` into an off-screen
//! target, displayed inside an egui viewport panel with a fly camera.

mod app;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use glint_engine::device::GpuInit;
use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;

const MODEL_DIR: &str = "assets/models";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let models = discover_models(Path::new(MODEL_DIR))?;
    log::info!("found {} model file(s) under {MODEL_DIR}", models.len());

    let config = RuntimeConfig {
        title: "glint studio".to_string(),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), StudioApp::new(models))
}

/// Lists glTF files under `dir`, sorted by name for a stable draw order.
///
/// A missing directory is not an error; the studio starts with an empty
/// scene.
fn discover_models(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::warn!("model directory {} not found", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in dir
        .read_dir()
        .with_context(|| format!("failed to read {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", dir.display()))?
            .path();

        let is_gltf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gltf") || e.eq_ignore_ascii_case("glb"));

        if is_gltf {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}
