//! Glint engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the studio layer:
//! the window/event loop, the wgpu device context, input sampling, frame
//! timing, the fly camera, off-screen scene rendering, and glTF asset loading.

pub mod asset;
pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
