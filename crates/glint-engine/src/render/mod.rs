mod ctx;
pub mod scene;
mod target;

pub use ctx::{FramePass, RenderCtx};
pub use scene::{PointLight, SceneRenderer, Vertex};
pub use target::{SceneTarget, TargetSize};
