mod app;
mod ctx;

pub use app::{App, AppControl, EventReply};
pub use ctx::{FrameCtx, WindowCtx};
