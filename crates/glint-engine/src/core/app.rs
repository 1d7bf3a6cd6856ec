use winit::event::WindowEvent;
use winit::window::Window;

use super::ctx::FrameCtx;

/// What the application wants the loop to do after a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Begin shutdown. The runtime finishes the current frame, drops GPU
    /// state, then exits the event loop.
    Exit,
}

/// Application verdict on a raw window event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventReply {
    /// Not handled; the runtime performs its default processing.
    Continue,
    /// Handled by an overlay (typically the UI); the runtime withholds the
    /// event from keyboard input sampling. Pointer events still update
    /// pointer state so hover gating stays accurate.
    Consumed,
    /// Begin shutdown.
    Exit,
}

/// The application hosted by the runtime.
///
/// The runtime owns the window, GPU context, clock, and input state; the
/// application supplies per-event and per-frame behavior through this trait.
pub trait App {
    /// Called for every window event before the runtime's own handling.
    ///
    /// The default implementation ignores the event.
    fn on_window_event(&mut self, _window: &Window, _event: &WindowEvent) -> EventReply {
        EventReply::Continue
    }

    /// Called once per frame with exclusive access to the frame context.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
