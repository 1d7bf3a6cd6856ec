use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Per-frame input deltas.
///
/// [`InputState`](super::InputState) provides the current state (held
/// keys/buttons, pointer position); `InputFrame` provides the transitions
/// observed since the last frame. The runtime clears it after every
/// `on_frame` call.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Accumulated pointer movement this frame, in logical pixels.
    pub pointer_delta: (f32, f32),

    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Mouse buttons pressed this frame.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Mouse buttons released this frame.
    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.pointer_delta = (0.0, 0.0);
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }
}
