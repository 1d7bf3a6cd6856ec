use crate::coords::Rect;
use crate::input::{InputFrame, InputState, Key, MouseButton};

/// One frame of camera motion derived from device state.
///
/// Axis values are -1/0/+1 intents; the camera scales them by speed and
/// elapsed time. `look` is raw pointer travel in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionDelta {
    /// Along the view direction (+ forward, - back).
    pub forward: f32,
    /// Along the camera-local right axis (+ right, - left).
    pub strafe: f32,
    /// Along world up (+ up, - down).
    pub lift: f32,
    /// Speed boost (held Shift).
    pub boost: bool,
    /// Pointer travel while orbiting, in logical pixels.
    pub look: (f32, f32),
}

impl MotionDelta {
    pub const ZERO: Self = Self {
        forward: 0.0,
        strafe: 0.0,
        lift: 0.0,
        boost: false,
        look: (0.0, 0.0),
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Per-frame gate for camera input, reported by the UI layer.
///
/// The camera only responds while the pointer is inside the viewport panel
/// and the panel is the active interaction target; this prevents camera
/// hijacking while the user works in other panels.
#[derive(Debug, Copy, Clone)]
pub struct ViewportGate {
    /// The viewport panel's rectangle in logical window pixels.
    pub region: Rect,
    /// True when the panel is the active target (hovered, and no other
    /// widget holds keyboard focus).
    pub active: bool,
}

/// Samples camera motion from current device state, gated by the viewport.
///
/// A blocking, synchronous read polled once per frame before the camera
/// update. Yields [`MotionDelta::ZERO`] unless the window is focused, the
/// gate is active, and the pointer lies inside the viewport region, no
/// matter which keys or buttons are physically held.
pub fn sample_motion(state: &InputState, frame: &InputFrame, gate: &ViewportGate) -> MotionDelta {
    let Some((px, py)) = state.pointer_pos else {
        return MotionDelta::ZERO;
    };

    if !state.focused || !gate.active || !gate.region.contains(px, py) {
        return MotionDelta::ZERO;
    }

    let axis = |pos: Key, neg: Key| -> f32 {
        (state.key_down(pos) as i8 - state.key_down(neg) as i8) as f32
    };

    let look = if state.button_down(MouseButton::Left) {
        frame.pointer_delta
    } else {
        (0.0, 0.0)
    };

    MotionDelta {
        forward: axis(Key::W, Key::S),
        strafe: axis(Key::D, Key::A),
        lift: axis(Key::Space, Key::Control),
        boost: state.key_down(Key::Shift),
        look,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState, Modifiers, MouseButtonState, PointerButtonEvent};

    fn active_gate() -> ViewportGate {
        ViewportGate {
            region: Rect::new(0.0, 0.0, 800.0, 600.0),
            active: true,
        }
    }

    fn state_with_keys(keys: &[Key]) -> (InputState, InputFrame) {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Focused(true));
        for &key in keys {
            state.apply_event(
                &mut frame,
                InputEvent::Key {
                    key,
                    state: KeyState::Pressed,
                    modifiers: Modifiers::default(),
                    repeat: false,
                },
            );
        }
        state.pointer_pos = Some((100.0, 100.0));
        (state, frame)
    }

    #[test]
    fn keys_map_to_motion_axes() {
        let (state, frame) = state_with_keys(&[Key::W, Key::D, Key::Space, Key::Shift]);
        let motion = sample_motion(&state, &frame, &active_gate());
        assert_eq!(motion.forward, 1.0);
        assert_eq!(motion.strafe, 1.0);
        assert_eq!(motion.lift, 1.0);
        assert!(motion.boost);
    }

    #[test]
    fn opposed_keys_cancel() {
        let (state, frame) = state_with_keys(&[Key::W, Key::S]);
        let motion = sample_motion(&state, &frame, &active_gate());
        assert_eq!(motion.forward, 0.0);
    }

    #[test]
    fn pointer_outside_region_yields_zero() {
        let (mut state, frame) = state_with_keys(&[Key::W]);
        state.pointer_pos = Some((900.0, 100.0));
        assert!(sample_motion(&state, &frame, &active_gate()).is_zero());
    }

    #[test]
    fn inactive_panel_yields_zero() {
        let (state, frame) = state_with_keys(&[Key::W]);
        let gate = ViewportGate {
            active: false,
            ..active_gate()
        };
        assert!(sample_motion(&state, &frame, &gate).is_zero());
    }

    #[test]
    fn unfocused_window_yields_zero() {
        // Focus loss clears held keys; re-press after losing focus to prove
        // the gate alone suffices.
        let (mut state, mut frame) = state_with_keys(&[Key::W]);
        state.focused = false;
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key: Key::W,
                state: KeyState::Pressed,
                modifiers: Modifiers::default(),
                repeat: false,
            },
        );
        state.pointer_pos = Some((100.0, 100.0));
        assert!(sample_motion(&state, &frame, &active_gate()).is_zero());
    }

    #[test]
    fn missing_pointer_yields_zero() {
        let (mut state, frame) = state_with_keys(&[Key::W]);
        state.pointer_pos = None;
        assert!(sample_motion(&state, &frame, &active_gate()).is_zero());
    }

    #[test]
    fn look_requires_held_left_button() {
        let (mut state, mut frame) = state_with_keys(&[]);
        frame.pointer_delta = (12.0, -4.0);

        let motion = sample_motion(&state, &frame, &active_gate());
        assert_eq!(motion.look, (0.0, 0.0));

        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 100.0,
                y: 100.0,
                modifiers: Modifiers::default(),
            }),
        );
        frame.pointer_delta = (12.0, -4.0);
        let motion = sample_motion(&state, &frame, &active_gate());
        assert_eq!(motion.look, (12.0, -4.0));
    }
}
