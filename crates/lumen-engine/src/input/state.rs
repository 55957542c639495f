use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for the window.
///
/// Holds "is down" information and the current cursor position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Cursor position in physical pixels, if inside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release everything on focus loss; the matching key-up
                    // events go to another window.
                    for key in self.keys_down.drain() {
                        frame.keys_released.insert(key);
                    }
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerEntered => {}

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::MouseWheel { delta } => {
                frame.wheel_lines += delta.lines_y();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, code: 0, repeat }
    }

    #[test]
    fn press_is_recorded_once_while_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, false));
        assert!(frame.pressed(Key::W));
        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, true));

        assert!(state.key_down(Key::W));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::A));
        assert!(frame.released(Key::A));
    }

    #[test]
    fn wheel_lines_accumulate_per_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
        });
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: 40.0 },
        });

        assert!((frame.wheel_lines - 3.0).abs() < 1e-6);
        frame.clear();
        assert_eq!(frame.wheel_lines, 0.0);
        assert!(frame.is_empty());
    }
}
