use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::types::{InputEvent, Key, KeyState, MouseWheelDelta, PointerMoveEvent};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events the input subsystem does not represent.
/// Positions stay in physical pixels; the camera controller works on raw
/// cursor deltas and has no use for DPI scaling.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorEntered { .. } => Some(InputEvent::PointerEntered),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved(PointerMoveEvent {
            x: position.x as f32,
            y: position.y as f32,
        })),

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => MouseWheelDelta::Pixel {
                    x: p.x as f32,
                    y: p.y as f32,
                },
            };
            Some(InputEvent::MouseWheel { delta })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            let (key, code) = map_key(event.physical_key);

            Some(InputEvent::Key {
                key,
                state,
                code,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

/// Past this distance from the origin the virtual cursor is moved back to it,
/// keeping `f32` pointer positions precise to well under a pixel.
pub(crate) const RECENTER_LIMIT: f64 = 4096.0;

/// Cursor position integrated from raw mouse motion.
///
/// While the cursor is grabbed, window cursor positions stop at the window
/// edge; raw device deltas do not. The runtime feeds those deltas here and
/// forwards the result as ordinary pointer moves.
///
/// When a sample would leave `[-RECENTER_LIMIT, RECENTER_LIMIT]` the cursor
/// re-centres: it emits `PointerEntered` so consumers drop their anchor, a
/// move to the origin standing in for the previous position, then the move
/// by the new delta. Consumers that diff positions see every delta.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct VirtualCursor {
    x: f64,
    y: f64,
}

impl VirtualCursor {
    pub(crate) fn advance(&mut self, (dx, dy): (f64, f64), mut emit: impl FnMut(InputEvent)) {
        let (x, y) = (self.x + dx, self.y + dy);
        if x.abs() > RECENTER_LIMIT || y.abs() > RECENTER_LIMIT {
            emit(InputEvent::PointerEntered);
            emit(moved(0.0, 0.0));
            (self.x, self.y) = (dx, dy);
        } else {
            (self.x, self.y) = (x, y);
        }
        emit(moved(self.x, self.y));
    }
}

fn moved(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMoved(PointerMoveEvent {
        x: x as f32,
        y: y as f32,
    })
}

/// Generates the `KeyCode` to `Key` table for keys named the same way on
/// both sides.
macro_rules! key_table {
    ($($code:ident => $key:ident),* $(,)?) => {
        fn key_from_code(code: KeyCode) -> Key {
            match code {
                $(KeyCode::$code => Key::$key,)*
                other => Key::Unknown(other as u32),
            }
        }
    };
}

key_table! {
    Escape => Escape, Enter => Enter, Space => Space,
    ArrowUp => ArrowUp, ArrowDown => ArrowDown, ArrowLeft => ArrowLeft, ArrowRight => ArrowRight,
    KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F, KeyG => G,
    KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L, KeyM => M, KeyN => N,
    KeyO => O, KeyP => P, KeyQ => Q, KeyR => R, KeyS => S, KeyT => T, KeyU => U,
    KeyV => V, KeyW => W, KeyX => X, KeyY => Y, KeyZ => Z,
}

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    match pk {
        PhysicalKey::Code(code) => (key_from_code(code), code as u32),
        // NativeKeyCode carries no stable numeric value in winit 0.30.
        PhysicalKey::Unidentified(_) => (Key::Unknown(0), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(cursor: &mut VirtualCursor, delta: (f64, f64)) -> Vec<InputEvent> {
        let mut out = Vec::new();
        cursor.advance(delta, |ev| out.push(ev));
        out
    }

    // ── virtual cursor ────────────────────────────────────────────────────

    #[test]
    fn virtual_cursor_accumulates_deltas() {
        let mut cursor = VirtualCursor::default();
        advance(&mut cursor, (3.0, -2.0));
        let events = advance(&mut cursor, (1.5, 0.5));
        assert_eq!(events, [InputEvent::PointerMoved(PointerMoveEvent { x: 4.5, y: -1.5 })]);
    }

    #[test]
    fn long_one_way_drag_stays_bounded_and_keeps_small_deltas() {
        let mut cursor = VirtualCursor::default();
        let mut last: Option<(f32, f32)> = None;
        let mut recentred = 0;

        for _ in 0..100_000 {
            for ev in advance(&mut cursor, (0.25, -0.125)) {
                match ev {
                    InputEvent::PointerEntered => {
                        recentred += 1;
                        last = None;
                    }
                    InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                        assert!(f64::from(x.abs()) <= RECENTER_LIMIT);
                        assert!(f64::from(y.abs()) <= RECENTER_LIMIT);
                        if let Some((lx, ly)) = last {
                            assert_eq!((x - lx, y - ly), (0.25, -0.125));
                        }
                        last = Some((x, y));
                    }
                    other => panic!("unexpected event {other:?}"),
                }
            }
        }
        assert!(recentred > 0);
    }

    // ── key mapping ───────────────────────────────────────────────────────

    #[test]
    fn letter_and_arrow_keys_map() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)).0, Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)).0, Key::ArrowLeft);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space)).0, Key::Space);
    }

    #[test]
    fn unmapped_keys_keep_their_code() {
        let (key, code) = map_key(PhysicalKey::Code(KeyCode::F13));
        assert_eq!(key, Key::Unknown(code));
        let (key, _) = map_key(PhysicalKey::Code(KeyCode::Digit1));
        assert!(matches!(key, Key::Unknown(_)));
    }
}
