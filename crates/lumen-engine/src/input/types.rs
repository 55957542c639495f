use std::fmt;

/// Keys the viewer can bind.
///
/// Anything else arrives as `Unknown` with the platform key code, so bindings
/// stay total without naming every key on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "key #{code}"),
            named => fmt::Debug::fmt(named, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Wheel travel as reported by the platform.
///
/// Mouse wheels report whole lines; touchpads report pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Pixel travel counted as one wheel line.
    pub const PIXELS_PER_LINE: f32 = 20.0;

    /// Vertical travel in lines; positive scrolls up (zooms in).
    pub fn lines_y(&self) -> f32 {
        match *self {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Absolute cursor sample in physical pixels.
///
/// While the cursor is grabbed the runtime synthesizes these from raw mouse
/// motion, so coordinates may leave the window rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Input event with platform types stripped.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// Platform key code, 0 when unidentified.
        code: u32,
        /// Auto-repeat of a held key.
        repeat: bool,
    },
    PointerMoved(PointerMoveEvent),
    MouseWheel { delta: MouseWheelDelta },
    PointerEntered,
    PointerLeft,
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_wheel_travel_converts_to_lines() {
        assert_eq!(MouseWheelDelta::Line { x: 0.0, y: -2.0 }.lines_y(), -2.0);
        assert_eq!(MouseWheelDelta::Pixel { x: 5.0, y: 30.0 }.lines_y(), 1.5);
    }

    #[test]
    fn keys_display_by_name_or_code() {
        assert_eq!(Key::ArrowUp.to_string(), "ArrowUp");
        assert_eq!(Key::Unknown(42).to_string(), "key #42");
    }
}
