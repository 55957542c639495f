//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s via
//! [`translate_window_event`].

mod frame;
mod state;
mod translate;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub(crate) use translate::{translate_window_event, VirtualCursor};
pub use types::{InputEvent, Key, KeyState, MouseWheelDelta, PointerMoveEvent};
