use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Input gathered between two redraws.
///
/// [`InputState`](super::InputState) answers "is it down now"; this answers
/// "what happened since the last frame". The runtime clears it after each
/// `on_frame` call.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Every event in arrival order, repeats included.
    pub events: Vec<InputEvent>,
    /// Down edges; auto-repeat does not re-insert.
    pub keys_pressed: HashSet<Key>,
    /// Up edges, including keys dropped on focus loss.
    pub keys_released: HashSet<Key>,
    /// Net vertical wheel travel in lines.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.wheel_lines = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// No events arrived this frame.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
