use crate::input::Key;

/// Movement axis driven by a held key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MoveAxis {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveAxis {
    pub(crate) const ALL: [MoveAxis; 4] = [
        MoveAxis::Forward,
        MoveAxis::Back,
        MoveAxis::Left,
        MoveAxis::Right,
    ];
}

/// Something a key does.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Move(MoveAxis),
    TogglePause,
    ToggleFlashlight,
    ToggleWireframe,
    MoreLights,
    FewerLights,
    Quit,
}

impl Action {
    pub fn axis(self) -> Option<MoveAxis> {
        match self {
            Action::Move(axis) => Some(axis),
            _ => None,
        }
    }
}

/// Every key bound to a movement axis.
pub const MOVEMENT_KEYS: [Key; 8] = [
    Key::W,
    Key::S,
    Key::A,
    Key::D,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
];

/// The fixed key map.
pub fn binding_for(key: Key) -> Option<Action> {
    let action = match key {
        Key::W | Key::ArrowUp => Action::Move(MoveAxis::Forward),
        Key::S | Key::ArrowDown => Action::Move(MoveAxis::Back),
        Key::A | Key::ArrowLeft => Action::Move(MoveAxis::Left),
        Key::D | Key::ArrowRight => Action::Move(MoveAxis::Right),

        Key::Space => Action::TogglePause,
        Key::F => Action::ToggleFlashlight,
        Key::T => Action::ToggleWireframe,
        Key::E => Action::MoreLights,
        Key::Q => Action::FewerLights,
        Key::Escape => Action::Quit,

        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_all_map_to_axes() {
        for key in MOVEMENT_KEYS {
            assert!(binding_for(key).and_then(Action::axis).is_some(), "{key}");
        }
    }

    #[test]
    fn every_axis_has_a_key() {
        for axis in MoveAxis::ALL {
            assert!(MOVEMENT_KEYS.iter().any(|k| binding_for(*k) == Some(Action::Move(axis))));
        }
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert_eq!(binding_for(Key::Z), None);
        assert_eq!(binding_for(Key::Unknown(77)), None);
    }
}
