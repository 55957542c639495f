//! Input-to-motion mapping for the first-person camera.
//!
//! [`binding_for`] maps keys to [`Action`]s; [`Controller`] turns those
//! actions, cursor samples and wheel input into camera motion and mode flags.
//! The controller never owns the camera: every call that moves or turns it
//! takes the camera explicitly.

mod bindings;
mod controller;

pub use bindings::{binding_for, Action, MoveAxis, MOVEMENT_KEYS};
pub use controller::{
    Controller, ControllerConfig, DEFAULT_SENSITIVITY, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW, ZOOM_STEP,
};
