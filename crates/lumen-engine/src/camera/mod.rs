//! First-person camera.
//!
//! [`orientation`] holds the angle → direction math; [`Camera`] owns the
//! pose and derives view/projection matrices from it.

pub mod orientation;
mod view;

pub use orientation::{PITCH_LIMIT, WORLD_UP};
pub use view::Camera;
