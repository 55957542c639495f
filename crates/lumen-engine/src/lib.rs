//! Lumen engine crate.
//!
//! Platform + GPU runtime pieces (window loop, device, input, timing) and the
//! first-person camera, input mapping, shader-uniform and lighting layers the
//! viewer builds on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;

pub mod camera;
pub mod control;
pub mod lighting;
pub mod shader;
