//! Named shader parameters and their upload protocol.
//!
//! [`ShaderProgram`] resolves uniform names to backend locations once,
//! caches them, and applies ordered [`Uniform`] lists fail-fast. The
//! backend seam is [`ProgramBackend`]; [`WgpuProgram`] implements it on top
//! of a reflected WGSL uniform block.

mod error;
mod program;
mod reflect;
mod uniform;
mod wgpu_program;

pub use error::{ProgramError, Stage, UniformError};
pub use program::{ProgramBackend, ShaderProgram, TextureSlot};
pub use reflect::{reflect_uniform_block, SlotType, UniformLayout, UniformSlot};
pub use uniform::{Uniform, UniformValue};
pub use wgpu_program::{ProgramDesc, StageSource, WgpuProgram, TEXTURE_SLOTS};
