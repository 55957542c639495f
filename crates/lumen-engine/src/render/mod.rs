//! GPU rendering building blocks.
//!
//! CPU-side geometry builders (`primitives`), the vertex format they produce,
//! and thin owners for the GPU objects drawn with them (`Mesh`, `Texture`).
//!
//! Convention:
//! - right-handed world space, +Y up
//! - counter-clockwise front faces
//! - `u32` indices

mod ctx;
mod mesh;
pub mod primitives;
mod texture;
mod vertex;

pub use ctx::RenderCtx;
pub use mesh::Mesh;
pub use texture::{Texture, TextureParams};
pub use vertex::{transform, Color, TexCoord, Vertex, Vertices};
