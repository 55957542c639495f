//! wgpu device, window surface and depth buffer.
//!
//! [`Gpu`] owns the device/queue and a surface target that follows window
//! resizes; each frame is acquired as a [`GpuFrame`] and handed back through
//! [`Gpu::submit`].

mod depth;
mod gpu;
mod init;
mod surface;

pub use depth::DepthBuffer;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::{GpuFrame, SurfaceErrorAction};
