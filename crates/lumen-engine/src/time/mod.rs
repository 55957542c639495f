//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per presented frame.
//! The clock is independent of the runtime so simulation code can be tested
//! with synthetic `FrameTime` values.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
