//! Time subsystem.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame. Its
//! elapsed seconds drive the animated `time` parameter.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
