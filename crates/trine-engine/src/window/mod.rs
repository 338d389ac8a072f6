//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer,
//! the capability gate and the frame driver.

mod runtime;

pub use runtime::{RunOutcome, Runtime, RuntimeConfig};
