//! Frame driver.
//!
//! A continuously re-triggering per-frame task. Each frame re-schedules the
//! next one before doing any work; an external collaborator stops the loop
//! through a [`StopHandle`].

mod frame_driver;

pub use frame_driver::{DriverState, FrameDriver, FrameScheduler, FrameTicket, StopHandle};
