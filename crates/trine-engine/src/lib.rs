//! trine engine crate.
//!
//! Platform + GPU runtime for the triangle demos: device acquisition behind a
//! capability gate, a self-rescheduling frame driver, the per-object
//! parameter store and the interchangeable draw strategies.

pub mod core;
pub mod device;
pub mod driver;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
