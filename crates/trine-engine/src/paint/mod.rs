//! Color representation for clear values and configuration.

pub mod color;

pub use color::{Color, ParseColorError};
