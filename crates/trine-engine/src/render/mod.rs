//! GPU rendering subsystem.
//!
//! - `params`: CPU-side per-object parameters and their packed GPU layouts
//! - `pipeline`: the one render pipeline each variant compiles
//! - `strategy`: how parameters are bound and drawn, behind `DrawStrategy`

pub mod params;
pub mod pipeline;
pub mod strategy;
mod target;

pub use target::RenderTarget;
