//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - reporting an unavailable device exactly once (`gate`)

mod error;
pub mod gate;
mod gpu;
mod init;
mod surface;

pub use error::{CapabilityError, SurfaceErrorAction};
pub use gate::{ErrorSurface, LogErrorSurface};
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::clamp_surface_size;
