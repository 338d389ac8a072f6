//! Surface geometry shared by the runtime and the demos.

mod viewport;

pub use viewport::Viewport;
