use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// A rendering capability could not be obtained during initialization.
///
/// This is the only error the gate recognizes. Every variant carries the
/// backend's own description so the single user-facing message is actionable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The platform refused to open a window.
    Window(String),
    /// The window has no drawable area yet.
    ZeroSize,
    /// The window could not back a wgpu surface.
    Surface(String),
    /// No adapter compatible with the surface was found.
    Adapter(String),
    /// The adapter refused to create a device/queue pair.
    Device(String),
    /// The surface reports no usable pixel formats.
    SurfaceFormat,
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(e) => write!(f, "graphics unavailable: cannot open a window ({e})"),
            Self::ZeroSize => write!(f, "graphics unavailable: window has zero size"),
            Self::Surface(e) => write!(f, "graphics unavailable: cannot create a drawing surface ({e})"),
            Self::Adapter(e) => write!(f, "graphics unavailable: no suitable GPU adapter ({e})"),
            Self::Device(e) => write!(f, "graphics unavailable: GPU device request failed ({e})"),
            Self::SurfaceFormat => {
                write!(f, "graphics unavailable: surface supports no pixel formats")
            }
        }
    }
}

impl std::error::Error for CapabilityError {}
