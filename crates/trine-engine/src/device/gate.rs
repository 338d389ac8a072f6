//! Capability gate.
//!
//! Initialization either yields a ready device/surface pair or reports one
//! user-visible message and stops. No pipeline or buffer is created on the
//! failure path, and nothing is retried.

use super::CapabilityError;

/// Where the single initialization failure message is shown.
pub trait ErrorSurface {
    fn show_error(&mut self, message: &str);
}

/// Native error surface.
///
/// The message goes to the log at `error` level, or straight to stderr when
/// that level is filtered out, so it is shown exactly once either way.
#[derive(Debug, Default)]
pub struct LogErrorSurface;

impl ErrorSurface for LogErrorSurface {
    fn show_error(&mut self, message: &str) {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{message}");
        } else {
            eprintln!("error: {message}");
        }
    }
}

/// Passes an acquired capability on to `build`, or reports why it is missing.
///
/// On `Err` the surface receives exactly one message and `build` is never
/// invoked.
pub fn open<T, R, B>(
    acquired: Result<T, CapabilityError>,
    surface: &mut dyn ErrorSurface,
    build: B,
) -> Option<R>
where
    B: FnOnce(T) -> R,
{
    match acquired {
        Ok(value) => Some(build(value)),
        Err(err) => {
            surface.show_error(&err.to_string());
            None
        }
    }
}
