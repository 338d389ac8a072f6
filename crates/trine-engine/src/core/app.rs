use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the demos.
pub trait App {
    /// Called once, after the capability gate opened and before the first frame.
    ///
    /// Pipelines and buffers are created here; on a failed gate this is never called.
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame, after the next frame has been scheduled.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
