use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{gate, CapabilityError, ErrorSurface, Gpu, GpuInit, LogErrorSurface};
use crate::driver::{FrameDriver, StopHandle};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trine".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// How the event loop ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunOutcome {
    /// The window closed or the loop was stopped.
    Completed,
    /// The capability gate reported a missing device or surface.
    Unavailable,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` until its window closes, logging a missing GPU as an error.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<RunOutcome>
    where
        A: CoreApp,
    {
        Self::run_with(initial, gpu_init, app, &mut LogErrorSurface, StopHandle::new())
    }

    /// Like [`run`](Self::run) with an explicit error surface and stop flag.
    pub fn run_with<A>(
        initial: RuntimeConfig,
        gpu_init: GpuInit,
        app: A,
        error_surface: &mut dyn ErrorSurface,
        stop: StopHandle,
    ) -> Result<RunOutcome>
    where
        A: CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            initial,
            gpu_init,
            app,
            entry: None,
            driver: FrameDriver::new(stop),
            error_surface,
            outcome: RunOutcome::Completed,
            setup_error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.setup_error {
            Some(e) => Err(e),
            None => Ok(state.outcome),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<'s, A>
where
    A: CoreApp,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    driver: FrameDriver,
    error_surface: &'s mut dyn ErrorSurface,

    outcome: RunOutcome,
    setup_error: Option<anyhow::Error>,
}

impl<A> AppState<'_, A>
where
    A: CoreApp,
{
    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.stop_handle().stop();
        event_loop.exit();
    }

    /// Window → capability gate → app setup → first frame.
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let gpu_init = self.gpu_init.clone();
        let acquired: Result<WindowEntry, CapabilityError> = event_loop
            .create_window(attrs)
            .map_err(|e| CapabilityError::Window(e.to_string()))
            .and_then(|window| {
                WindowEntryTryBuilder {
                    clock: FrameClock::default(),
                    window,
                    gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
                }
                .try_build()
            });

        let app = &mut self.app;
        let opened = gate::open(acquired, &mut *self.error_surface, |entry| {
            let ready = entry.with_gpu(|gpu| app.on_gpu_ready(gpu));
            (entry, ready)
        });

        let Some((entry, ready)) = opened else {
            self.outcome = RunOutcome::Unavailable;
            return Ok(());
        };
        ready.context("demo setup failed")?;

        entry.with_window(|w| self.driver.start(w));
        self.entry = Some(entry);
        Ok(())
    }
}

impl<A> ApplicationHandler for AppState<'_, A>
where
    A: CoreApp,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.open_window(event_loop) {
            self.setup_error = Some(e);
        }

        if self.entry.is_none() {
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Covers a stop requested while no redraw is being delivered (minimized).
        if self.driver.stop_handle().is_stopped() {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::RedrawRequested => {
                let (app, driver) = (&mut self.app, &mut self.driver);

                let control = entry.with_mut(|fields| {
                    let Some(ticket) = driver.enter_frame(fields.window) else {
                        return AppControl::Exit;
                    };

                    let time = fields.clock.tick();
                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        time,
                        ticket,
                    };
                    app.on_frame(&mut ctx)
                });

                if control == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
