use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use winit::window::Window;

/// Something that can arrange for the next frame callback.
pub trait FrameScheduler {
    fn schedule_frame(&self);
}

/// Redraw requests follow the display's refresh cadence.
impl FrameScheduler for Window {
    fn schedule_frame(&self) {
        self.request_redraw();
    }
}

/// Clonable stop flag shared with whoever owns the loop's lifetime.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the driver to stop at its next frame boundary.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    /// No callback pending. Only transient between frames, or before `start`.
    Idle,
    /// A frame callback is pending.
    Scheduled,
    /// Stop was requested; nothing is ever scheduled again.
    Stopped,
}

/// Proof that the next frame is already scheduled; work may proceed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameTicket {
    pub frame_index: u64,
}

/// Drives the per-frame loop.
///
/// The host guarantees frame callbacks never overlap, so the driver needs no
/// locking; only the stop flag crosses threads.
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    stop: StopHandle,
    frames: u64,
}

impl FrameDriver {
    pub fn new(stop: StopHandle) -> Self {
        Self {
            state: DriverState::Idle,
            stop,
            frames: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of frames entered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Schedules the first frame. No-op unless idle.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
        if self.state == DriverState::Idle && !self.check_stop() {
            scheduler.schedule_frame();
            self.state = DriverState::Scheduled;
        }
    }

    /// Enters a frame callback.
    ///
    /// Re-schedules the next frame before returning, so the caller's work can
    /// never starve the loop. Returns `None` once the stop flag is set.
    pub fn enter_frame<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) -> Option<FrameTicket> {
        if self.state == DriverState::Stopped {
            return None;
        }

        // The pending callback is being consumed.
        self.state = DriverState::Idle;

        if self.check_stop() {
            return None;
        }

        scheduler.schedule_frame();
        self.state = DriverState::Scheduled;

        let ticket = FrameTicket {
            frame_index: self.frames,
        };
        self.frames += 1;
        Some(ticket)
    }

    fn check_stop(&mut self) -> bool {
        if self.stop.is_stopped() {
            if self.state != DriverState::Stopped {
                log::debug!("frame driver stopped after {} frames", self.frames);
            }
            self.state = DriverState::Stopped;
            true
        } else {
            false
        }
    }
}
