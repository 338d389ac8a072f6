use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the first tick. `0.0` on the first frame.
    pub elapsed: f32,
}

/// Animation clock for the render loop.
///
/// The first tick fixes the origin; every later tick reports the time since
/// then. Elapsed time is never clamped, so a stalled window resumes at the
/// wall-clock position of the animation.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        FrameTime {
            elapsed: now.saturating_duration_since(start).as_secs_f32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_tick_starts_at_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()).elapsed, 0.0);
    }

    #[test]
    fn elapsed_tracks_timestamps_without_clamping() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(3));
        assert!((ft.elapsed - 3.0).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        let mut last = clock.tick_at(t0).elapsed;
        for ms in [1, 16, 17, 250, 1000] {
            let e = clock.tick_at(t0 + Duration::from_millis(ms)).elapsed;
            assert!(e >= last);
            last = e;
        }
    }

    #[test]
    fn timestamps_before_the_origin_saturate() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new();
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 - Duration::from_millis(5)).elapsed, 0.0);
    }
}
