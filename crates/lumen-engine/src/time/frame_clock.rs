use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created (or last reset).
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// teleport the camera on the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with the default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching `elapsed`.
    ///
    /// Used after the window regains focus so the first frame does not carry
    /// the whole time spent unfocused.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        assert_eq!(clock.tick_at(base + Duration::from_millis(16)).frame_index, 0);
        assert_eq!(clock.tick_at(base + Duration::from_millis(32)).frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_after_a_stall() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        let ft = clock.tick_at(base + Duration::from_secs(3));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        // Elapsed is not clamped.
        assert!((ft.elapsed - 3.0).abs() < 1e-3);
    }

    #[test]
    fn dt_has_a_floor() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        let ft = clock.tick_at(base);
        assert!((ft.dt - 0.0001).abs() < 1e-6);
    }
}
