use std::time::{Duration, Instant};

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started. Drives every animation.
    pub elapsed: f32,
    /// Seconds since the previous tick, capped. Scales camera movement.
    pub delta: f32,
}

/// Wall-clock frame timer.
///
/// Animation reads `elapsed`, so a stalled frame never accumulates drift;
/// only `delta` is capped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    max_delta: Duration,
}

impl FrameClock {
    pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            max_delta: Self::DEFAULT_MAX_DELTA,
        }
    }

    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. A `now` earlier than the last tick yields zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last).min(self.max_delta);
        self.last = self.last.max(now);
        FrameTime {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            delta: delta.as_secs_f32(),
        }
    }

    /// Elapsed seconds at the last tick.
    pub fn elapsed(&self) -> f32 {
        self.last.saturating_duration_since(self.start).as_secs_f32()
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
    fn delta_is_time_since_previous_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let a = clock.tick_at(start + Duration::from_millis(16));
        assert!((a.delta - 0.016).abs() < 1e-6);
        let b = clock.tick_at(start + Duration::from_millis(50));
        assert!((b.delta - 0.034).abs() < 1e-6);
        assert!((b.elapsed - 0.050).abs() < 1e-6);
    }

    #[test]
    fn delta_is_capped_but_elapsed_is_not() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let frame = clock.tick_at(start + Duration::from_secs(3));
        assert!((frame.delta - 0.1).abs() < 1e-6);
        assert!((frame.elapsed - 3.0).abs() < 1e-6);
        assert!((clock.elapsed() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn custom_cap() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start).with_max_delta(Duration::from_secs(1));
        let frame = clock.tick_at(start + Duration::from_millis(500));
        assert!((frame.delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_is_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.tick_at(start + Duration::from_millis(40));
        let frame = clock.tick_at(start + Duration::from_millis(20));
        assert_eq!(frame.delta, 0.0);
    }
}
