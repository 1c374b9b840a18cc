use std::time::Instant;

/// Per-tick frame timing derived from a monotonic clock.
///
/// `delta` is the seconds between the two most recent ticks, clamped to zero
/// if the supplied timestamp precedes the previous one (a non-monotonic clock
/// must never drive the camera backwards). `elapsed` is the seconds since
/// construction and drives time-based animation.
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    start: Instant,
    last_tick: Instant,
    delta: f32,
    elapsed: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_tick: start,
            delta: 0.0,
            elapsed: 0.0,
        }
    }

    /// Advance to the current time. Call once at the top of each tick.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance to an explicit timestamp (test seam).
    pub fn tick_at(&mut self, now: Instant) {
        self.delta = now
            .checked_duration_since(self.last_tick)
            .map_or(0.0, |d| d.as_secs_f32());
        self.elapsed = now
            .checked_duration_since(self.start)
            .map_or(self.elapsed, |d| d.as_secs_f32());
        self.last_tick = now;
    }

    /// Seconds between the two most recent ticks. Never negative.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds since construction.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn delta_advances_with_the_clock() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        timing.tick_at(start + Duration::from_millis(16));
        assert!((timing.delta() - 0.016).abs() < 1e-4);
        assert!((timing.elapsed() - 0.016).abs() < 1e-4);
    }

    #[test]
    fn clock_rollback_clamps_delta_to_zero() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start + Duration::from_secs(1));
        timing.tick_at(start);
        assert_eq!(timing.delta(), 0.0);
        assert!(timing.delta().is_finite());
    }

    #[test]
    fn delta_is_never_negative_across_a_tick_sequence() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        let offsets = [10u64, 30, 20, 20, 50];
        for ms in offsets {
            timing.tick_at(start + Duration::from_millis(ms));
            assert!(timing.delta() >= 0.0);
        }
    }
}
