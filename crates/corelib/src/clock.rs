//! Monotonic time sources for the render loop.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Elapsed time since the source was started. Never reset, never paused.
pub trait Clock {
    fn elapsed(&self) -> Duration;

    #[inline]
    fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

/// Wall-clock stopwatch started on construction.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for Stopwatch {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand-driven clock for deterministic tests and scripted playback.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_forward_when_told() {
        let c = ManualClock::new();
        assert_eq!(c.elapsed(), Duration::ZERO);
        c.advance(Duration::from_millis(1500));
        assert_eq!(c.elapsed_secs(), 1.5);
    }

    #[test]
    fn stopwatch_is_monotonic() {
        let s = Stopwatch::start();
        let a = s.elapsed();
        let b = s.elapsed();
        assert!(b >= a);
    }
}
