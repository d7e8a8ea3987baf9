//! High-resolution page clock (`performance.now()`).

use std::cell::Cell;
use std::time::Instant;

/// Milliseconds since the page's time origin.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Clock anchored at construction time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Deterministic clock for tests and replays.
///
/// Advances by `step` on every reading.
#[derive(Debug, Clone)]
pub struct FixedClock {
    next: Cell<f64>,
    step: f64,
}

impl FixedClock {
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// Render a timestamp the way JavaScript stringifies numbers.
///
/// Integral values have no fractional part (`42`, not `42.0`).
pub fn format_timing(ms: f64) -> String {
    if ms.is_finite() && ms.fract() == 0.0 && ms.abs() < 1e15 {
        format!("{}", ms as i64)
    } else {
        format!("{ms}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_does_not_go_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(a >= 0.0);
    }

    #[test]
    fn test_fixed_clock_steps() {
        let clock = FixedClock::new(100.0, 0.5);
        assert_eq!(clock.now(), 100.0);
        assert_eq!(clock.now(), 100.5);
    }

    #[test]
    fn test_format_timing() {
        assert_eq!(format_timing(42.0), "42");
        assert_eq!(format_timing(1234.5), "1234.5");
        assert_eq!(format_timing(0.0), "0");
    }
}
