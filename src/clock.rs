// src/clock.rs

//! Monotonic elapsed-time source for timeout measurement.

use std::time::Duration;

use tokio::time::Instant;

/// Clock unaffected by wall-clock adjustments.
///
/// Backed by `tokio::time::Instant`, so tests running with a paused Tokio
/// clock see the same time as the supervisor's sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }

    pub fn now(&self) -> Instant {
        Instant::now()
    }

    /// Time since `start`.
    ///
    /// Saturates at zero instead of panicking, so a source that stops
    /// advancing only disables the timeout.
    pub fn elapsed(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }

    /// Whether `timeout` has elapsed since `start`. A zero timeout never
    /// expires.
    pub fn expired(&self, start: Instant, timeout: Duration) -> bool {
        !timeout.is_zero() && self.elapsed(start) >= timeout
    }
}
