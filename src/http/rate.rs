use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Spacing between dispatches for `rps` requests per second.
///
/// Uses integer division of one second, so rates that do not divide 1e9
/// evenly run slightly fast (3 rps paces at 333_333_333ns). `None` means
/// unthrottled. Rates above 1e9 clamp to a 1ns period.
#[must_use]
pub const fn pacing_period(rps: u64) -> Option<Duration> {
    match NANOS_PER_SECOND.checked_div(rps) {
        Some(0) => Some(Duration::from_nanos(1)),
        Some(nanos) => Some(Duration::from_nanos(nanos)),
        None => None,
    }
}

/// Paces the dispatcher to a target request rate.
///
/// The first tick fires one period after construction. Ticks missed while
/// the dispatcher is blocked on backpressure are skipped rather than
/// replayed as a burst.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Interval>,
}

impl RateLimiter {
    /// Must be called from within a tokio runtime when `rps > 0`.
    #[must_use]
    pub fn new(rps: u64) -> Self {
        let interval = pacing_period(rps).map(|period| {
            let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        Self { interval }
    }

    #[must_use]
    pub const fn unthrottled() -> Self {
        Self { interval: None }
    }

    #[must_use]
    pub const fn is_throttled(&self) -> bool {
        self.interval.is_some()
    }

    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Waits for the next pacing tick; returns immediately when unthrottled.
    pub async fn wait(&mut self) {
        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }
    }
}
