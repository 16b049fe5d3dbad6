//! Polled software timer
//!
//! [`Interval`] is the only timing primitive in the crate. It owns no clock:
//! the caller passes the current [`Instant`] on every check, so every effect
//! and poller driven from the same loop iteration observes the same `now`.

use embassy_time::{Duration, Instant};

use crate::config::DEFAULT_BLINK_PERIOD;

/// Timer that reports the passage of a fixed period.
///
/// A freshly created or re-armed interval fires on its very first check,
/// whatever the elapsed time. Effects therefore start on the tick that
/// follows their activation instead of one period later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    last_fired: Instant,
    armed: bool,
}

impl Interval {
    /// Create an armed interval with the given period
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: Instant::from_ticks(0),
            armed: true,
        }
    }

    /// Period between two successful checks
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether the next check fires unconditionally
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Set a new period and force the next check to fire
    pub fn arm(&mut self, period: Duration) {
        self.period = period;
        self.armed = true;
    }

    /// Force the next check to fire, keeping the current period
    pub fn reset(&mut self) {
        self.armed = true;
    }

    /// Check whether the period has passed since the last successful check.
    ///
    /// Returns `true` at most once per period and records `now` as the new
    /// reference point. A `false` result leaves the interval untouched.
    ///
    /// The elapsed time is computed with wrapping tick arithmetic, so a
    /// free-running counter that rolls over keeps producing correct results.
    pub fn elapsed(&mut self, now: Instant) -> bool {
        if self.armed || self.since_last(now) >= self.period {
            self.armed = false;
            self.last_fired = now;
            return true;
        }
        false
    }

    fn since_last(&self, now: Instant) -> Duration {
        Duration::from_ticks(now.as_ticks().wrapping_sub(self.last_fired.as_ticks()))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_PERIOD)
    }
}
