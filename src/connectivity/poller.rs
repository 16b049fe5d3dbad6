//! Fixed-period connecting/connected poll
//!
//! Some consumers need a steady signal while the device is still trying to
//! connect, e.g. to keep a status light blinking. [`LinkPoller`] samples the
//! connection on its own interval and reports on every call.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::DEFAULT_LINK_POLL_PERIOD;
use crate::interval::Interval;

/// Result of a link poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Still trying to connect. `first` is set on the first report after the
    /// link was lost (or after startup).
    Connecting { first: bool },
    /// Connected. `first` is set on the first report after the link came up.
    Connected { first: bool },
}

impl LinkStatus {
    /// Whether this is the first report of a new state
    pub const fn is_first(self) -> bool {
        match self {
            Self::Connecting { first } | Self::Connected { first } => first,
        }
    }

    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// Two-state connection poll
#[derive(Debug, Clone)]
pub struct LinkPoller {
    interval: Interval,
    connecting: bool,
    first: bool,
}

impl LinkPoller {
    /// Create a poller that starts in the connecting state.
    ///
    /// The interval is armed, so the first poll samples the link at once.
    pub const fn new(period: Duration) -> Self {
        Self {
            interval: Interval::new(period),
            connecting: true,
            first: true,
        }
    }

    /// Whether the last sample found the link down
    pub const fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Report the link status, sampling `connected` once per period
    pub fn poll(&mut self, now: Instant, connected: bool) -> LinkStatus {
        if self.interval.elapsed(now) {
            if connected && self.connecting {
                #[cfg(feature = "esp32-log")]
                println!("[LinkPoller.poll] link connected");
                self.connecting = false;
                self.first = true;
            } else if !connected && !self.connecting {
                #[cfg(feature = "esp32-log")]
                println!("[LinkPoller.poll] link lost, reconnecting");
                self.connecting = true;
                self.first = true;
            }
        }

        let first = core::mem::take(&mut self.first);
        if self.connecting {
            LinkStatus::Connecting { first }
        } else {
            LinkStatus::Connected { first }
        }
    }
}

impl Default for LinkPoller {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_POLL_PERIOD)
    }
}
