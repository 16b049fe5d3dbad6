//! Default timings, capacities and bus configuration.
//!
//! Pin numbers and topic names are project wiring and are not defined here.

use embassy_time::Duration;

/// Default blink period for channels and groups
pub const DEFAULT_BLINK_PERIOD: Duration = Duration::from_millis(1000);

/// Default delay between two channels igniting in a sequential run
pub const DEFAULT_STAGGER_PERIOD: Duration = Duration::from_millis(250);

/// Default period of the connecting/connected link poll
pub const DEFAULT_LINK_POLL_PERIOD: Duration = Duration::from_millis(1000);

/// Default blink period of a status light while the link is down
pub const DEFAULT_STATUS_BLINK_PERIOD: Duration = Duration::from_millis(250);

/// Maximum length of a topic carried by the network event queue
pub const MAX_TOPIC_LEN: usize = 64;

/// Maximum length of an inbound payload carried by the network event queue
pub const MAX_PAYLOAD_LEN: usize = 32;

/// Timings used when a project starts blink or sequential effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTimings {
    /// High/low phase duration
    pub blink: Duration,
    /// Delay between igniting consecutive channels of a group
    pub stagger: Duration,
}

impl Default for EffectTimings {
    fn default() -> Self {
        Self {
            blink: DEFAULT_BLINK_PERIOD,
            stagger: DEFAULT_STAGGER_PERIOD,
        }
    }
}

/// Configuration of the bus client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig<'t> {
    /// Topic carrying the retained `online`/`offline` token.
    ///
    /// `offline` is registered as the session's last will.
    pub availability_topic: &'t str,
}
