//! Single light channel with steady and blinking modes

use embassy_time::{Duration, Instant};

use super::{ChannelAddress, LEVEL_MAX, LEVEL_OFF, Level, LightDriver};
use crate::interval::Interval;

/// What currently drives the channel level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Level only changes on explicit calls
    Steady,
    /// Level alternates between two values on every blink period
    Blinking,
}

/// One controllable light output.
///
/// The channel remembers the level it had before the last change so that
/// [`Channel::toggle`] can restore it. Driver writes happen only when the
/// level actually changes.
#[derive(Debug)]
pub struct Channel<D: LightDriver> {
    address: ChannelAddress,
    driver: D,
    level: Level,
    previous_level: Level,
    mode: ChannelMode,
    blink: Interval,
    configured: bool,
}

impl<D: LightDriver> Channel<D> {
    /// Create an unconfigured channel that is off
    pub fn new(address: ChannelAddress, driver: D) -> Self {
        Self {
            address,
            driver,
            level: LEVEL_OFF,
            previous_level: LEVEL_MAX,
            mode: ChannelMode::Steady,
            blink: Interval::default(),
            configured: false,
        }
    }

    /// Peripheral address of the channel
    pub const fn address(&self) -> ChannelAddress {
        self.address
    }

    /// Current level
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Whether the current level is above zero
    pub const fn is_on(&self) -> bool {
        self.level > LEVEL_OFF
    }

    /// Whether the output has a PWM lane
    pub const fn is_dimmable(&self) -> bool {
        self.address.is_dimmable()
    }

    /// Active mode
    pub const fn mode(&self) -> ChannelMode {
        self.mode
    }

    /// Whether the blink effect is running
    pub fn is_blinking(&self) -> bool {
        self.mode == ChannelMode::Blinking
    }

    /// Whether the driver has been configured
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Borrow the driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Configure the output. Subsequent calls do nothing.
    pub fn configure(&mut self) {
        if self.configured {
            return;
        }
        self.driver.configure(self.address);
        self.configured = true;
    }

    /// Set the level and stop any running effect
    pub fn on(&mut self, level: Level) {
        self.mode = ChannelMode::Steady;
        self.set_level(level);
    }

    /// Turn the channel off and stop any running effect
    pub fn off(&mut self) {
        self.on(LEVEL_OFF);
    }

    /// Restore the previous level and stop any running effect
    pub fn toggle(&mut self) {
        self.on(self.previous_level);
    }

    /// Set the level without touching the running effect.
    ///
    /// The driver is only written when `level` differs from the current
    /// level; in that case the old level becomes the toggle target.
    pub fn set_level(&mut self, level: Level) {
        let level = level.min(LEVEL_MAX);
        if level == self.level {
            return;
        }
        self.configure();
        self.previous_level = self.level;
        self.level = level;
        self.driver.write(self.address, level);
    }

    /// Start blinking between `high` and `low`.
    ///
    /// Does nothing when both levels are equal. The first tick after this
    /// call switches the channel to `high`.
    pub fn blink(&mut self, period: Duration, high: Level, low: Level) {
        let (high, low) = (high.min(LEVEL_MAX), low.min(LEVEL_MAX));
        if high == low {
            return;
        }
        self.off();
        self.mode = ChannelMode::Blinking;
        self.blink.arm(period);
        self.level = low;
        self.previous_level = high;
    }

    /// Advance the blink effect
    pub fn tick(&mut self, now: Instant) {
        if self.mode != ChannelMode::Blinking {
            return;
        }
        if self.blink.elapsed(now) {
            self.set_level(self.previous_level);
        }
    }
}
