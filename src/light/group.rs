//! Three-channel group with synchronized and sequential effects
//!
//! The sequential run ignites the channels one after another (inner, middle,
//! outer) and extinguishes all of them at once, like a sequential taillight.

use embassy_time::{Duration, Instant};

use super::{Channel, LEVEL_MAX, LEVEL_OFF, Level, LightDriver};
use crate::config::{DEFAULT_BLINK_PERIOD, DEFAULT_STAGGER_PERIOD};
use crate::interval::Interval;

/// Effect currently driving the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// No group effect; channels run their own effects
    Idle,
    /// All channels blink in lockstep
    SynchronizedBlink,
    /// Ripple ignition followed by a synchronized drop
    SequentialRun,
}

/// Ordered triple of channels animated together
#[derive(Debug)]
pub struct Group<D: LightDriver> {
    channels: [Channel<D>; 3],
    mode: GroupMode,
    high_level: Level,
    low_level: Level,
    blink: Interval,
    stagger: Interval,
}

impl<D: LightDriver> Group<D> {
    /// Create a group from its inner, middle and outer channels
    pub fn new(inner: Channel<D>, middle: Channel<D>, outer: Channel<D>) -> Self {
        Self {
            channels: [inner, middle, outer],
            mode: GroupMode::Idle,
            high_level: LEVEL_MAX,
            low_level: LEVEL_OFF,
            blink: Interval::new(DEFAULT_BLINK_PERIOD),
            stagger: Interval::new(DEFAULT_STAGGER_PERIOD),
        }
    }

    /// Active group effect
    pub const fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Channels in ignition order
    pub const fn channels(&self) -> &[Channel<D>; 3] {
        &self.channels
    }

    /// Mutable access for per-channel effects while the group is idle
    pub fn channels_mut(&mut self) -> &mut [Channel<D>; 3] {
        &mut self.channels
    }

    /// First channel of the sequence
    pub const fn inner(&self) -> &Channel<D> {
        &self.channels[0]
    }

    /// Second channel of the sequence
    pub const fn middle(&self) -> &Channel<D> {
        &self.channels[1]
    }

    /// Last channel of the sequence
    pub const fn outer(&self) -> &Channel<D> {
        &self.channels[2]
    }

    /// Configure all channels
    pub fn configure(&mut self) {
        for channel in &mut self.channels {
            channel.configure();
        }
    }

    /// Set every channel to `level`, stopping group and channel effects
    pub fn on(&mut self, level: Level) {
        self.mode = GroupMode::Idle;
        for channel in &mut self.channels {
            channel.on(level);
        }
    }

    /// Turn every channel off, stopping group and channel effects
    pub fn off(&mut self) {
        self.on(LEVEL_OFF);
    }

    /// Set every channel to `level` while keeping the running effects
    pub fn set_level(&mut self, level: Level) {
        for channel in &mut self.channels {
            channel.set_level(level);
        }
    }

    /// Blink all channels in lockstep
    pub fn blink(&mut self, period: Duration, high: Level, low: Level) {
        self.off();
        self.mode = GroupMode::SynchronizedBlink;
        for channel in &mut self.channels {
            channel.blink(period, high, low);
        }
    }

    /// Start the sequential run.
    ///
    /// `blink_period` is the duration of each high and low phase,
    /// `stagger_period` the delay between two ignitions.
    pub fn start_sequence(
        &mut self,
        blink_period: Duration,
        stagger_period: Duration,
        high: Level,
        low: Level,
    ) {
        self.off();
        self.mode = GroupMode::SequentialRun;
        self.high_level = high.min(LEVEL_MAX);
        self.low_level = low.min(LEVEL_MAX);
        self.blink.arm(blink_period);
        self.stagger.arm(stagger_period);
    }

    /// Advance the active effect
    pub fn tick(&mut self, now: Instant) {
        if self.mode != GroupMode::SequentialRun {
            for channel in &mut self.channels {
                channel.tick(now);
            }
            return;
        }

        let was_high = self.channels[0].level() == self.high_level;
        let mut keep_high = was_high;
        if self.blink.elapsed(now) {
            keep_high = !keep_high;
        }

        if keep_high {
            self.ignite_next(now);
        } else if was_high {
            self.set_level(self.low_level);
        }
    }

    /// Ignite the first channel that is not high yet, once per stagger period
    fn ignite_next(&mut self, now: Instant) {
        let high = self.high_level;
        if self.channels[2].level() == high || !self.stagger.elapsed(now) {
            return;
        }
        if let Some(next) = self.channels.iter_mut().find(|c| c.level() != high) {
            next.set_level(high);
        }
    }
}
