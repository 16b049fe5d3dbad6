//! Light channels and channel groups
//!
//! A [`Channel`] drives one output through a [`LightDriver`]; a [`Group`]
//! animates an ordered triple of channels.

mod channel;
mod group;

pub use channel::{Channel, ChannelMode};
pub use group::{Group, GroupMode};

/// Brightness as a percentage, `0` being off
pub type Level = u8;

/// Level of a channel that is off
pub const LEVEL_OFF: Level = 0;

/// Full brightness
pub const LEVEL_MAX: Level = 100;

/// Peripheral address of a light output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelAddress {
    /// GPIO pin number
    pub pin: u8,
    /// PWM lane attached to the pin, if the light is dimmable
    pub pwm_lane: Option<u8>,
}

impl ChannelAddress {
    /// Address of an on/off output
    pub const fn gpio(pin: u8) -> Self {
        Self {
            pin,
            pwm_lane: None,
        }
    }

    /// Address of a dimmable output
    pub const fn pwm(pin: u8, lane: u8) -> Self {
        Self {
            pin,
            pwm_lane: Some(lane),
        }
    }

    /// Whether the output supports intermediate levels
    pub const fn is_dimmable(self) -> bool {
        self.pwm_lane.is_some()
    }
}

/// Abstract light output driver
///
/// Implement this trait for the GPIO/PWM peripheral of the target platform.
/// Writes are assumed to complete synchronously.
pub trait LightDriver {
    /// Prepare the pin (and PWM lane) for output
    fn configure(&mut self, address: ChannelAddress);

    /// Drive the output to `level`.
    ///
    /// On outputs without a PWM lane any non-zero level means fully on.
    fn write(&mut self, address: ChannelAddress, level: Level);
}

/// Convert a level into a PWM duty value for a timer with the given
/// resolution.
///
/// ```
/// use myrtio_model_lights::light::duty_for_level;
///
/// assert_eq!(duty_for_level(100, 13), 8192);
/// assert_eq!(duty_for_level(50, 13), 4096);
/// assert_eq!(duty_for_level(0, 13), 0);
/// ```
pub const fn duty_for_level(level: Level, resolution_bits: u8) -> u32 {
    let level = if level > LEVEL_MAX { LEVEL_MAX } else { level };
    let full_scale = 1u32 << resolution_bits;
    full_scale * level as u32 / LEVEL_MAX as u32
}
