//! Bus payload tokens
//!
//! Every inbound topic accepts a small closed set of ASCII tokens. Anything
//! outside that whitelist is ignored before any state is touched.

const SWITCH_ON: &str = "ON";
const SWITCH_OFF: &str = "OFF";

const AVAILABILITY_ONLINE: &str = "online";
const AVAILABILITY_OFFLINE: &str = "offline";

const LIGHTING_OFF: &str = "Off";
const LIGHTING_RUNNING: &str = "Running";
const LIGHTING_LOW_BEAM: &str = "LowBeam";
const LIGHTING_HIGH_BEAM: &str = "HighBeam";

const TURN_OFF: &str = "Off";
const TURN_LEFT: &str = "Left";
const TURN_RIGHT: &str = "Right";

/// A closed set of payload strings
pub trait Token: Copy + Sized {
    /// Parse an exact, case-sensitive token
    fn parse_from_str(s: &str) -> Option<Self>;

    /// Canonical wire representation
    fn as_str(self) -> &'static str;
}

/// Binary switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Switch {
    On,
    #[default]
    Off,
}

impl Switch {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl Token for Switch {
    fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            SWITCH_ON => Some(Self::On),
            SWITCH_OFF => Some(Self::Off),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::On => SWITCH_ON,
            Self::Off => SWITCH_OFF,
        }
    }
}

/// Device availability announced on the retained availability topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Online,
    Offline,
}

impl Token for Availability {
    fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            AVAILABILITY_ONLINE => Some(Self::Online),
            AVAILABILITY_OFFLINE => Some(Self::Offline),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Online => AVAILABILITY_ONLINE,
            Self::Offline => AVAILABILITY_OFFLINE,
        }
    }
}

/// Vehicle lighting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    #[default]
    Off,
    Running,
    LowBeam,
    HighBeam,
}

impl Token for LightingMode {
    fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            LIGHTING_OFF => Some(Self::Off),
            LIGHTING_RUNNING => Some(Self::Running),
            LIGHTING_LOW_BEAM => Some(Self::LowBeam),
            LIGHTING_HIGH_BEAM => Some(Self::HighBeam),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Off => LIGHTING_OFF,
            Self::Running => LIGHTING_RUNNING,
            Self::LowBeam => LIGHTING_LOW_BEAM,
            Self::HighBeam => LIGHTING_HIGH_BEAM,
        }
    }
}

/// Turn signal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnSignal {
    #[default]
    Off,
    Left,
    Right,
}

impl Token for TurnSignal {
    fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TURN_OFF => Some(Self::Off),
            TURN_LEFT => Some(Self::Left),
            TURN_RIGHT => Some(Self::Right),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Off => TURN_OFF,
            Self::Left => TURN_LEFT,
            Self::Right => TURN_RIGHT,
        }
    }
}

/// Validator strategy attached to an inbound topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Switch,
    LightingMode,
    TurnSignal,
}

impl PayloadKind {
    /// Whether `payload` is in the whitelist of this kind
    pub fn accepts(self, payload: &str) -> bool {
        match self {
            Self::Switch => Switch::parse_from_str(payload).is_some(),
            Self::LightingMode => LightingMode::parse_from_str(payload).is_some(),
            Self::TurnSignal => TurnSignal::parse_from_str(payload).is_some(),
        }
    }
}

/// Parse `payload` as `T`, ignoring anything outside the whitelist
pub fn validated<T: Token>(payload: &str) -> Option<T> {
    let token = T::parse_from_str(payload);
    #[cfg(feature = "esp32-log")]
    if token.is_none() {
        esp_println::println!("[payload.validated] ignoring payload {:?}", payload);
    }
    token
}
