#![no_std]

//! Light effects and broker connectivity for bus-controlled model lighting.
//!
//! The crate covers the reusable part of a lighting firmware: channels and
//! channel groups animated from a single polled clock, and the connectivity
//! lifecycle that replays subscriptions and gates publishing. Pins, topic
//! names and the mapping between them stay with the application, which owns
//! a device context and hands it to the [`BusClient`] handlers.

pub mod bus;
pub mod config;
pub mod connectivity;
pub mod event_queue;
pub mod interval;
pub mod light;
pub mod payload;
pub mod state_document;

pub use bus::{BusClient, PublishGateway, Transport};
pub use config::{BusConfig, EffectTimings};
pub use connectivity::{
    ConnectivityChange, ConnectivityEvent, ConnectivityMonitor, ConnectivityState, LinkPoller,
    LinkStatus,
};
pub use event_queue::{InboundMessage, NetworkEvent, NetworkEventQueue};
pub use interval::Interval;
pub use light::{Channel, ChannelAddress, Group, Level, LightDriver};
pub use payload::{Availability, LightingMode, PayloadKind, Switch, Token, TurnSignal};
pub use state_document::StateDocument;

pub use embassy_time::{Duration, Instant};
