//! Connectivity lifecycle
//!
//! Tracks the three conditions required to talk to the broker: a transport
//! link, an assigned network address and an established broker session.
//! The network collaborator reports [`ConnectivityEvent`]s; the monitor
//! answers with a [`ConnectivityChange`] only when a flag actually flipped.

#[cfg(feature = "esp32-log")]
use esp_println::println;

mod poller;

pub use poller::{LinkPoller, LinkStatus};

/// Report from the network collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// Link layer associated
    TransportUp,
    /// Link layer lost; address and session are lost with it
    TransportDown,
    /// Network address received; implies the link is up
    AddressAssigned,
    /// Broker session established
    SessionUp,
    /// Broker session lost
    SessionDown,
}

/// Connectivity flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    pub transport_up: bool,
    pub address_assigned: bool,
    pub session_up: bool,
}

impl ConnectivityState {
    /// State with every flag cleared
    pub const fn disconnected() -> Self {
        Self {
            transport_up: false,
            address_assigned: false,
            session_up: false,
        }
    }

    /// Link, address and session are all established
    pub const fn is_fully_connected(self) -> bool {
        self.transport_up && self.address_assigned && self.session_up
    }

    /// State after applying `event`
    pub const fn apply(self, event: ConnectivityEvent) -> Self {
        match event {
            ConnectivityEvent::TransportUp => Self {
                transport_up: true,
                ..self
            },
            ConnectivityEvent::TransportDown => Self::disconnected(),
            ConnectivityEvent::AddressAssigned => Self {
                transport_up: true,
                address_assigned: true,
                ..self
            },
            ConnectivityEvent::SessionUp => Self {
                session_up: true,
                ..self
            },
            ConnectivityEvent::SessionDown => Self {
                session_up: false,
                ..self
            },
        }
    }
}

/// Transition between two different connectivity states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityChange {
    pub previous: ConnectivityState,
    pub current: ConnectivityState,
}

impl ConnectivityChange {
    /// The change completed the connection
    pub const fn became_connected(&self) -> bool {
        !self.previous.is_fully_connected() && self.current.is_fully_connected()
    }

    /// The change broke a complete connection
    pub const fn became_disconnected(&self) -> bool {
        self.previous.is_fully_connected() && !self.current.is_fully_connected()
    }
}

/// Edge-triggered connectivity state machine
#[derive(Debug, Clone, Default)]
pub struct ConnectivityMonitor {
    state: ConnectivityState,
}

impl ConnectivityMonitor {
    /// Create a monitor with everything disconnected
    pub const fn new() -> Self {
        Self {
            state: ConnectivityState::disconnected(),
        }
    }

    /// Current flags
    pub const fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Link, address and session are all established
    pub const fn is_fully_connected(&self) -> bool {
        self.state.is_fully_connected()
    }

    /// Apply a report.
    ///
    /// Returns the change if at least one flag flipped. Repeated identical
    /// reports return `None`.
    pub fn report(&mut self, event: ConnectivityEvent) -> Option<ConnectivityChange> {
        let previous = self.state;
        let current = previous.apply(event);
        if current == previous {
            return None;
        }
        self.state = current;

        #[cfg(feature = "esp32-log")]
        println!(
            "[ConnectivityMonitor.report] {:?}: transport={} address={} session={}",
            event, current.transport_up, current.address_assigned, current.session_up
        );

        Some(ConnectivityChange { previous, current })
    }
}
