//! Publish/subscribe plumbing
//!
//! The broker client itself is an external collaborator behind the
//! [`Transport`] trait. This module keeps the topic → handler table, replays
//! subscriptions after every reconnect and refuses to publish while the
//! connection is incomplete.

mod client;
mod gateway;
mod registry;

pub use client::{BusClient, ConnectivityHandler, MessageHandler};
pub use gateway::PublishGateway;
pub use registry::{RegistryFull, Subscription, TopicRegistry};

/// Wire-level access to the message broker
///
/// Calls are fire-and-forget; delivery guarantees are the broker client's.
pub trait Transport {
    /// Ask the broker to deliver messages published on `topic`
    fn subscribe(&mut self, topic: &str);

    /// Publish `payload` on `topic`
    fn publish(&mut self, topic: &str, payload: &str, retain: bool);

    /// Register the message the broker publishes if the session drops
    /// without a clean disconnect
    fn set_last_will(&mut self, topic: &str, payload: &str, retain: bool);
}
