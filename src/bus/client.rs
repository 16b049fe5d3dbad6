#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{PublishGateway, RegistryFull, TopicRegistry, Transport};
use crate::config::BusConfig;
use crate::connectivity::{
    ConnectivityChange, ConnectivityEvent, ConnectivityMonitor, ConnectivityState,
};
use crate::event_queue::{NetworkEvent, NetworkEventReceiver};
use crate::payload::{Availability, Token};

/// Handler for messages on one topic.
///
/// Receives the device context, the raw payload and the gateway for
/// publishing the resulting state. Non-capturing closures coerce to this
/// type.
pub type MessageHandler<C, T> = fn(&mut C, &str, &mut PublishGateway<T>);

/// Handler called with the current flags whenever connectivity changes
pub type ConnectivityHandler<C, T> = fn(&mut C, ConnectivityState, &mut PublishGateway<T>);

/// Composition of the connectivity monitor, the topic registry and the
/// publish gateway.
///
/// `C` is the device context handed to every handler, `N` the maximum number
/// of subscribed topics.
pub struct BusClient<'t, C, T: Transport, const N: usize> {
    config: BusConfig<'t>,
    monitor: ConnectivityMonitor,
    registry: TopicRegistry<'t, MessageHandler<C, T>, N>,
    gateway: PublishGateway<T>,
    on_change: Option<ConnectivityHandler<C, T>>,
}

impl<'t, C, T: Transport, const N: usize> BusClient<'t, C, T, N> {
    /// Create a client and register the `offline` last will
    pub fn new(mut transport: T, config: BusConfig<'t>) -> Self {
        transport.set_last_will(
            config.availability_topic,
            Availability::Offline.as_str(),
            true,
        );
        Self {
            config,
            monitor: ConnectivityMonitor::new(),
            registry: TopicRegistry::new(),
            gateway: PublishGateway::new(transport),
            on_change: None,
        }
    }

    /// Current connectivity flags
    pub const fn connectivity(&self) -> ConnectivityState {
        self.monitor.state()
    }

    /// Link, address and session are all established
    pub const fn is_connected(&self) -> bool {
        self.monitor.is_fully_connected()
    }

    pub const fn gateway(&self) -> &PublishGateway<T> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut PublishGateway<T> {
        &mut self.gateway
    }

    pub const fn registry(&self) -> &TopicRegistry<'t, MessageHandler<C, T>, N> {
        &self.registry
    }

    /// Register the connectivity change handler
    pub fn on_connectivity_change(&mut self, handler: ConnectivityHandler<C, T>) -> &mut Self {
        self.on_change = Some(handler);
        self
    }

    /// Route messages on `topic` to `handler`.
    ///
    /// Replaces an existing handler for the same topic. When already
    /// connected the topic is subscribed on the wire right away; otherwise
    /// it is subscribed with all others on the next connection.
    pub fn subscribe(
        &mut self,
        topic: &'t str,
        handler: MessageHandler<C, T>,
    ) -> Result<&mut Self, RegistryFull> {
        self.registry.insert(topic, handler)?;
        if self.is_connected() {
            self.gateway.transport_mut().subscribe(topic);
        }
        Ok(self)
    }

    /// Publish through the gateway; dropped while disconnected
    pub fn publish(&mut self, topic: &str, payload: &str, retain: bool) {
        self.gateway.publish(topic, payload, retain);
    }

    /// Handle one event from the network collaborator
    pub fn handle_event(&mut self, event: &NetworkEvent, ctx: &mut C) -> Option<ConnectivityChange> {
        match event {
            NetworkEvent::Connectivity(event) => self.report(*event, ctx),
            NetworkEvent::Message(message) => {
                self.dispatch(&message.topic, &message.payload, ctx);
                None
            }
        }
    }

    /// Drain the event queue, handling events in arrival order.
    ///
    /// Returns the number of handled events.
    pub fn process_pending<const SIZE: usize>(
        &mut self,
        events: &NetworkEventReceiver<'_, SIZE>,
        ctx: &mut C,
    ) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_receive() {
            self.handle_event(&event, ctx);
            handled += 1;
        }
        handled
    }

    /// Apply a connectivity report.
    ///
    /// On a change the gateway gate follows the new state. Entering the
    /// fully connected state re-subscribes every registered topic and
    /// announces `online` before the change handler runs.
    pub fn report(&mut self, event: ConnectivityEvent, ctx: &mut C) -> Option<ConnectivityChange> {
        let change = self.monitor.report(event)?;
        self.gateway
            .set_connected(change.current.is_fully_connected());

        if change.became_connected() {
            self.resubscribe_all();
            self.gateway.publish(
                self.config.availability_topic,
                Availability::Online.as_str(),
                true,
            );
        }

        if let Some(handler) = self.on_change {
            handler(ctx, change.current, &mut self.gateway);
        }
        Some(change)
    }

    /// Route a message to its handler.
    ///
    /// Returns `false` when no handler is registered for `topic`.
    pub fn dispatch(&mut self, topic: &str, payload: &str, ctx: &mut C) -> bool {
        let Some(&handler) = self.registry.lookup(topic) else {
            #[cfg(feature = "esp32-log")]
            println!("[BusClient.dispatch] no handler for {}", topic);
            return false;
        };
        handler(ctx, payload, &mut self.gateway);
        true
    }

    fn resubscribe_all(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[BusClient.resubscribe_all] {} topics", self.registry.len());
        let transport = self.gateway.transport_mut();
        for topic in self.registry.topics() {
            transport.subscribe(topic);
        }
    }
}
