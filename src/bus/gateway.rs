#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::Transport;

/// Connectivity-gated access to the transport.
///
/// Publishing while disconnected drops the payload: nothing is queued or
/// replayed. Callers republish their full state after reconnecting.
#[derive(Debug)]
pub struct PublishGateway<T: Transport> {
    transport: T,
    connected: bool,
}

impl<T: Transport> PublishGateway<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            connected: false,
        }
    }

    /// Whether publishes currently reach the transport
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Publish `payload` on `topic` if fully connected
    pub fn publish(&mut self, topic: &str, payload: &str, retain: bool) {
        if !self.connected {
            #[cfg(feature = "esp32-log")]
            println!("[PublishGateway.publish] offline, dropping {}", topic);
            return;
        }
        self.transport.publish(topic, payload, retain);
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}
