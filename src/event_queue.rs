//! Bounded queue between the network task and the polling loop.
//!
//! Broker clients usually report link changes and deliver messages from
//! their own task or interrupt context. They push [`NetworkEvent`]s into an
//! [`EventQueue`]; the polling loop drains it, so every engine is only ever
//! touched from one place. Synchronization uses critical sections around a
//! fixed-size `heapless::Deque`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, String};

use crate::config::{MAX_PAYLOAD_LEN, MAX_TOPIC_LEN};
use crate::connectivity::ConnectivityEvent;

/// Error returned when trying to push into a full queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to pop from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Inbound bus message with owned topic and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: String<MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy `topic` and `payload` into a message.
    ///
    /// Returns `None` if either does not fit.
    pub fn new(topic: &str, payload: &str) -> Option<Self> {
        Some(Self {
            topic: String::try_from(topic).ok()?,
            payload: String::try_from(payload).ok()?,
        })
    }
}

/// Everything the network collaborator reports to the polling loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Connectivity(ConnectivityEvent),
    Message(InboundMessage),
}

impl From<ConnectivityEvent> for NetworkEvent {
    fn from(event: ConnectivityEvent) -> Self {
        Self::Connectivity(event)
    }
}

impl From<InboundMessage> for NetworkEvent {
    fn from(message: InboundMessage) -> Self {
        Self::Message(message)
    }
}

/// A bounded, interrupt-safe queue.
pub struct EventQueue<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> EventQueue<T, SIZE> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    pub const fn sender(&self) -> EventSender<'_, T, SIZE> {
        EventSender { queue: self }
    }

    /// Get a receiver handle for this queue.
    pub const fn receiver(&self) -> EventReceiver<'_, T, SIZE> {
        EventReceiver { queue: self }
    }

    /// Try to push a value.
    ///
    /// Returns `Err(TrySendError(value))` if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Try to pop the oldest value.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for EventQueue<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of an [`EventQueue`], held by the network collaborator.
pub struct EventSender<'a, T, const SIZE: usize> {
    queue: &'a EventQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Clone for EventSender<'_, T, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SIZE: usize> Copy for EventSender<'_, T, SIZE> {}

impl<T, const SIZE: usize> EventSender<'_, T, SIZE> {
    /// Try to push a value.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.queue.try_send(value)
    }
}

/// Receiving half of an [`EventQueue`], held by the polling loop.
pub struct EventReceiver<'a, T, const SIZE: usize> {
    queue: &'a EventQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Clone for EventReceiver<'_, T, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SIZE: usize> Copy for EventReceiver<'_, T, SIZE> {}

impl<T, const SIZE: usize> EventReceiver<'_, T, SIZE> {
    /// Try to pop the oldest value.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.queue.try_receive()
    }
}

/// Queue of [`NetworkEvent`]s
pub type NetworkEventQueue<const SIZE: usize> = EventQueue<NetworkEvent, SIZE>;

/// Sender of [`NetworkEvent`]s
pub type NetworkEventSender<'a, const SIZE: usize> = EventSender<'a, NetworkEvent, SIZE>;

/// Receiver of [`NetworkEvent`]s
pub type NetworkEventReceiver<'a, const SIZE: usize> = EventReceiver<'a, NetworkEvent, SIZE>;
