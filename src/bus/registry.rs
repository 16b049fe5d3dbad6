use heapless::Vec;

/// Error returned when a new topic does not fit into the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull;

/// A registered topic and its handler
#[derive(Debug, Clone, Copy)]
pub struct Subscription<'t, H> {
    pub topic: &'t str,
    pub handler: H,
}

/// Fixed-capacity topic → handler map.
///
/// Topics match exactly and case-sensitively. Entries are never removed.
#[derive(Debug)]
pub struct TopicRegistry<'t, H, const N: usize> {
    entries: Vec<Subscription<'t, H>, N>,
}

impl<'t, H, const N: usize> TopicRegistry<'t, H, N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` for `topic`, replacing any previous handler.
    ///
    /// Fails only when `topic` is new and the registry is full.
    pub fn insert(&mut self, topic: &'t str, handler: H) -> Result<(), RegistryFull> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.topic == topic) {
            entry.handler = handler;
            return Ok(());
        }
        self.entries
            .push(Subscription { topic, handler })
            .map_err(|_| RegistryFull)
    }

    /// Handler registered for `topic`
    pub fn lookup(&self, topic: &str) -> Option<&H> {
        self.entries
            .iter()
            .find(|e| e.topic == topic)
            .map(|e| &e.handler)
    }

    /// Registered topics in registration order
    pub fn topics(&self) -> impl Iterator<Item = &'t str> + '_ {
        self.entries.iter().map(|e| e.topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H, const N: usize> Default for TopicRegistry<'_, H, N> {
    fn default() -> Self {
        Self::new()
    }
}
