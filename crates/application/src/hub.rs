//! State change fan-out.
//!
//! Panels that edit shared state (the tree view, the auth editor, the
//! variable table) register with the hub and broadcast a topic after each
//! mutation. Every other subscriber reacts; the originator recognizes its
//! own id in the event and skips it, which is what keeps an edit from
//! echoing back into the panel that made it.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Identifies one registered subscriber.
pub type SubscriberId = u64;

/// Origin id for events not tied to any panel, such as an import.
pub const EXTERNAL_ORIGIN: SubscriberId = 0;

/// Which slice of shared state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTopic {
    /// The request tree of the selected environment.
    Requests,
    /// Auth presets.
    Auth,
    /// Variables.
    Variables,
    /// Transport settings.
    Settings,
    /// Environment list or selection.
    Environments,
}

/// One broadcast change notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEvent {
    /// What changed.
    pub topic: StateTopic,
    /// Who changed it.
    pub origin: SubscriberId,
}

/// The hub itself. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct StateHub {
    sender: broadcast::Sender<StateEvent>,
    next_id: AtomicU64,
}

impl Default for StateHub {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHub {
    const CAPACITY: usize = 64;

    /// A hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self {
            sender,
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a subscriber and returns its event stream.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Subscription {
            id,
            receiver: self.sender.subscribe(),
        }
    }

    /// Broadcasts a change notice. A hub without subscribers swallows the
    /// event.
    pub fn notify(&self, topic: StateTopic, origin: SubscriberId) {
        let _ = self.sender.send(StateEvent { topic, origin });
    }
}

/// A registered subscriber's view of the hub.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: broadcast::Receiver<StateEvent>,
}

impl Subscription {
    /// This subscriber's id, to be passed as the origin of its own
    /// notifications.
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next change made by somebody else.
    ///
    /// Events originating from this subscriber are skipped. Returns `None`
    /// once the hub is gone; lagged-out events are dropped silently and
    /// the stream continues.
    pub async fn next_change(&mut self) -> Option<StateEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.id => {}
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_other_subscribers_receive_events() {
        let hub = StateHub::new();
        let editor = hub.subscribe();
        let mut viewer = hub.subscribe();

        hub.notify(StateTopic::Auth, editor.id());
        let event = viewer.next_change().await.unwrap();
        assert_eq!(event.topic, StateTopic::Auth);
        assert_eq!(event.origin, editor.id());
    }

    #[tokio::test]
    async fn test_originator_skips_own_events() {
        let hub = StateHub::new();
        let mut editor = hub.subscribe();
        let mut viewer = hub.subscribe();

        hub.notify(StateTopic::Requests, editor.id());
        hub.notify(StateTopic::Variables, viewer.id());

        // the editor never sees its own Requests event
        let event = editor.next_change().await.unwrap();
        assert_eq!(event.topic, StateTopic::Variables);
    }

    #[tokio::test]
    async fn test_stream_ends_when_hub_dropped() {
        let hub = StateHub::new();
        let mut viewer = hub.subscribe();
        drop(hub);
        assert_eq!(viewer.next_change().await, None);
    }
}
