//! Store-changed signal for observing mutations.
//!
//! The signal emits an event after every successful store mutation,
//! enabling:
//! - Session resynchronization across open instances of the application
//! - Reactive UI refresh
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = EntityStore::open_in_memory()?;
//! let rx = store.signal().subscribe();
//!
//! store.create_post(NewPost::new("T", "t", "C"))?;
//! assert_eq!(rx.recv()?.key, StoreKey::Posts);
//! ```

use crate::keys::StoreKey;
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// A single store-changed event.
///
/// Events are emitted only after the underlying persist succeeds; they
/// carry the key that changed, not the changed data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    /// The storage key that was written or removed.
    pub key: StoreKey,
}

/// Distributes store-changed events to subscribers.
///
/// The signal:
/// - Emits only after a successful persist
/// - Preserves mutation order
/// - Supports multiple subscribers
/// - Is thread-safe
pub struct StoreSignal {
    subscribers: RwLock<Vec<Sender<StoreEvent>>>,
}

impl StoreSignal {
    /// Creates a new signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribes to store-changed events.
    ///
    /// Returns a receiver that observes all future events. Dropping the
    /// receiver unsubscribes lazily on the next emit.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to all subscribers.
    ///
    /// Disconnected subscribers are pruned.
    pub fn emit(&self, key: StoreKey) {
        let event = StoreEvent { key };
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for StoreSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn emit_and_receive() {
        let signal = StoreSignal::new();
        let rx = signal.subscribe();

        signal.emit(StoreKey::Posts);

        let event = rx.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(event.key, StoreKey::Posts);
    }

    #[test]
    fn multiple_subscribers_each_receive() {
        let signal = StoreSignal::new();
        let rx1 = signal.subscribe();
        let rx2 = signal.subscribe();

        signal.emit(StoreKey::Categories);

        assert_eq!(rx1.recv().unwrap().key, StoreKey::Categories);
        assert_eq!(rx2.recv().unwrap().key, StoreKey::Categories);
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let signal = StoreSignal::new();
        let rx = signal.subscribe();
        assert_eq!(signal.subscriber_count(), 1);

        drop(rx);
        signal.emit(StoreKey::Posts);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn events_preserve_order() {
        let signal = StoreSignal::new();
        let rx = signal.subscribe();

        signal.emit(StoreKey::Posts);
        signal.emit(StoreKey::CurrentUser);

        assert_eq!(rx.recv().unwrap().key, StoreKey::Posts);
        assert_eq!(rx.recv().unwrap().key, StoreKey::CurrentUser);
    }
}
