//! Message listener registry
//!
//! Listeners are called synchronously on the reader task, in registration
//! order. Delivery iterates over a snapshot of the registry, so listeners may
//! register or unregister (themselves included) while a message is being
//! delivered.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use ynca_core::Message;

/// Receiver of parsed messages
///
/// Implementations must not block; they run on the connection's reader task.
pub trait MessageListener: Send + Sync {
    fn on_message(&self, message: &Message);
}

impl<F> MessageListener for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn on_message(&self, message: &Message) {
        self(message)
    }
}

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn MessageListener>)>>,
}

impl ListenerSet {
    pub(crate) fn register(&self, listener: Arc<dyn MessageListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    pub(crate) fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub(crate) fn clear(&self) {
        self.listeners.write().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub(crate) fn dispatch(&self, message: &Message) {
        let snapshot: Vec<Arc<dyn MessageListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.on_message(message);
        }
    }
}
