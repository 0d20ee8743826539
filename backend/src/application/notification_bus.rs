use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared::Topic;
use tracing::trace;

pub use crate::domain::ChangeEvent;

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Returned by [`NotificationBus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    id: u64,
    topic: Topic,
}

impl SubscriptionToken {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

struct Subscriber {
    token: SubscriptionToken,
    handler: Handler,
}

/// In-process publish/subscribe keyed by topic.
///
/// Delivery is synchronous: `publish` returns only after every handler
/// registered for the topic has run, in registration order. Late
/// subscribers get no replay.
pub struct NotificationBus {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionToken
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let token = SubscriptionToken {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            topic,
        };
        self.subscribers.lock().push(Subscriber {
            token,
            handler: Arc::new(handler),
        });
        token
    }

    /// Returns false when the token was already removed
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|s| s.token != token);
        subscribers.len() != before
    }

    /// Delivers `topic` to its current subscribers and returns how many
    /// handlers ran.
    pub fn publish(&self, topic: Topic) -> usize {
        // Handlers run outside the lock so they may subscribe or unsubscribe.
        let handlers: Vec<Handler> = self
            .subscribers
            .lock()
            .iter()
            .filter(|s| s.token.topic == topic)
            .map(|s| s.handler.clone())
            .collect();

        let event = ChangeEvent::new(topic);
        for handler in &handlers {
            handler(&event);
        }

        trace!(%topic, delivered = handlers.len(), "change published");
        handlers.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|s| s.token.topic == topic)
            .count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
