use std::fmt;

use chrono::{DateTime, Utc};
use shared::{CollectionKey, Topic};
use uuid::Uuid;

/// Notice that a collection changed. Subscribers learn which collection
/// and when; they re-read the records themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub topic: Topic,
}

impl ChangeEvent {
    pub fn new(topic: Topic) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            topic,
        }
    }

    /// Collection whose snapshot is now stale
    pub fn collection(&self) -> CollectionKey {
        match self.topic {
            Topic::ProjectsUpdated => CollectionKey::Projects,
            Topic::UsersUpdated => CollectionKey::Users,
            Topic::ApplicationsUpdated => CollectionKey::Applications,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.topic, self.event_id)
    }
}
