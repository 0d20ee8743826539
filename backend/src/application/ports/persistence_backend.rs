// Driven port - persistence strategy chosen once at startup

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::CollectionKey;

use crate::application::error::StoreError;
use crate::application::ports::RemoteDatabase;
use crate::domain::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    Local,
}

/// The mutation that produced a snapshot. Local backends only need the
/// snapshot; remote backends replay the change.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordChange {
    Inserted { id: EntityId, record: Value },
    Updated { id: EntityId, record: Value },
    Deleted { id: EntityId },
    /// The whole collection was (re)written, e.g. with seed data
    Reset,
}

#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// `None` when nothing has been stored for the collection yet
    async fn load(&self, collection: CollectionKey) -> Result<Option<Vec<Value>>, StoreError>;

    async fn persist(
        &self,
        collection: CollectionKey,
        change: &RecordChange,
        snapshot: &[Value],
    ) -> Result<(), StoreError>;

    /// Remote database behind this backend, used for live sync
    fn remote(&self) -> Option<Arc<dyn RemoteDatabase>> {
        None
    }
}
