use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::CollectionKey;
use tracing::debug;

use crate::application::ports::{BackendMode, PersistenceBackend, RecordChange, RemoteDatabase};
use crate::application::StoreError;
use crate::domain::EntityId;

/// Primary persistence: every change is replayed against the remote
/// database as a single-record operation.
pub struct RemoteBackend {
    remote: Arc<dyn RemoteDatabase>,
}

impl RemoteBackend {
    pub fn new(remote: Arc<dyn RemoteDatabase>) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl PersistenceBackend for RemoteBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Remote
    }

    async fn load(&self, collection: CollectionKey) -> Result<Option<Vec<Value>>, StoreError> {
        let records = self.remote.fetch_all(collection).await?;
        // An empty remote collection has never been written; seed it.
        Ok((!records.is_empty()).then_some(records))
    }

    async fn persist(
        &self,
        collection: CollectionKey,
        change: &RecordChange,
        snapshot: &[Value],
    ) -> Result<(), StoreError> {
        match change {
            RecordChange::Inserted { id, record } => self.remote.insert(collection, id, record).await,
            RecordChange::Updated { id, record } => self.remote.update(collection, id, record).await,
            RecordChange::Deleted { id } => self.remote.delete(collection, id).await,
            // Only written when the remote collection was empty, so plain
            // inserts suffice; existing records are never overwritten.
            RecordChange::Reset => {
                for record in snapshot {
                    let id = record
                        .get("id")
                        .and_then(Value::as_str)
                        .map(EntityId::from)
                        .ok_or_else(|| StoreError::Backend(format!("{} record without id", collection)))?;
                    self.remote.insert(collection, &id, record).await?;
                }
                debug!(%collection, count = snapshot.len(), "collection written to remote");
                Ok(())
            }
        }
    }

    fn remote(&self) -> Option<Arc<dyn RemoteDatabase>> {
        Some(self.remote.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::driven::persistence::InMemoryRemoteDatabase;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_remote_collection_reads_as_missing() {
        let backend = RemoteBackend::new(Arc::new(InMemoryRemoteDatabase::new()));
        assert_eq!(backend.load(CollectionKey::Projects).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_changes_are_replayed_one_record_at_a_time() {
        let remote = Arc::new(InMemoryRemoteDatabase::new());
        let backend = RemoteBackend::new(remote.clone());
        let first = json!({"id": "1", "name": "a"});
        let second = json!({"id": "2", "name": "b"});

        backend
            .persist(CollectionKey::Users, &RecordChange::Reset, &[first.clone(), second.clone()])
            .await
            .unwrap();

        let renamed = json!({"id": "2", "name": "c"});
        let change = RecordChange::Updated { id: EntityId::from("2"), record: renamed.clone() };
        backend.persist(CollectionKey::Users, &change, &[]).await.unwrap();

        let change = RecordChange::Deleted { id: EntityId::from("1") };
        backend.persist(CollectionKey::Users, &change, &[]).await.unwrap();

        assert_eq!(remote.fetch_all(CollectionKey::Users).await.unwrap(), vec![renamed]);
    }

    #[tokio::test]
    async fn test_insert_never_overwrites_existing_record() {
        let remote = Arc::new(InMemoryRemoteDatabase::new());
        let backend = RemoteBackend::new(remote.clone());
        let original = json!({"id": "2", "name": "Oak Street School Extension"});
        backend
            .persist(CollectionKey::Projects, &RecordChange::Reset, &[original.clone()])
            .await
            .unwrap();

        let clash = RecordChange::Inserted {
            id: EntityId::from("2"),
            record: json!({"id": "2", "name": "C"}),
        };
        let result = backend.persist(CollectionKey::Projects, &clash, &[]).await;

        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(remote.fetch_all(CollectionKey::Projects).await.unwrap(), vec![original]);
    }

    #[tokio::test]
    async fn test_reset_requires_ids() {
        let backend = RemoteBackend::new(Arc::new(InMemoryRemoteDatabase::new()));
        let result = backend
            .persist(CollectionKey::Users, &RecordChange::Reset, &[json!({"name": "anonymous"})])
            .await;

        assert!(matches!(result, Err(StoreError::Backend(_))));
    }
}
