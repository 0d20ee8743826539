use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::CollectionKey;

use crate::application::ports::{BackendMode, KeyValueStore, PersistenceBackend, RecordChange};
use crate::application::StoreError;

/// Fallback persistence: the whole collection is written as one JSON array
/// under its collection key.
pub struct LocalBackend {
    store: Arc<dyn KeyValueStore>,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PersistenceBackend for LocalBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Local
    }

    async fn load(&self, collection: CollectionKey) -> Result<Option<Vec<Value>>, StoreError> {
        match self.store.get(collection.as_str()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn persist(
        &self,
        collection: CollectionKey,
        _change: &RecordChange,
        snapshot: &[Value],
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(snapshot)?;
        self.store.set(collection.as_str(), &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::driven::persistence::InMemoryKeyValueStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_snapshot_is_written_under_collection_key() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let backend = LocalBackend::new(kv.clone());

        let snapshot = vec![json!({"id": "1"}), json!({"id": "2"})];
        backend
            .persist(CollectionKey::Users, &RecordChange::Reset, &snapshot)
            .await
            .unwrap();

        assert_eq!(kv.raw("users").as_deref(), Some(r#"[{"id":"1"},{"id":"2"}]"#));
        assert_eq!(backend.load(CollectionKey::Users).await.unwrap(), Some(snapshot));
        assert_eq!(backend.load(CollectionKey::Projects).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_array_payload_is_malformed() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.insert_raw("projects", r#"{"id": "1"}"#);
        let backend = LocalBackend::new(kv);

        let err = backend.load(CollectionKey::Projects).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
