// Driven port - remote database service (output port)

use async_trait::async_trait;
use serde_json::Value;
use shared::CollectionKey;
use tokio::sync::mpsc;

use crate::application::error::StoreError;
use crate::domain::EntityId;

#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    /// Availability check, run once at startup
    async fn ping(&self) -> Result<(), StoreError>;

    /// Every record of a collection, in insertion order
    async fn fetch_all(&self, collection: CollectionKey) -> Result<Vec<Value>, StoreError>;

    /// Fails when the collection already holds a record with `id`
    async fn insert(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError>;

    /// Fails when no record with `id` exists
    async fn update(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError>;

    async fn delete(&self, collection: CollectionKey, id: &EntityId) -> Result<(), StoreError>;

    /// Live change feed. Each message only says "this collection changed";
    /// consumers re-read it with [`RemoteDatabase::fetch_all`].
    async fn watch(&self, collection: CollectionKey) -> Result<mpsc::Receiver<()>, StoreError>;
}
