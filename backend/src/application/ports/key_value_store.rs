// Driven port - keyed blob storage (output port)

use async_trait::async_trait;

use crate::application::error::StoreError;

/// String keys to serialized collections. One key per entity type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
