use async_trait::async_trait;
use redis::AsyncCommands;

use crate::application::ports::KeyValueStore;
use crate::application::StoreError;

pub struct RedisKeyValueStore {
    client: redis::Client,
}

impl RedisKeyValueStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(key: &str) -> String {
        format!("dashboard:{}", key)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis connection error: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        conn.get(Self::key(key))
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to read {}: {}", key, e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(Self::key(key), value)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to write {}: {}", key, e)))
    }
}
