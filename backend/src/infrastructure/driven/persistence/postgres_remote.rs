use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use shared::CollectionKey;
use sqlx::postgres::{PgListener, PgPool, PgPoolOptions};
use sqlx::types::Json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use super::schema::{CHANGE_CHANNEL, CREATE_POSITION_INDEX, CREATE_RECORDS};
use crate::application::ports::RemoteDatabase;
use crate::application::StoreError;
use crate::domain::EntityId;

const WATCH_BUFFER: usize = 16;

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("Database error: {}", e))
}

/// Remote database service backed by PostgreSQL. Records are JSONB
/// documents; writers announce changes with `pg_notify` so every process
/// following the collection refetches it.
pub struct PostgresRemoteDatabase {
    pool: PgPool,
}

impl PostgresRemoteDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Database connection error: {}", e)))?;

        info!("connected to remote database");
        Ok(Self::new(pool))
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_RECORDS)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        sqlx::query(CREATE_POSITION_INDEX)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn announce(&self, collection: CollectionKey) -> Result<(), StoreError> {
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGE_CHANNEL)
            .bind(collection.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl RemoteDatabase for PostgresRemoteDatabase {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Database ping failed: {}", e)))?;
        Ok(())
    }

    async fn fetch_all(&self, collection: CollectionKey) -> Result<Vec<Value>, StoreError> {
        let rows: Vec<(Json<Value>,)> = sqlx::query_as(
            "SELECT body FROM dashboard_records WHERE collection = $1 ORDER BY position",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|(Json(body),)| body).collect())
    }

    async fn insert(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO dashboard_records (collection, id, body) VALUES ($1, $2, $3)",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(record))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let taken = e.as_database_error().is_some_and(|db| db.is_unique_violation());
            if taken {
                StoreError::Backend(format!("{} record {} already exists", collection, id))
            } else {
                db_error(e)
            }
        })?;

        self.announce(collection).await
    }

    async fn update(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE dashboard_records SET body = $3 WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(Json(record))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("{} record {} not found", collection, id)));
        }
        self.announce(collection).await
    }

    async fn delete(&self, collection: CollectionKey, id: &EntityId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM dashboard_records WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        self.announce(collection).await
    }

    async fn watch(&self, collection: CollectionKey) -> Result<mpsc::Receiver<()>, StoreError> {
        let mut listener = PgListener::connect_with(&self.pool).await.map_err(db_error)?;
        listener.listen(CHANGE_CHANNEL).await.map_err(db_error)?;

        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    notification = listener.recv() => match notification {
                        Ok(n) if n.payload() == collection.as_str() => {
                            if let Err(TrySendError::Closed(_)) = tx.try_send(()) {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(%collection, error = %e, "remote change listener stopped");
                            break;
                        }
                    },
                }
            }
            debug!(%collection, "remote change listener closed");
        });

        Ok(rx)
    }
}
