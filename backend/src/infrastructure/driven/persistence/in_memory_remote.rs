use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared::CollectionKey;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;

use crate::application::ports::RemoteDatabase;
use crate::application::StoreError;
use crate::domain::EntityId;

const WATCH_BUFFER: usize = 16;

/// Remote database held in process memory. Stands in for the real service
/// in tests and local development; availability can be switched off to
/// exercise the fallback path.
pub struct InMemoryRemoteDatabase {
    collections: RwLock<HashMap<CollectionKey, Vec<(EntityId, Value)>>>,
    watchers: Mutex<HashMap<CollectionKey, Vec<mpsc::Sender<()>>>>,
    available: AtomicBool,
}

impl InMemoryRemoteDatabase {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            watchers: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("remote database offline".to_string()))
        }
    }

    fn notify(&self, collection: CollectionKey) {
        let mut watchers = self.watchers.lock();
        if let Some(senders) = watchers.get_mut(&collection) {
            // A full buffer already holds a pending signal.
            senders.retain(|tx| !matches!(tx.try_send(()), Err(TrySendError::Closed(_))));
        }
    }
}

impl Default for InMemoryRemoteDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteDatabase for InMemoryRemoteDatabase {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn fetch_all(&self, collection: CollectionKey) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|records| records.iter().map(|(_, body)| body.clone()).collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError> {
        self.check()?;
        {
            let mut collections = self.collections.write().await;
            let records = collections.entry(collection).or_default();
            if records.iter().any(|(existing, _)| existing == id) {
                return Err(StoreError::Backend(format!("{} record {} already exists", collection, id)));
            }
            records.push((id.clone(), record.clone()));
        }
        self.notify(collection);
        Ok(())
    }

    async fn update(&self, collection: CollectionKey, id: &EntityId, record: &Value) -> Result<(), StoreError> {
        self.check()?;
        {
            let mut collections = self.collections.write().await;
            let body = collections
                .get_mut(&collection)
                .and_then(|records| records.iter_mut().find(|(existing, _)| existing == id))
                .map(|(_, body)| body)
                .ok_or_else(|| StoreError::Backend(format!("{} record {} not found", collection, id)))?;
            *body = record.clone();
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: CollectionKey, id: &EntityId) -> Result<(), StoreError> {
        self.check()?;
        {
            let mut collections = self.collections.write().await;
            if let Some(records) = collections.get_mut(&collection) {
                records.retain(|(existing, _)| existing != id);
            }
        }
        self.notify(collection);
        Ok(())
    }

    async fn watch(&self, collection: CollectionKey) -> Result<mpsc::Receiver<()>, StoreError> {
        self.check()?;
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        self.watchers.lock().entry(collection).or_default().push(tx);
        Ok(rx)
    }
}
