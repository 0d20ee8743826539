use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::error::StoreError;
use crate::application::ports::RemoteDatabase;
use crate::application::repository::Record;
use crate::application::store::decode_all;
use shared::CollectionKey;

/// Live subscription to the remote database.
///
/// On every remote change signal the whole collection is fetched again and
/// handed to the callback. There is no delta or merge: each snapshot
/// replaces whatever the consumer held before.
pub struct RemoteSync {
    remote: Arc<dyn RemoteDatabase>,
}

/// Stops delivery when dropped or unsubscribed
pub struct SyncHandle {
    collection: CollectionKey,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn collection(&self) -> CollectionKey {
        self.collection
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn unsubscribe(self) {
        // Drop aborts the task.
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl RemoteSync {
    pub fn new(remote: Arc<dyn RemoteDatabase>) -> Self {
        Self { remote }
    }

    pub async fn subscribe<T, F>(&self, callback: F) -> Result<SyncHandle, StoreError>
    where
        T: Record,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let collection = T::COLLECTION;
        let mut changes = self.remote.watch(collection).await?;
        let remote = self.remote.clone();

        let task = tokio::spawn(async move {
            while changes.recv().await.is_some() {
                let snapshot = match remote.fetch_all(collection).await {
                    Ok(values) => values,
                    Err(e) => {
                        warn!(%collection, error = %e, "failed to fetch remote snapshot");
                        continue;
                    }
                };

                match decode_all::<T>(snapshot) {
                    Ok(items) => {
                        debug!(%collection, count = items.len(), "remote snapshot delivered");
                        callback(items);
                    }
                    Err(e) => warn!(%collection, error = %e, "remote snapshot unreadable, skipped"),
                }
            }
            debug!(%collection, "remote change feed closed");
        });

        Ok(SyncHandle { collection, task })
    }
}
