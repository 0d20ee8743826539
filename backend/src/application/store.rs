use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::CollectionKey;
use tracing::{debug, error, warn};

use crate::application::ports::{BackendMode, PersistenceBackend, RecordChange};
use crate::domain::EntityId;

/// Result of reading a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    /// True when the default seed stood in for missing or unreadable data
    pub seeded: bool,
}

/// Typed change handed to [`CollectionStore::persist`]
#[derive(Debug, Clone, Copy)]
pub enum PendingChange<'a, T> {
    Inserted(&'a EntityId, &'a T),
    Updated(&'a EntityId, &'a T),
    Deleted(&'a EntityId),
    Reset,
}

/// Best-effort adapter over the selected persistence backend.
///
/// Reads never fail: missing, unreachable or corrupt data yields the
/// caller's seed. Writes never fail either: errors are logged and the
/// in-memory state stays authoritative until the next restart.
pub struct CollectionStore {
    backend: Arc<dyn PersistenceBackend>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        Self { backend }
    }

    pub fn mode(&self) -> BackendMode {
        self.backend.mode()
    }

    pub fn backend(&self) -> &Arc<dyn PersistenceBackend> {
        &self.backend
    }

    pub async fn load<T: DeserializeOwned>(&self, collection: CollectionKey, seed: Vec<T>) -> Loaded<T> {
        let seeded = |items| Loaded { items, seeded: true };

        match self.backend.load(collection).await {
            Ok(Some(values)) => match decode_all(values) {
                Ok(items) => Loaded { items, seeded: false },
                Err(e) => {
                    warn!(%collection, error = %e, "stored collection unreadable, using seed data");
                    seeded(seed)
                }
            },
            Ok(None) => {
                debug!(%collection, "nothing stored yet, using seed data");
                seeded(seed)
            }
            Err(e) => {
                warn!(%collection, error = %e, "failed to load collection, using seed data");
                seeded(seed)
            }
        }
    }

    /// Writes the whole collection
    pub async fn save<T: Serialize>(&self, collection: CollectionKey, items: &[T]) -> bool {
        self.persist(collection, PendingChange::Reset, items).await
    }

    /// Records one change together with the snapshot it produced. Returns
    /// whether the write went through.
    pub async fn persist<T: Serialize>(
        &self,
        collection: CollectionKey,
        change: PendingChange<'_, T>,
        snapshot: &[T],
    ) -> bool {
        let encoded = encode_change(change).and_then(|change| {
            let values = snapshot
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((change, values))
        });

        let (change, values) = match encoded {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(%collection, error = %e, "failed to encode collection, change not persisted");
                return false;
            }
        };

        match self.backend.persist(collection, &change, &values).await {
            Ok(()) => true,
            Err(e) => {
                error!(%collection, error = %e, "failed to persist collection, change kept in memory only");
                false
            }
        }
    }
}

fn encode_change<T: Serialize>(change: PendingChange<'_, T>) -> Result<RecordChange, serde_json::Error> {
    Ok(match change {
        PendingChange::Inserted(id, record) => RecordChange::Inserted {
            id: id.clone(),
            record: serde_json::to_value(record)?,
        },
        PendingChange::Updated(id, record) => RecordChange::Updated {
            id: id.clone(),
            record: serde_json::to_value(record)?,
        },
        PendingChange::Deleted(id) => RecordChange::Deleted { id: id.clone() },
        PendingChange::Reset => RecordChange::Reset,
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, serde_json::Error> {
    values.into_iter().map(serde_json::from_value).collect()
}
