use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::CollectionKey;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::error::StoreError;
use crate::application::notification_bus::NotificationBus;
use crate::application::remote_sync::{RemoteSync, SyncHandle};
use crate::application::store::{CollectionStore, PendingChange};
use crate::domain::EntityId;

/// A stored entity type with its creation and partial-update shapes
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Send;
    type Patch: Send + Sync;

    const COLLECTION: CollectionKey;

    fn id(&self) -> &EntityId;

    fn create(id: EntityId, draft: Self::Draft) -> Self;

    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// How `add` picks the next identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdAllocation {
    /// `len + 1`. Reuses an existing identifier after a delete.
    Length,
    /// One past the highest identifier ever seen by this repository
    #[default]
    Monotonic,
}

impl IdAllocation {
    fn next<T: Record>(self, items: &[T], high_water: u64) -> u64 {
        match self {
            IdAllocation::Length => items.len() as u64 + 1,
            IdAllocation::Monotonic => max_sequence(items).max(high_water) + 1,
        }
    }
}

fn max_sequence<T: Record>(items: &[T]) -> u64 {
    items
        .iter()
        .filter_map(|item| item.id().sequence())
        .max()
        .unwrap_or(0)
}

struct State<T> {
    items: Vec<T>,
    high_water: u64,
}

/// Canonical in-memory collection for one entity type.
///
/// Every successful mutation updates memory, persists through the
/// [`CollectionStore`], then publishes the collection's topic before
/// returning. Mutations are serialised by a write gate; reads are plain
/// snapshots and never wait on I/O.
pub struct EntityRepository<T: Record> {
    state: RwLock<State<T>>,
    write_gate: Mutex<()>,
    store: Arc<CollectionStore>,
    bus: Arc<NotificationBus>,
    allocation: IdAllocation,
}

impl<T: Record> EntityRepository<T> {
    /// Reads the collection once. When the store had nothing usable the
    /// seed is written back so the next start finds it.
    pub async fn load(
        store: Arc<CollectionStore>,
        bus: Arc<NotificationBus>,
        seed: Vec<T>,
        allocation: IdAllocation,
    ) -> Self {
        let loaded = store.load(T::COLLECTION, seed).await;
        if loaded.seeded {
            store.save(T::COLLECTION, &loaded.items).await;
        }

        info!(
            collection = %T::COLLECTION,
            count = loaded.items.len(),
            seeded = loaded.seeded,
            "collection loaded"
        );

        let high_water = max_sequence(&loaded.items);
        Self {
            state: RwLock::new(State {
                items: loaded.items,
                high_water,
            }),
            write_gate: Mutex::new(()),
            store,
            bus,
            allocation,
        }
    }

    /// Copy of the current collection
    pub fn list(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    pub fn get(&self, id: &EntityId) -> Option<T> {
        self.state.read().items.iter().find(|i| i.id() == id).cloned()
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.state
            .read()
            .items
            .iter()
            .filter(|i| predicate(i))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn allocation(&self) -> IdAllocation {
        self.allocation
    }

    pub async fn add(&self, draft: T::Draft) -> T {
        let gate = self.write_gate.lock().await;

        let (created, snapshot) = {
            let mut state = self.state.write();
            let sequence = self.allocation.next(&state.items, state.high_water);
            state.high_water = state.high_water.max(sequence);

            let created = T::create(EntityId::from_sequence(sequence), draft);
            state.items.push(created.clone());
            (created, state.items.clone())
        };

        self.store
            .persist(T::COLLECTION, PendingChange::Inserted(created.id(), &created), &snapshot)
            .await;
        drop(gate);

        self.bus.publish(T::COLLECTION.topic());
        debug!(collection = %T::COLLECTION, id = %created.id(), "record added");
        created
    }

    /// Merges `patch` into the matching record. `None` when no record has
    /// this id; nothing is persisted or published then.
    pub async fn update(&self, id: &EntityId, patch: &T::Patch) -> Option<T> {
        self.modify(id, |item| item.apply_patch(patch)).await
    }

    /// Applies an arbitrary in-place change with the same persist and
    /// publish discipline as [`EntityRepository::update`].
    pub async fn modify(&self, id: &EntityId, change: impl FnOnce(&mut T) + Send) -> Option<T> {
        let result = self
            .try_modify(id, |item| {
                change(item);
                Ok::<(), Infallible>(())
            })
            .await;

        match result {
            Ok(updated) => updated,
            Err(never) => match never {},
        }
    }

    /// Like [`EntityRepository::modify`], but the change may refuse. A
    /// refused change leaves the record untouched and is not persisted.
    ///
    /// `Ok(None)` means no record has this id.
    pub async fn try_modify<E: Send>(
        &self,
        id: &EntityId,
        change: impl FnOnce(&mut T) -> Result<(), E> + Send,
    ) -> Result<Option<T>, E> {
        let gate = self.write_gate.lock().await;

        let outcome = {
            let mut state = self.state.write();
            match state.items.iter().position(|i| i.id() == id) {
                None => None,
                Some(pos) => {
                    let mut candidate = state.items[pos].clone();
                    match change(&mut candidate) {
                        Err(e) => Some(Err(e)),
                        Ok(()) => {
                            state.items[pos] = candidate.clone();
                            Some(Ok((candidate, state.items.clone())))
                        }
                    }
                }
            }
        };

        let (updated, snapshot) = match outcome {
            None => {
                debug!(collection = %T::COLLECTION, %id, "update target not found");
                return Ok(None);
            }
            Some(Err(e)) => return Err(e),
            Some(Ok(updated)) => updated,
        };

        self.store
            .persist(T::COLLECTION, PendingChange::Updated(id, &updated), &snapshot)
            .await;
        drop(gate);

        self.bus.publish(T::COLLECTION.topic());
        Ok(Some(updated))
    }

    /// Removes the first record with this id. False when nothing matched.
    pub async fn delete(&self, id: &EntityId) -> bool {
        let gate = self.write_gate.lock().await;

        let snapshot = {
            let mut state = self.state.write();
            state
                .items
                .iter()
                .position(|i| i.id() == id)
                .map(|pos| {
                    state.items.remove(pos);
                    state.items.clone()
                })
        };

        let Some(snapshot) = snapshot else {
            debug!(collection = %T::COLLECTION, %id, "delete target not found");
            return false;
        };

        self.store
            .persist(T::COLLECTION, PendingChange::<T>::Deleted(id), &snapshot)
            .await;
        drop(gate);

        self.bus.publish(T::COLLECTION.topic());
        true
    }

    /// Overwrites the collection with a snapshot that is already durable
    /// elsewhere (remote delivery). Publishes but does not persist.
    ///
    /// A snapshot equal to the current state (the echo of a local write)
    /// changes nothing and publishes nothing. Returns whether state changed.
    pub fn replace_all(&self, snapshot: Vec<T>) -> bool {
        {
            let mut state = self.state.write();
            if state.items == snapshot {
                debug!(collection = %T::COLLECTION, "remote snapshot matches local state");
                return false;
            }
            state.high_water = state.high_water.max(max_sequence(&snapshot));
            state.items = snapshot;
        }
        self.bus.publish(T::COLLECTION.topic());
        true
    }

    /// Keeps this repository in step with the remote collection. Each remote
    /// snapshot replaces local state wholesale; the last one delivered wins.
    pub async fn follow_remote(self: &Arc<Self>, sync: &RemoteSync) -> Result<SyncHandle, StoreError> {
        let repo = Arc::downgrade(self);
        sync.subscribe::<T, _>(move |snapshot| {
            if let Some(repo) = repo.upgrade() {
                repo.replace_all(snapshot);
            }
        })
        .await
    }
}
