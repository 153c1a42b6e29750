use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::path::{CollectionPath, DocumentPath};

use super::query::Query;
use super::store::{Document, DocumentStore, SnapshotReceiver, StoreError};
use super::value::Fields;

type Collection = BTreeMap<String, Fields>;

struct Watcher {
    collection: CollectionPath,
    query: Query,
    tx: mpsc::UnboundedSender<Result<Vec<Document>, StoreError>>,
}

/// In-memory document store.
///
/// Intended for tests/dev. Ids from `add` are UUID v7 (simple form), so they
/// sort by creation time. A failure can be injected with [`Self::set_failure`].
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<CollectionPath, Collection>>,
    watchers: Mutex<Vec<Watcher>>,
    failure: RwLock<Option<StoreError>>,
}

impl core::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryDocumentStore").finish_non_exhaustive()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `failure` (or succeed again with `None`).
    pub fn set_failure(&self, failure: Option<StoreError>) {
        if let Ok(mut slot) = self.failure.write() {
            *slot = failure;
        }
    }

    /// Number of live watches (closed receivers are pruned on the next change).
    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().map(|w| w.len()).unwrap_or(0)
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.read() {
            Ok(slot) => slot.clone().map_or(Ok(()), Err),
            Err(_) => Err(poisoned()),
        }
    }

    fn snapshot(&self, collection: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check()?;
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let docs = collections
            .get(collection)
            .into_iter()
            .flat_map(|c| c.iter())
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            });
        Ok(query.apply(docs))
    }

    fn write<R>(
        &self,
        collection: &CollectionPath,
        f: impl FnOnce(&mut Collection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        self.check()?;
        let result = {
            let mut collections = self.collections.write().map_err(|_| poisoned())?;
            f(collections.entry(collection.clone()).or_default())?
        };
        self.notify(collection);
        Ok(result)
    }

    fn notify(&self, collection: &CollectionPath) {
        let Ok(mut watchers) = self.watchers.lock() else {
            return;
        };

        // Drop any dead watchers while publishing.
        watchers.retain(|w| {
            if &w.collection != collection {
                return !w.tx.is_closed();
            }
            let snapshot = self.snapshot(&w.collection, &w.query);
            w.tx.send(snapshot).is_ok()
        });
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        self.check()?;
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(path.collection())
            .and_then(|c| c.get(path.id()))
            .map(|fields| Document {
                id: path.id().to_string(),
                fields: fields.clone(),
            }))
    }

    async fn query(&self, collection: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.snapshot(collection, query)
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::now_v7().simple().to_string();
        let key = id.clone();
        self.write(collection, move |c| {
            c.insert(key, fields);
            Ok(())
        })?;
        Ok(id)
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        let id = path.id().to_string();
        self.write(path.collection(), move |c| {
            c.insert(id, fields);
            Ok(())
        })
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        self.write(path.collection(), |c| {
            let existing = c
                .get_mut(path.id())
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            existing.extend(fields);
            Ok(())
        })
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        self.write(path.collection(), |c| {
            c.remove(path.id());
            Ok(())
        })
    }

    fn watch(&self, collection: &CollectionPath, query: Query) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();

        // Hold the watchers lock across the initial snapshot so a concurrent
        // write is either in it or notified afterwards. Same order as `notify`.
        let Ok(mut watchers) = self.watchers.lock() else {
            let _ = tx.send(Err(poisoned()));
            return rx;
        };

        // On failure the receiver yields the initial error and then ends.
        let initial = self.snapshot(collection, &query);
        let failed = initial.is_err();
        if tx.send(initial).is_err() || failed {
            return rx;
        }

        watchers.push(Watcher {
            collection: collection.clone(),
            query,
            tx,
        });
        rx
    }
}
