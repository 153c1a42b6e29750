use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::path::{CollectionPath, DocumentPath};

use super::query::Query;
use super::value::Fields;

/// A stored document: its id within the collection plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Document store operation error.
///
/// These are infrastructure errors (availability, missing documents) as
/// opposed to domain errors (validation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

/// Receiver side of a watch: one full snapshot per change.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<Result<Vec<Document>, StoreError>>;

/// Hierarchical document store boundary.
///
/// Writes are last-write-wins per document. There are no transactions.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    async fn query(&self, collection: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Insert with a store-generated id; returns the id.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError>;

    /// Create or fully replace the document at `path`.
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document. `NotFound` if it is missing.
    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError>;

    /// Remove the document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError>;

    /// Watch a query. The receiver gets the current snapshot right away and a
    /// fresh snapshot after every change to the collection. Dropping or
    /// closing the receiver ends the watch.
    fn watch(&self, collection: &CollectionPath, query: Query) -> SnapshotReceiver;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        (**self).get(path).await
    }

    async fn query(&self, collection: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        (**self).query(collection, query).await
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        (**self).add(collection, fields).await
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        (**self).set(path, fields).await
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        (**self).update(path, fields).await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        (**self).delete(path).await
    }

    fn watch(&self, collection: &CollectionPath, query: Query) -> SnapshotReceiver {
        (**self).watch(collection, query)
    }
}
