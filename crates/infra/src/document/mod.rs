//! Document store boundary.
//!
//! A hierarchical, last-write-wins document store addressed by slash paths,
//! with a store-native timestamp type and snapshot watches.

pub mod in_memory;
pub mod query;
pub mod store;
pub mod value;

pub use in_memory::InMemoryDocumentStore;
pub use query::{Direction, Filter, Query};
pub use store::{Document, DocumentStore, SnapshotReceiver, StoreError};
pub use value::{FieldValue, Fields, StoreTimestamp};
