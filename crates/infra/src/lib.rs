//! Infrastructure layer: document store boundary, tenant-scoped repositories, config.

pub mod config;
pub mod document;
pub mod path;
pub mod repository;
pub mod tenant_directory;

pub use config::{ConfigError, PlanboardConfig, TenantPolicy};
pub use document::{
    Direction, Document, DocumentStore, FieldValue, Fields, InMemoryDocumentStore, Query,
    StoreError, StoreTimestamp,
};
pub use path::{CollectionPath, DocumentPath, EntityKind, PathScheme};
pub use repository::{
    Operation, Repositories, RepositoryError, Subscription, TenantDocument, TenantRepository,
};
pub use tenant_directory::TenantDirectory;
