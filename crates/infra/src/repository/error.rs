use thiserror::Error;

use crate::document::StoreError;
use crate::path::EntityKind;

/// Repository operation, carried by errors so callers can tell what failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListAll,
    GetById,
    Create,
    Update,
    Delete,
    Subscribe,
    /// A named query primitive such as `list_by_team`.
    Query(&'static str),
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Operation::ListAll => "list_all",
            Operation::GetById => "get_by_id",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Subscribe => "subscribe",
            Operation::Query(name) => name,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("{kind} {operation} failed: {source}")]
    Store {
        kind: EntityKind,
        operation: Operation,
        #[source]
        source: StoreError,
    },

    #[error("{kind} document '{id}' is malformed: {message}")]
    Decode {
        kind: EntityKind,
        id: String,
        message: String,
    },

    #[error("{kind} {operation}: input could not be encoded: {message}")]
    Encode {
        kind: EntityKind,
        operation: Operation,
        message: String,
    },
}

impl RepositoryError {
    pub fn store(kind: EntityKind, operation: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| RepositoryError::Store {
            kind,
            operation,
            source,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            RepositoryError::Store { kind, .. }
            | RepositoryError::Decode { kind, .. }
            | RepositoryError::Encode { kind, .. } => *kind,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::Store {
                source: StoreError::NotFound(_),
                ..
            }
        )
    }
}
