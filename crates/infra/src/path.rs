//! Document path construction.
//!
//! Every path the repositories touch is built here:
//! `{root}/{tenantId}` for tenants and
//! `{root}/{tenantId}/{employees|teams|records|views}/{docId}` for the rest.

use serde::Serialize;

use planboard_core::{check_segment, DomainResult, TenantId};

/// Entity kinds stored under a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    Team,
    Record,
    View,
    Tenant,
}

impl EntityKind {
    /// Collection segment holding documents of this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employees",
            EntityKind::Team => "teams",
            EntityKind::Record => "records",
            EntityKind::View => "views",
            EntityKind::Tenant => "tenants",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            EntityKind::Employee => "employee",
            EntityKind::Team => "team",
            EntityKind::Record => "record",
            EntityKind::View => "view",
            EntityKind::Tenant => "tenant",
        })
    }
}

/// Slash-separated collection path, e.g. `tenants/demo/employees`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn doc(&self, id: impl AsRef<str>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.as_ref().to_string(),
        }
    }
}

impl core::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl core::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Path layout rooted at a configurable top-level collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathScheme {
    root: String,
}

impl Default for PathScheme {
    fn default() -> Self {
        Self {
            root: crate::config::DEFAULT_ROOT_COLLECTION.to_string(),
        }
    }
}

impl PathScheme {
    pub fn new(root: impl Into<String>) -> DomainResult<Self> {
        let root = root.into();
        check_segment(&root, "root collection")?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Collection holding the tenant documents themselves.
    pub fn tenants(&self) -> CollectionPath {
        CollectionPath(self.root.clone())
    }

    pub fn tenant(&self, tenant_id: &TenantId) -> DocumentPath {
        self.tenants().doc(tenant_id)
    }

    pub fn collection(&self, tenant_id: &TenantId, kind: EntityKind) -> CollectionPath {
        CollectionPath(format!("{}/{}/{}", self.root, tenant_id, kind.collection()))
    }

    pub fn document(&self, tenant_id: &TenantId, kind: EntityKind, id: impl AsRef<str>) -> DocumentPath {
        self.collection(tenant_id, kind).doc(id)
    }
}
