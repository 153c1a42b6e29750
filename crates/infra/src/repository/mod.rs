//! Tenant-scoped repositories.
//!
//! Every operation takes the tenant id first; there is no way to reach a
//! document without naming its tenant. Paths come from [`PathScheme`] and
//! timestamps are converted by [`codec`], so neither concern leaks to callers.

pub mod binding;
pub mod codec;
pub mod error;
pub mod queries;
pub mod subscription;

use std::marker::PhantomData;
use std::sync::Arc;

use planboard_core::{Clock, TenantId};
use planboard_planning::{Employee, Record, Team, View};

use crate::document::{Direction, Document, DocumentStore, FieldValue, Query, StoreError};
use crate::path::{CollectionPath, DocumentPath, PathScheme};
use crate::tenant_directory::TenantDirectory;

pub use binding::TenantDocument;
pub use error::{Operation, RepositoryError};
pub use subscription::Subscription;

/// Generic CRUD over one entity kind inside tenant partitions.
///
/// The store handle is shared (`Arc<S>`); the repository adds no locking.
pub struct TenantRepository<E, S: ?Sized> {
    store: Arc<S>,
    scheme: PathScheme,
    clock: Arc<dyn Clock>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S: ?Sized> Clone for TenantRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scheme: self.scheme.clone(),
            clock: Arc::clone(&self.clock),
            _entity: PhantomData,
        }
    }
}

impl<E, S> TenantRepository<E, S>
where
    E: TenantDocument,
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, scheme: PathScheme, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            scheme,
            clock,
            _entity: PhantomData,
        }
    }

    fn collection(&self, tenant_id: &TenantId) -> CollectionPath {
        self.scheme.collection(tenant_id, E::KIND)
    }

    fn document(&self, tenant_id: &TenantId, id: &E::Id) -> DocumentPath {
        self.scheme.document(tenant_id, E::KIND, id)
    }

    fn store_error(tenant_id: &TenantId, operation: Operation) -> impl FnOnce(StoreError) -> RepositoryError {
        let tenant = tenant_id.clone();
        move |source| {
            tracing::warn!("{} {} failed in tenant {}: {}", E::KIND, operation, tenant, source);
            RepositoryError::store(E::KIND, operation)(source)
        }
    }

    fn encode_error(operation: Operation) -> impl FnOnce(String) -> RepositoryError {
        move |message| RepositoryError::Encode {
            kind: E::KIND,
            operation,
            message,
        }
    }

    /// Every entity of this kind in the tenant, in the kind's default order.
    pub async fn list_all(&self, tenant_id: &TenantId) -> Result<Vec<E>, RepositoryError> {
        self.run_query(tenant_id, &default_query::<E>(), Operation::ListAll)
            .await
    }

    pub async fn get_by_id(&self, tenant_id: &TenantId, id: &E::Id) -> Result<Option<E>, RepositoryError> {
        let found = self
            .store
            .get(&self.document(tenant_id, id))
            .await
            .map_err(Self::store_error(tenant_id, Operation::GetById))?;
        found.as_ref().map(decode_entity::<E>).transpose()
    }

    /// Insert a new entity; the store assigns the id. `createdAt` is stamped here.
    pub async fn create(&self, tenant_id: &TenantId, input: &E::New) -> Result<E::Id, RepositoryError> {
        let mut fields = codec::encode(input, E::TIMESTAMP_FIELDS)
            .map_err(Self::encode_error(Operation::Create))?;

        let now = FieldValue::from(self.clock.now());
        if E::STAMP_UPDATED_ON_CREATE {
            fields.insert(binding::fields::UPDATED_AT.to_string(), now.clone());
        }
        fields.insert(binding::fields::CREATED_AT.to_string(), now);

        let raw = self
            .store
            .add(&self.collection(tenant_id), fields)
            .await
            .map_err(Self::store_error(tenant_id, Operation::Create))?;

        tracing::debug!("created {} {} in tenant {}", E::KIND, raw, tenant_id);

        E::parse_id(raw.clone()).map_err(|e| RepositoryError::Decode {
            kind: E::KIND,
            id: raw,
            message: e.to_string(),
        })
    }

    /// Merge `patch` into the stored entity. `updatedAt` is always stamped
    /// with the current time, whatever the caller sent.
    pub async fn update(&self, tenant_id: &TenantId, id: &E::Id, patch: &E::Patch) -> Result<(), RepositoryError> {
        let mut fields = codec::encode(patch, E::TIMESTAMP_FIELDS)
            .map_err(Self::encode_error(Operation::Update))?;
        fields.insert(
            binding::fields::UPDATED_AT.to_string(),
            FieldValue::from(self.clock.now()),
        );

        self.store
            .update(&self.document(tenant_id, id), fields)
            .await
            .map_err(Self::store_error(tenant_id, Operation::Update))?;

        tracing::debug!("updated {} {} in tenant {}", E::KIND, id.as_ref(), tenant_id);
        Ok(())
    }

    /// Irreversible. Deleting a missing entity succeeds.
    pub async fn delete(&self, tenant_id: &TenantId, id: &E::Id) -> Result<(), RepositoryError> {
        self.store
            .delete(&self.document(tenant_id, id))
            .await
            .map_err(Self::store_error(tenant_id, Operation::Delete))?;

        tracing::debug!("deleted {} {} in tenant {}", E::KIND, id.as_ref(), tenant_id);
        Ok(())
    }

    /// Live snapshots of the whole collection, in the default order.
    pub fn subscribe(&self, tenant_id: &TenantId) -> Subscription<E> {
        tracing::debug!("subscribing to {} in tenant {}", E::KIND, tenant_id);
        Subscription::new(self.store.watch(&self.collection(tenant_id), default_query::<E>()))
    }

    pub(crate) async fn run_query(
        &self,
        tenant_id: &TenantId,
        query: &Query,
        operation: Operation,
    ) -> Result<Vec<E>, RepositoryError> {
        let documents = self
            .store
            .query(&self.collection(tenant_id), query)
            .await
            .map_err(Self::store_error(tenant_id, operation))?;
        documents.iter().map(decode_entity::<E>).collect()
    }
}

fn default_query<E: TenantDocument>() -> Query {
    match E::DEFAULT_ORDER {
        Some(field) => Query::new().order_by(field, Direction::Ascending),
        None => Query::new(),
    }
}

pub(crate) fn decode_entity<E: TenantDocument>(document: &Document) -> Result<E, RepositoryError> {
    codec::decode(document).map_err(|message| RepositoryError::Decode {
        kind: E::KIND,
        id: document.id.clone(),
        message,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Bundle
// ─────────────────────────────────────────────────────────────────────────────

/// All repositories over one shared store.
pub struct Repositories<S: ?Sized> {
    pub employees: TenantRepository<Employee, S>,
    pub teams: TenantRepository<Team, S>,
    pub records: TenantRepository<Record, S>,
    pub views: TenantRepository<View, S>,
    pub tenants: TenantDirectory<S>,
}

impl<S> Repositories<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, scheme: PathScheme, clock: Arc<dyn Clock>) -> Self {
        Self {
            employees: TenantRepository::new(Arc::clone(&store), scheme.clone(), Arc::clone(&clock)),
            teams: TenantRepository::new(Arc::clone(&store), scheme.clone(), Arc::clone(&clock)),
            records: TenantRepository::new(Arc::clone(&store), scheme.clone(), Arc::clone(&clock)),
            views: TenantRepository::new(Arc::clone(&store), scheme.clone(), Arc::clone(&clock)),
            tenants: TenantDirectory::new(store, scheme, clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use planboard_core::ManualClock;
    use planboard_planning::{
        EmployeeDisplayName, EmployeePatch, HexColor, NewEmployee, NewTeam, RequiredText,
        TeamDisplayName, TeamPatch,
    };

    use crate::document::InMemoryDocumentStore;

    fn tid(s: &str) -> TenantId {
        TenantId::new(s).unwrap()
    }

    fn repos() -> (Arc<InMemoryDocumentStore>, Repositories<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 10, 13, 8, 0, 0).unwrap(),
        ));
        let repos = Repositories::new(Arc::clone(&store), PathScheme::default(), clock);
        (store, repos)
    }

    fn sales() -> NewTeam {
        NewTeam {
            full_name: RequiredText::parse("fullName", "Sales Team").unwrap(),
            display_name: TeamDisplayName::parse("SALES").unwrap(),
            color: HexColor::parse("#16A34A").unwrap(),
            manager_id: None,
        }
    }

    fn new_employee(name: &str, team: &planboard_core::TeamId) -> NewEmployee {
        NewEmployee {
            full_name: RequiredText::parse("fullName", format!("{name} Ruiz")).unwrap(),
            display_name: EmployeeDisplayName::parse(name).unwrap(),
            team_id: team.clone(),
            can_edit: false,
            email: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_, repos) = repos();
        let demo = tid("demo");

        let id = repos.teams.create(&demo, &sales()).await.unwrap();
        let team = repos.teams.get_by_id(&demo, &id).await.unwrap().unwrap();

        assert_eq!(team.id, id);
        assert_eq!(team.full_name, "Sales Team");
        assert_eq!(team.display_name, "SALES");
        assert_eq!(team.color.as_str(), "#16A34A");
        assert_eq!(team.created_at, Utc.with_ymd_and_hms(2025, 10, 13, 8, 0, 0).unwrap());
        assert_eq!(team.updated_at, None);
    }

    #[tokio::test]
    async fn update_merges_and_advances_updated_at() {
        let (_, repos) = repos();
        let demo = tid("demo");
        let id = repos.teams.create(&demo, &sales()).await.unwrap();

        let patch = TeamPatch {
            display_name: Some(TeamDisplayName::parse("VENTAS").unwrap()),
            ..Default::default()
        };
        repos.teams.update(&demo, &id, &patch).await.unwrap();
        let first = repos.teams.get_by_id(&demo, &id).await.unwrap().unwrap();

        repos.teams.update(&demo, &id, &patch).await.unwrap();
        let second = repos.teams.get_by_id(&demo, &id).await.unwrap().unwrap();

        assert_eq!(second.display_name, "VENTAS");
        assert_eq!(second.full_name, "Sales Team");
        assert!(second.updated_at.unwrap() > first.updated_at.unwrap());
        assert!(first.updated_at.unwrap() > first.created_at);
    }

    #[tokio::test]
    async fn cleared_optional_field_reads_back_as_none() {
        let (_, repos) = repos();
        let demo = tid("demo");
        let team = repos.teams.create(&demo, &sales()).await.unwrap();

        let mut input = new_employee("Ana", &team);
        input.email = Some(planboard_planning::EmailAddress::parse("ana@demo.com").unwrap());
        let id = repos.employees.create(&demo, &input).await.unwrap();

        let patch = EmployeePatch {
            email: Some(None),
            ..Default::default()
        };
        repos.employees.update(&demo, &id, &patch).await.unwrap();

        let ana = repos.employees.get_by_id(&demo, &id).await.unwrap().unwrap();
        assert_eq!(ana.email, None);
    }

    #[tokio::test]
    async fn list_all_orders_by_display_name() {
        let (_, repos) = repos();
        let demo = tid("demo");
        let team = repos.teams.create(&demo, &sales()).await.unwrap();
        for name in ["Zoe", "Ana", "Luis"] {
            repos.employees.create(&demo, &new_employee(name, &team)).await.unwrap();
        }

        let names: Vec<_> = repos
            .employees
            .list_all(&demo)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, ["Ana", "Luis", "Zoe"]);
    }

    #[tokio::test]
    async fn update_of_missing_entity_is_a_store_error() {
        let (_, repos) = repos();
        let ghost = planboard_core::TeamId::new("ghost").unwrap();

        let err = repos
            .teams
            .update(&tid("demo"), &ghost, &TeamPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            RepositoryError::Store {
                operation: Operation::Update,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn store_failure_carries_kind_and_operation() {
        let (store, repos) = repos();
        store.set_failure(Some(StoreError::Unavailable("offline".to_string())));

        let err = repos.employees.list_all(&tid("demo")).await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Store {
                kind: crate::path::EntityKind::Employee,
                operation: Operation::ListAll,
                source: StoreError::Unavailable("offline".to_string()),
            }
        );
        assert_eq!(err.to_string(), "employee list_all failed: store unavailable: offline");
    }

    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        let (store, repos) = repos();
        let demo = tid("demo");
        let path = PathScheme::default().document(&demo, crate::path::EntityKind::Team, "t-bad");
        store
            .set(&path, [("fullName".to_string(), FieldValue::Integer(3))].into())
            .await
            .unwrap();

        let err = repos.teams.list_all(&demo).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Decode { ref id, .. } if id == "t-bad"));
    }
}
