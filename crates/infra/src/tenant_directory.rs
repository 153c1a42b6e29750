//! Root tenant documents (`{root}/{tenantId}`).

use std::sync::Arc;

use planboard_core::{Clock, TenantId};
use planboard_planning::{NewTenant, Tenant};

use crate::document::{DocumentStore, FieldValue};
use crate::path::{EntityKind, PathScheme};
use crate::repository::binding::fields;
use crate::repository::{codec, Operation, RepositoryError};

pub struct TenantDirectory<S: ?Sized> {
    store: Arc<S>,
    scheme: PathScheme,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> Clone for TenantDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scheme: self.scheme.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S> TenantDirectory<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, scheme: PathScheme, clock: Arc<dyn Clock>) -> Self {
        Self { store, scheme, clock }
    }

    pub async fn get(&self, tenant_id: &TenantId) -> Result<Option<Tenant>, RepositoryError> {
        let found = self
            .store
            .get(&self.scheme.tenant(tenant_id))
            .await
            .map_err(RepositoryError::store(EntityKind::Tenant, Operation::GetById))?;

        found
            .map(|doc| {
                codec::decode(&doc).map_err(|message| RepositoryError::Decode {
                    kind: EntityKind::Tenant,
                    id: doc.id.clone(),
                    message,
                })
            })
            .transpose()
    }

    pub async fn exists(&self, tenant_id: &TenantId) -> Result<bool, RepositoryError> {
        Ok(self.get(tenant_id).await?.is_some())
    }

    /// Write the tenant document under an explicit id, replacing any existing one.
    pub async fn create(&self, tenant_id: &TenantId, input: &NewTenant) -> Result<Tenant, RepositoryError> {
        let mut document = codec::encode(input, &[]).map_err(|message| RepositoryError::Encode {
            kind: EntityKind::Tenant,
            operation: Operation::Create,
            message,
        })?;
        let now = self.clock.now();
        document.insert(fields::CREATED_AT.to_string(), FieldValue::from(now));

        self.store
            .set(&self.scheme.tenant(tenant_id), document)
            .await
            .map_err(RepositoryError::store(EntityKind::Tenant, Operation::Create))?;

        tracing::info!("created tenant {} ({})", tenant_id, input.name.as_str());

        Ok(Tenant {
            id: tenant_id.clone(),
            name: input.name.as_str().to_string(),
            owner_id: input.owner_id.clone(),
            created_at: now,
            updated_at: None,
        })
    }
}
