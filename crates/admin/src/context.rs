//! Request-scoped tenant context.

use planboard_auth::Identity;
use planboard_core::TenantId;
use planboard_infra::{DocumentStore, TenantDirectory, TenantPolicy};
use planboard_session::SessionContext;

use crate::errors::ServiceError;

/// Tenant context for a signed-in identity.
///
/// Immutable. Only constructible for a scoped identity, and (under
/// [`TenantPolicy::RequireExisting`]) only for a tenant that has a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    identity: Identity,
}

impl TenantContext {
    pub async fn for_identity<S>(
        identity: Identity,
        tenants: &TenantDirectory<S>,
        policy: TenantPolicy,
    ) -> Result<Self, ServiceError>
    where
        S: DocumentStore + ?Sized,
    {
        let Some(tenant_id) = identity.tenant_id.clone() else {
            tracing::info!("subject {} has no tenant assigned", identity.subject_id);
            return Err(ServiceError::Unscoped);
        };

        if policy == TenantPolicy::RequireExisting && !tenants.exists(&tenant_id).await? {
            tracing::warn!(
                "subject {} claims tenant {} which has no tenant document",
                identity.subject_id,
                tenant_id
            );
            return Err(ServiceError::UnknownTenant(tenant_id));
        }

        Ok(Self { tenant_id, identity })
    }

    /// Context for whoever is signed in to `session` right now.
    pub async fn for_session<S>(
        session: &SessionContext,
        tenants: &TenantDirectory<S>,
        policy: TenantPolicy,
    ) -> Result<Self, ServiceError>
    where
        S: DocumentStore + ?Sized,
    {
        let identity = session.identity().ok_or(ServiceError::NotSignedIn)?;
        Self::for_identity(identity, tenants, policy).await
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
