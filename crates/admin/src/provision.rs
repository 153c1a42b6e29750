//! Out-of-band provisioning: attach tenant claims to an existing subject.
//!
//! Claims only reach a signed-in client after its token is refreshed (or the
//! user signs out and back in).

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use planboard_auth::{ClaimsError, CustomClaims};
use planboard_core::{DomainError, SubjectId, TenantId};
use planboard_infra::{DocumentStore, RepositoryError, TenantDirectory};
use planboard_planning::{NewTenant, Tenant};
use planboard_session::{IdentityAdmin, UserRecord};

/// Page size used by [`Provisioner::list_users`].
pub const LIST_USERS_LIMIT: usize = 100;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProvisionError {
    #[error("no user with email {0}")]
    UserNotFound(String),

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ProvisionError {
    fn provider(err: anyhow::Error) -> Self {
        ProvisionError::Provider(format!("{err:#}"))
    }
}

/// Outcome of [`Provisioner::assign_claims`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    pub subject_id: SubjectId,
    pub email: String,
    pub tenant: Tenant,
    /// True if the tenant document was created by this call.
    pub tenant_created: bool,
    pub can_edit: bool,
}

/// A subject as seen by provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub subject_id: SubjectId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// `None` when the subject carries no custom claims at all.
    pub claims: Option<CustomClaims>,
}

impl UserSummary {
    fn from_record(record: UserRecord) -> Result<Self, ClaimsError> {
        let claims = if record.custom_claims.is_empty() {
            None
        } else {
            Some(CustomClaims::from_claims(&record.custom_claims)?)
        };
        Ok(Self {
            subject_id: record.subject_id,
            email: record.email,
            display_name: record.display_name,
            claims,
        })
    }
}

pub struct Provisioner<S: ?Sized> {
    admin: Arc<dyn IdentityAdmin>,
    tenants: TenantDirectory<S>,
}

impl<S> Provisioner<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(admin: Arc<dyn IdentityAdmin>, tenants: TenantDirectory<S>) -> Self {
        Self { admin, tenants }
    }

    /// Scope the subject registered under `email` to `tenant_id`.
    ///
    /// Creates the tenant document first if it does not exist yet, named after
    /// the subject. Existing tenant documents are left untouched.
    pub async fn assign_claims(
        &self,
        email: &str,
        tenant_id: &TenantId,
        can_edit: bool,
    ) -> Result<ProvisionReport, ProvisionError> {
        let user = self.find(email).await?;
        tracing::info!("found subject {} for {}", user.subject_id, email);

        let (tenant, tenant_created) = match self.tenants.get(tenant_id).await? {
            Some(existing) => {
                tracing::info!("tenant {} already exists", tenant_id);
                (existing, false)
            }
            None => {
                tracing::info!("tenant {} does not exist; creating it", tenant_id);
                let input = NewTenant::default_for(
                    user.subject_id.clone(),
                    user.display_name.as_deref(),
                    user.email.as_deref().unwrap_or(email),
                )?;
                (self.tenants.create(tenant_id, &input).await?, true)
            }
        };

        let claims = CustomClaims {
            tenant_id: Some(tenant_id.clone()),
            can_edit,
        };
        self.admin
            .set_custom_claims(&user.subject_id, &claims)
            .await
            .map_err(ProvisionError::provider)?;

        tracing::info!(
            "assigned tenant {} (canEdit={}) to {}; the user must refresh claims to see it",
            tenant_id,
            can_edit,
            user.subject_id
        );

        Ok(ProvisionReport {
            subject_id: user.subject_id,
            email: user.email.unwrap_or_else(|| email.to_string()),
            tenant,
            tenant_created,
            can_edit,
        })
    }

    pub async fn inspect(&self, email: &str) -> Result<UserSummary, ProvisionError> {
        let user = self.find(email).await?;
        Ok(UserSummary::from_record(user)?)
    }

    /// Up to [`LIST_USERS_LIMIT`] subjects. Subjects with unreadable claims are
    /// listed without claims.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ProvisionError> {
        let users = self
            .admin
            .list_users(LIST_USERS_LIMIT)
            .await
            .map_err(ProvisionError::provider)?;

        Ok(users
            .into_iter()
            .map(|record| {
                let subject_id = record.subject_id.clone();
                let email = record.email.clone();
                let display_name = record.display_name.clone();
                UserSummary::from_record(record).unwrap_or_else(|err| {
                    tracing::warn!("subject {} has malformed claims: {}", subject_id, err);
                    UserSummary {
                        subject_id,
                        email,
                        display_name,
                        claims: None,
                    }
                })
            })
            .collect())
    }

    async fn find(&self, email: &str) -> Result<UserRecord, ProvisionError> {
        self.admin
            .find_by_email(email)
            .await
            .map_err(ProvisionError::provider)?
            .ok_or_else(|| ProvisionError::UserNotFound(email.to_string()))
    }
}
