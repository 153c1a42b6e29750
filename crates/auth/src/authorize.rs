//! Permission gate.
//!
//! # Enforcement boundary
//!
//! Every check in this module is advisory. It keeps the client from issuing
//! calls that would be refused anyway and gives the user a clear reason. The
//! authoritative enforcement lives in the document store's declarative
//! security rules, keyed on the same `tenantId` / `canEdit` token claims. A
//! production deployment must never rely on this gate as its only guard.

use serde::Serialize;
use thiserror::Error;

use planboard_core::{SubjectId, TenantId};
use planboard_planning::{Employee, Team};

use crate::{Action, Identity};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("identity has no tenant assigned")]
    Unscoped,

    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: identity cannot edit")]
    ReadOnly,
}

/// True iff the identity is scoped to exactly `tenant_id`.
pub fn can_access_tenant(identity: &Identity, tenant_id: &TenantId) -> bool {
    identity.tenant_id.as_ref() == Some(tenant_id)
}

/// True iff the identity may create, update or delete tenant entities.
pub fn can_mutate(identity: &Identity) -> bool {
    identity.can_edit
}

/// True iff no employee is assigned to `team`.
pub fn can_delete_team(team: &Team, employees: &[Employee]) -> bool {
    !employees.iter().any(|e| e.belongs_to(&team.id))
}

/// Authorize `action` for `identity` inside `tenant_id`.
///
/// - No IO
/// - No panics
pub fn authorize(identity: &Identity, tenant_id: &TenantId, action: Action) -> Result<(), AuthzError> {
    if identity.tenant_id.is_none() {
        return Err(AuthzError::Unscoped);
    }
    if !can_access_tenant(identity, tenant_id) {
        return Err(AuthzError::TenantMismatch);
    }
    if action.is_mutation() && !can_mutate(identity) {
        return Err(AuthzError::ReadOnly);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Explanation of an authorization decision, suitable for logs and support.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub action: Action,
    pub target_tenant_id: TenantId,
    pub granted: bool,
    pub reason: String,
    pub identity: IdentityState,
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityState {
    pub subject_id: SubjectId,
    pub tenant_id: Option<TenantId>,
    pub can_edit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unscoped,
    TenantMismatch,
    ReadOnly,
}

impl From<&AuthzError> for DenialKind {
    fn from(err: &AuthzError) -> Self {
        match err {
            AuthzError::Unscoped => DenialKind::Unscoped,
            AuthzError::TenantMismatch => DenialKind::TenantMismatch,
            AuthzError::ReadOnly => DenialKind::ReadOnly,
        }
    }
}

/// Explain why `authorize` grants or denies `action`.
///
/// Always agrees with [`authorize`].
pub fn explain_authorization(
    identity: &Identity,
    tenant_id: &TenantId,
    action: Action,
) -> AuthorizationExplanation {
    let state = IdentityState {
        subject_id: identity.subject_id.clone(),
        tenant_id: identity.tenant_id.clone(),
        can_edit: identity.can_edit,
    };

    let (granted, reason, denial_reason) = match authorize(identity, tenant_id, action) {
        Ok(()) => {
            let reason = match action {
                Action::View => format!("Identity is scoped to tenant {tenant_id}"),
                Action::Edit => format!("Identity is scoped to tenant {tenant_id} and has canEdit"),
            };
            (true, reason, None)
        }
        Err(err) => {
            let (message, suggestions) = match &err {
                AuthzError::Unscoped => (
                    "Identity is authenticated but has no tenant assigned".to_string(),
                    vec![
                        "Provision tenantId/canEdit claims for this subject".to_string(),
                        "Force a claims refresh after provisioning".to_string(),
                    ],
                ),
                AuthzError::TenantMismatch => (
                    format!(
                        "Identity belongs to tenant {} but tenant {tenant_id} was requested",
                        identity
                            .tenant_id
                            .as_ref()
                            .map(TenantId::as_str)
                            .unwrap_or("<none>")
                    ),
                    vec!["Use the tenant id from the resolved identity".to_string()],
                ),
                AuthzError::ReadOnly => (
                    format!("Action '{action}' requires canEdit"),
                    vec!["Re-provision the subject with canEdit=true and refresh claims".to_string()],
                ),
            };
            let reason = format!("Denied: {err}");
            let denial = DenialReason {
                kind: DenialKind::from(&err),
                message,
                suggestions,
            };
            (false, reason, Some(denial))
        }
    };

    AuthorizationExplanation {
        action,
        target_tenant_id: tenant_id.clone(),
        granted,
        reason,
        identity: state,
        denial_reason,
    }
}
