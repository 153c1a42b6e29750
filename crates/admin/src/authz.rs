//! Service-side authorization guard.
//!
//! Called before any repository call. Like the gate it wraps, this is advisory:
//! the store's own security rules remain the authoritative check.

use planboard_auth::{authorize, explain_authorization, Action};

use crate::context::TenantContext;
use crate::errors::ServiceError;

pub fn require(ctx: &TenantContext, action: Action) -> Result<(), ServiceError> {
    authorize(ctx.identity(), ctx.tenant_id(), action).map_err(|err| {
        let explanation = explain_authorization(ctx.identity(), ctx.tenant_id(), action);
        tracing::warn!(
            "{} denied for subject {}: {}",
            action,
            ctx.identity().subject_id,
            explanation
                .denial_reason
                .as_ref()
                .map(|d| d.message.as_str())
                .unwrap_or(explanation.reason.as_str())
        );
        ServiceError::from(err)
    })
}

pub fn require_view(ctx: &TenantContext) -> Result<(), ServiceError> {
    require(ctx, Action::View)
}

pub fn require_edit(ctx: &TenantContext) -> Result<(), ServiceError> {
    require(ctx, Action::Edit)
}
