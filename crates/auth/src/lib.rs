//! `planboard-auth` — claims resolution and the permission gate.
//!
//! Pure decisions over already-verified tokens; no transport, no storage.

pub mod authorize;
pub mod claims;
pub mod identity;
pub mod permissions;

pub use authorize::{
    authorize, can_access_tenant, can_delete_team, can_mutate, explain_authorization,
    AuthorizationExplanation, AuthzError, DenialKind,
};
pub use claims::{resolve_identity, ClaimsError, CustomClaims, VerifiedToken};
pub use identity::Identity;
pub use permissions::Action;
