//! Identity provider boundary.
//!
//! Errors crossing this boundary are opaque (`anyhow`); the session turns
//! them into messages and states.

use serde_json::{Map, Value};
use tokio::sync::mpsc;

use planboard_auth::{CustomClaims, VerifiedToken};
use planboard_core::SubjectId;

/// Signed-in user as the provider reports it, before claims are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentity {
    pub subject_id: SubjectId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Client-side identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Sign-in state changes. The current state is delivered first.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<RawIdentity>>;

    fn current(&self) -> Option<RawIdentity>;

    /// Verified token details for `identity`. With `force_refresh` the
    /// provider must issue a fresh token carrying the latest claims.
    async fn fetch_token(&self, identity: &RawIdentity, force_refresh: bool) -> anyhow::Result<VerifiedToken>;

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<RawIdentity>;

    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<RawIdentity>;

    async fn update_display_name(&self, identity: &RawIdentity, display_name: &str) -> anyhow::Result<()>;

    async fn sign_out(&self) -> anyhow::Result<()>;
}

/// A user as seen by the privileged admin side of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub subject_id: SubjectId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub custom_claims: Map<String, Value>,
}

/// Privileged provider operations used by provisioning.
#[async_trait::async_trait]
pub trait IdentityAdmin: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;

    /// Replace the subject's custom claims. Takes effect on the next forced
    /// token refresh.
    async fn set_custom_claims(&self, subject_id: &SubjectId, claims: &CustomClaims) -> anyhow::Result<()>;

    async fn list_users(&self, limit: usize) -> anyhow::Result<Vec<UserRecord>>;
}
