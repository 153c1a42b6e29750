use serde::{Deserialize, Serialize};

use planboard_core::{SubjectId, TenantId};

/// Display name used when a token carries neither a name nor an email.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Identity resolved from a verified token for the lifetime of a session.
///
/// Never persisted. `tenant_id == None` means "authenticated but unscoped":
/// the subject exists but has no tenant access until claims are provisioned
/// and the token is refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject_id: SubjectId,
    pub email: String,
    pub display_name: String,
    pub tenant_id: Option<TenantId>,
    pub can_edit: bool,
}

impl Identity {
    pub fn is_scoped(&self) -> bool {
        self.tenant_id.is_some()
    }
}
