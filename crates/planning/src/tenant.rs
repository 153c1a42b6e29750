//! Tenants: the root of isolation. Every other entity lives under one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planboard_core::{DomainResult, Entity, SubjectId, TenantId};

use crate::fields::RequiredText;

/// Tenant document stored at `tenants/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<SubjectId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Tenant {
    type Id = TenantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for creating a tenant (provisioning only).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub name: RequiredText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<SubjectId>,
}

impl NewTenant {
    /// Default tenant created lazily when claims are first assigned:
    /// `"<display name or email>'s Company"`, owned by that subject.
    pub fn default_for(owner: SubjectId, display_name: Option<&str>, email: &str) -> DomainResult<Self> {
        let who = display_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(email);
        Ok(Self {
            name: RequiredText::parse("name", format!("{who}'s Company"))?,
            owner_id: Some(owner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_prefers_display_name() {
        let owner = SubjectId::new("uid-1").unwrap();

        let named = NewTenant::default_for(owner.clone(), Some("Ana"), "ana@demo.com").unwrap();
        assert_eq!(named.name.as_str(), "Ana's Company");

        let unnamed = NewTenant::default_for(owner.clone(), Some("  "), "ana@demo.com").unwrap();
        assert_eq!(unnamed.name.as_str(), "ana@demo.com's Company");
        assert_eq!(unnamed.owner_id, Some(owner));
    }
}
