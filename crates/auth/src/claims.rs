use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use planboard_core::{SubjectId, TenantId};

use crate::identity::{Identity, UNKNOWN_USER};

/// Claim key carrying the tenant the subject belongs to.
pub const TENANT_ID_CLAIM: &str = "tenantId";

/// Claim key carrying the edit permission flag.
pub const CAN_EDIT_CLAIM: &str = "canEdit";

/// Token details as returned by the identity provider after verification.
///
/// Signature checking happens on the provider side; this crate only reads
/// the claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedToken {
    /// Subject identifier (`sub`).
    pub subject: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Every claim embedded in the token, custom claims included.
    #[serde(default)]
    pub claims: Map<String, Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    #[error("malformed claim '{claim}': {message}")]
    Malformed { claim: &'static str, message: String },
}

/// The custom claims this system attaches to a subject's token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomClaims {
    pub tenant_id: Option<TenantId>,
    pub can_edit: bool,
}

#[derive(Deserialize)]
struct RawCustomClaims {
    #[serde(rename = "tenantId", default)]
    tenant_id: Option<Value>,
    #[serde(rename = "canEdit", default)]
    can_edit: Option<Value>,
}

impl CustomClaims {
    /// Read `tenantId` and `canEdit` out of a claim map.
    ///
    /// A missing, null or empty `tenantId` is "unscoped", not an error. A
    /// missing `canEdit` is `false`. Values of the wrong JSON type are rejected.
    pub fn from_claims(claims: &Map<String, Value>) -> Result<Self, ClaimsError> {
        let raw: RawCustomClaims = serde_json::from_value(Value::Object(claims.clone()))
            .map_err(|e| ClaimsError::Malformed {
                claim: "claims",
                message: e.to_string(),
            })?;

        let tenant_id = match raw.tenant_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(TenantId::new(s).map_err(|e| ClaimsError::Malformed {
                claim: TENANT_ID_CLAIM,
                message: e.to_string(),
            })?),
            Some(other) => {
                return Err(ClaimsError::Malformed {
                    claim: TENANT_ID_CLAIM,
                    message: format!("expected a string, got {other}"),
                });
            }
        };

        let can_edit = match raw.can_edit {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(other) => {
                return Err(ClaimsError::Malformed {
                    claim: CAN_EDIT_CLAIM,
                    message: format!("expected a boolean, got {other}"),
                });
            }
        };

        Ok(Self { tenant_id, can_edit })
    }

    /// Claim map written by provisioning.
    pub fn to_claims(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(tenant_id) = &self.tenant_id {
            map.insert(TENANT_ID_CLAIM.to_string(), Value::String(tenant_id.to_string()));
        }
        map.insert(CAN_EDIT_CLAIM.to_string(), Value::Bool(self.can_edit));
        map
    }
}

/// Derive the session identity from a verified token.
///
/// Pure. Callers treat an `Err` as "no identity", the same as signed out.
pub fn resolve_identity(token: &VerifiedToken) -> Result<Identity, ClaimsError> {
    let subject_id =
        SubjectId::new(token.subject.clone()).map_err(|e| ClaimsError::InvalidSubject(e.to_string()))?;
    let custom = CustomClaims::from_claims(&token.claims)?;

    let email = token.email.clone().unwrap_or_default();
    let display_name = [token.display_name.as_deref(), token.email.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_USER)
        .to_string();

    Ok(Identity {
        subject_id,
        email,
        display_name,
        tenant_id: custom.tenant_id,
        can_edit: custom.can_edit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn token(claims: Value) -> VerifiedToken {
        let Value::Object(claims) = claims else {
            panic!("claims must be an object");
        };
        VerifiedToken {
            subject: "uid-ana".to_string(),
            email: Some("ana@demo.com".to_string()),
            display_name: Some("Ana Ruiz".to_string()),
            issued_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            claims,
        }
    }

    #[test]
    fn resolves_tenant_and_edit_flag() {
        let identity = resolve_identity(&token(json!({ "tenantId": "demo", "canEdit": true }))).unwrap();

        assert_eq!(identity.tenant_id, Some(TenantId::new("demo").unwrap()));
        assert!(identity.can_edit);
        assert_eq!(identity.display_name, "Ana Ruiz");
        assert_eq!(identity.email, "ana@demo.com");
    }

    #[test]
    fn missing_tenant_is_unscoped_not_an_error() {
        let identity = resolve_identity(&token(json!({}))).unwrap();
        assert_eq!(identity.tenant_id, None);
        assert!(!identity.can_edit);

        let empty = resolve_identity(&token(json!({ "tenantId": "" }))).unwrap();
        assert_eq!(empty.tenant_id, None);
    }

    #[test]
    fn malformed_claims_are_rejected() {
        let wrong_type = resolve_identity(&token(json!({ "tenantId": 42 })));
        assert!(matches!(
            wrong_type,
            Err(ClaimsError::Malformed { claim: TENANT_ID_CLAIM, .. })
        ));

        let bad_flag = resolve_identity(&token(json!({ "tenantId": "demo", "canEdit": "yes" })));
        assert!(matches!(
            bad_flag,
            Err(ClaimsError::Malformed { claim: CAN_EDIT_CLAIM, .. })
        ));

        let bad_segment = resolve_identity(&token(json!({ "tenantId": "a/b" })));
        assert!(bad_segment.is_err());
    }

    #[test]
    fn display_name_falls_back_to_email_then_unknown() {
        let mut t = token(json!({}));
        t.display_name = None;
        assert_eq!(resolve_identity(&t).unwrap().display_name, "ana@demo.com");

        t.email = None;
        let identity = resolve_identity(&t).unwrap();
        assert_eq!(identity.display_name, UNKNOWN_USER);
        assert_eq!(identity.email, "");
    }

    #[test]
    fn provisioned_claims_resolve_back() {
        let custom = CustomClaims {
            tenant_id: Some(TenantId::new("demo").unwrap()),
            can_edit: true,
        };
        let mut t = token(json!({}));
        t.claims = custom.to_claims();

        assert_eq!(CustomClaims::from_claims(&t.claims).unwrap(), custom);
    }

    proptest! {
        #[test]
        fn tenant_and_flag_round_trip_through_claims(
            tenant in "[A-Za-z0-9_-]{1,24}",
            can_edit in any::<bool>(),
            include_flag in any::<bool>(),
        ) {
            let claims = if include_flag {
                json!({ "tenantId": tenant.clone(), "canEdit": can_edit })
            } else {
                json!({ "tenantId": tenant.clone() })
            };

            let identity = resolve_identity(&token(claims)).unwrap();
            let tenant_id = identity.tenant_id.unwrap();
            prop_assert_eq!(tenant_id.as_str(), tenant.as_str());
            prop_assert_eq!(identity.can_edit, include_flag && can_edit);
        }
    }
}
