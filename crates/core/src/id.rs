//! Strongly-typed identifiers used across the domain.
//!
//! Every identifier ends up as a segment of a document path
//! (`tenants/{tenant}/teams/{team}`), so construction rejects values that could
//! escape their partition: empty strings, `/`, and the relative segments `.`
//! and `..`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a tenant (multi-tenant isolation boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

/// Identifier of an authenticated subject at the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

/// Identifier of an employee document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

/// Identifier of a team document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

/// Identifier of a planning record document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

/// Identifier of a saved view document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewId(String);

/// Reject values that cannot be used as a single document path segment.
pub fn check_segment(value: &str, name: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: must not be empty")));
    }
    if value.contains('/') {
        return Err(DomainError::invalid_id(format!(
            "{name}: must not contain '/' (got {value:?})"
        )));
    }
    if value == "." || value == ".." {
        return Err(DomainError::invalid_id(format!(
            "{name}: relative segment {value:?} is not allowed"
        )));
    }
    Ok(())
}

macro_rules! impl_string_id {
    ($t:ident, $name:literal) => {
        impl $t {
            /// Validate and wrap an identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                check_segment(&value, $name)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_id!(TenantId, "TenantId");
impl_string_id!(SubjectId, "SubjectId");
impl_string_id!(EmployeeId, "EmployeeId");
impl_string_id!(TeamId, "TeamId");
impl_string_id!(RecordId, "RecordId");
impl_string_id!(ViewId, "ViewId");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_identifiers() {
        let id = TenantId::new("demo-company").unwrap();
        assert_eq!(id.as_str(), "demo-company");
        assert_eq!(id.to_string(), "demo-company");
    }

    #[test]
    fn rejects_values_that_escape_a_path_segment() {
        for bad in ["", "   ", "a/b", "/", ".", ".."] {
            assert!(TenantId::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: TeamId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(ok.as_str(), "t1");

        let err = serde_json::from_str::<TeamId>("\"tenants/other\"");
        assert!(err.is_err());
    }

    proptest! {
        #[test]
        fn slash_free_identifiers_round_trip(s in "[A-Za-z0-9_-]{1,24}") {
            let id = EmployeeId::new(s.clone()).unwrap();
            let json = serde_json::to_string(&id).unwrap();
            let back: EmployeeId = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back.as_str(), s.as_str());
        }
    }
}
