//! Configuration loading and representation.

use thiserror::Error;

use crate::path::PathScheme;

pub const ROOT_COLLECTION_VAR: &str = "PLANBOARD_ROOT_COLLECTION";
pub const REQUIRE_TENANT_VAR: &str = "PLANBOARD_REQUIRE_TENANT";

pub const DEFAULT_ROOT_COLLECTION: &str = "tenants";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// What to do when a resolved identity names a tenant with no Tenant document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenantPolicy {
    /// Refuse to open a tenant context until the Tenant document exists.
    #[default]
    RequireExisting,
    /// Accept the tenant id from the claims as-is.
    Trust,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanboardConfig {
    pub root_collection: String,
    pub tenant_policy: TenantPolicy,
}

impl Default for PlanboardConfig {
    fn default() -> Self {
        Self {
            root_collection: DEFAULT_ROOT_COLLECTION.to_string(),
            tenant_policy: TenantPolicy::default(),
        }
    }
}

impl PlanboardConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root_collection = lookup(ROOT_COLLECTION_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ROOT_COLLECTION.to_string());

        let require_tenant = match lookup(REQUIRE_TENANT_VAR) {
            None => true,
            Some(raw) => raw.trim().parse::<bool>().unwrap_or_else(|_| {
                tracing::warn!("{REQUIRE_TENANT_VAR}={raw:?} is not a boolean; requiring existing tenants");
                true
            }),
        };

        let config = Self {
            root_collection,
            tenant_policy: if require_tenant {
                TenantPolicy::RequireExisting
            } else {
                TenantPolicy::Trust
            },
        };

        // Fail early on a root that cannot form paths.
        config.path_scheme()?;
        Ok(config)
    }

    pub fn path_scheme(&self) -> Result<PathScheme, ConfigError> {
        PathScheme::new(&self.root_collection).map_err(|e| ConfigError::Invalid {
            var: ROOT_COLLECTION_VAR,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PlanboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlanboardConfig::default());
        assert_eq!(config.root_collection, "tenants");
        assert_eq!(config.tenant_policy, TenantPolicy::RequireExisting);
    }

    #[test]
    fn overrides_are_applied() {
        let config = PlanboardConfig::from_lookup(lookup(&[
            (ROOT_COLLECTION_VAR, "orgs"),
            (REQUIRE_TENANT_VAR, "false"),
        ]))
        .unwrap();

        assert_eq!(config.root_collection, "orgs");
        assert_eq!(config.tenant_policy, TenantPolicy::Trust);
    }

    #[test]
    fn unparseable_flag_keeps_the_strict_policy() {
        let config = PlanboardConfig::from_lookup(lookup(&[(REQUIRE_TENANT_VAR, "maybe")])).unwrap();
        assert_eq!(config.tenant_policy, TenantPolicy::RequireExisting);
    }

    #[test]
    fn root_with_slash_is_rejected() {
        let err = PlanboardConfig::from_lookup(lookup(&[(ROOT_COLLECTION_VAR, "a/b")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ROOT_COLLECTION_VAR, .. }));
    }
}
