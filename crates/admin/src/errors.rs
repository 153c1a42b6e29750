use serde::Serialize;
use thiserror::Error;

use planboard_auth::AuthzError;
use planboard_core::{DomainError, EmployeeId, TeamId, TenantId};
use planboard_infra::{EntityKind, RepositoryError};

/// What the user should be told when a service call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserOutcome {
    /// No resolved identity: send the user back to sign-in.
    SignInAgain,
    /// Signed in without a tenant: an admin must assign one, then refresh claims.
    AssignTenant,
    /// The request was refused before touching the store.
    Rejected,
    /// The store call failed; the operation was aborted and data should be re-fetched.
    Aborted,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("identity has no tenant assigned")]
    Unscoped,

    #[error("tenant {0} does not exist")]
    UnknownTenant(TenantId),

    #[error("forbidden: {0}")]
    Forbidden(AuthzError),

    #[error("team {team_id} still has {} assigned employees", employees.len())]
    TeamInUse {
        team_id: TeamId,
        employees: Vec<EmployeeId>,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unscoped => ServiceError::Unscoped,
            other => ServiceError::Forbidden(other),
        }
    }
}

impl ServiceError {
    pub fn user_outcome(&self) -> UserOutcome {
        match self {
            ServiceError::NotSignedIn => UserOutcome::SignInAgain,
            ServiceError::Unscoped | ServiceError::UnknownTenant(_) => UserOutcome::AssignTenant,
            ServiceError::Forbidden(_)
            | ServiceError::TeamInUse { .. }
            | ServiceError::NotFound { .. }
            | ServiceError::Validation(_) => UserOutcome::Rejected,
            ServiceError::Repository(_) => UserOutcome::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planboard_infra::{Operation, StoreError};

    #[test]
    fn outcomes_follow_the_error_taxonomy() {
        let store = RepositoryError::Store {
            kind: EntityKind::Team,
            operation: Operation::Delete,
            source: StoreError::Unavailable("offline".to_string()),
        };

        assert_eq!(ServiceError::NotSignedIn.user_outcome(), UserOutcome::SignInAgain);
        assert_eq!(ServiceError::from(AuthzError::Unscoped).user_outcome(), UserOutcome::AssignTenant);
        assert_eq!(ServiceError::from(AuthzError::ReadOnly).user_outcome(), UserOutcome::Rejected);
        assert_eq!(
            ServiceError::from(DomainError::validation("color", "bad")).user_outcome(),
            UserOutcome::Rejected
        );
        assert_eq!(ServiceError::from(store).user_outcome(), UserOutcome::Aborted);
    }

    #[test]
    fn team_in_use_names_the_count() {
        let err = ServiceError::TeamInUse {
            team_id: TeamId::new("t1").unwrap(),
            employees: vec![EmployeeId::new("e1").unwrap()],
        };
        assert_eq!(err.to_string(), "team t1 still has 1 assigned employees");
    }
}
