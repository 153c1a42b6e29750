//! Employees: the rows of the planning grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planboard_core::{EmployeeId, Entity, SubjectId, TeamId};

use crate::fields::{EmailAddress, EmployeeDisplayName, RequiredText};

/// Employee as stored under `tenants/{tenant}/employees/{id}`.
///
/// # Invariants
/// - `team_id` references a Team in the same tenant. The store does not enforce
///   this; callers check it before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub display_name: String,
    pub team_id: TeamId,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Identity-provider subject this employee signs in as, if linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<SubjectId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn belongs_to(&self, team_id: &TeamId) -> bool {
        &self.team_id == team_id
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: RequiredText,
    pub display_name: EmployeeDisplayName,
    pub team_id: TeamId,
    pub can_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<SubjectId>,
}

/// Partial update of an employee. Absent fields are left untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<RequiredText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<EmployeeDisplayName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<EmailAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Option<SubjectId>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
