//! Teams: groups of employees with a color used across the grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planboard_core::{EmployeeId, Entity, TeamId};

use crate::fields::{HexColor, RequiredText, TeamDisplayName};

/// Team as stored under `tenants/{tenant}/teams/{id}`.
///
/// # Invariants
/// - A team referenced by at least one employee must not be deleted.
/// - `manager_id`, when set, references an Employee in the same tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub full_name: String,
    pub display_name: String,
    pub color: HexColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EmployeeId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for creating a team.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub full_name: RequiredText,
    pub display_name: TeamDisplayName,
    pub color: HexColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EmployeeId>,
}

/// Partial update of a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<RequiredText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<TeamDisplayName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Option<EmployeeId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_color_is_normalized_on_read() {
        let team: Team = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "fullName": "Sales Team",
            "displayName": "SALES",
            "color": "#16a34a",
            "createdAt": "2025-10-13T08:00:00Z",
        }))
        .unwrap();

        assert_eq!(team.color.as_str(), "#16A34A");
        assert_eq!(team.manager_id, None);
    }

    #[test]
    fn manager_can_be_assigned_or_cleared() {
        let assign = TeamPatch {
            manager_id: Some(Some(EmployeeId::new("e1").unwrap())),
            ..Default::default()
        };
        let clear = TeamPatch {
            manager_id: Some(None),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&assign).unwrap(),
            serde_json::json!({ "managerId": "e1" })
        );
        assert_eq!(
            serde_json::to_value(&clear).unwrap(),
            serde_json::json!({ "managerId": null })
        );
    }
}
