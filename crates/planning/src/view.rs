//! Saved views: named grid filters owned by one employee and optionally shared.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planboard_core::{DomainError, DomainResult, EmployeeId, Entity, TeamId, ViewId};

use crate::fields::{HexColor, RequiredText};

/// Inclusive date range of a view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DomainError;

    fn try_from(raw: RawDateRange) -> DomainResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::validation(
                "filters.dateRange",
                "end must not be before start",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<BTreeSet<TeamId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_ids: Option<BTreeSet<EmployeeId>>,
}

/// View as stored under `tenants/{tenant}/views/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ViewId,
    pub owner_id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub filters: ViewFilters,
    #[serde(default)]
    pub shared_with: BTreeSet<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl View {
    /// A view is visible to its owner and to everyone it is shared with.
    pub fn is_visible_to(&self, employee_id: &EmployeeId) -> bool {
        &self.owner_id == employee_id || self.shared_with.contains(employee_id)
    }
}

impl Entity for View {
    type Id = ViewId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for creating a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewView {
    pub owner_id: EmployeeId,
    pub name: RequiredText,
    pub filters: ViewFilters,
    pub shared_with: BTreeSet<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Partial update of a view. Ownership cannot be transferred.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<RequiredText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ViewFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<BTreeSet<EmployeeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<HexColor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}
