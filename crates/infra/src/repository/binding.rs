//! Per-entity storage bindings.

use serde::de::DeserializeOwned;
use serde::Serialize;

use planboard_core::{DomainResult, EmployeeId, Entity, RecordId, TeamId, ViewId};
use planboard_planning::{
    Employee, EmployeePatch, NewEmployee, NewRecord, NewTeam, NewView, Record, RecordPatch, Team,
    TeamPatch, View, ViewPatch,
};

use crate::path::EntityKind;

/// Stored field names used by queries and server-side stamping.
pub mod fields {
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const TEAM_ID: &str = "teamId";
    pub const EMPLOYEE_ID: &str = "employeeId";
    pub const DATE: &str = "date";
    pub const OWNER_ID: &str = "ownerId";
    pub const SHARED_WITH: &str = "sharedWith";
}

/// Binds an entity type to its collection and codec rules.
pub trait TenantDocument: Entity + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Dotted paths holding timestamps in create inputs and patches.
    const TIMESTAMP_FIELDS: &'static [&'static str];

    /// Field `list_all` orders by, ascending.
    const DEFAULT_ORDER: Option<&'static str>;

    /// Whether `create` also stamps `updatedAt`.
    const STAMP_UPDATED_ON_CREATE: bool = false;

    type New: Serialize + Send + Sync;
    type Patch: Serialize + Send + Sync;

    /// Parse a store-generated document id.
    fn parse_id(raw: String) -> DomainResult<Self::Id>;
}

impl TenantDocument for Employee {
    const KIND: EntityKind = EntityKind::Employee;
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[];
    const DEFAULT_ORDER: Option<&'static str> = Some(fields::DISPLAY_NAME);

    type New = NewEmployee;
    type Patch = EmployeePatch;

    fn parse_id(raw: String) -> DomainResult<EmployeeId> {
        EmployeeId::new(raw)
    }
}

impl TenantDocument for Team {
    const KIND: EntityKind = EntityKind::Team;
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[];
    const DEFAULT_ORDER: Option<&'static str> = Some(fields::DISPLAY_NAME);

    type New = NewTeam;
    type Patch = TeamPatch;

    fn parse_id(raw: String) -> DomainResult<TeamId> {
        TeamId::new(raw)
    }
}

impl TenantDocument for Record {
    const KIND: EntityKind = EntityKind::Record;
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[fields::DATE];
    const DEFAULT_ORDER: Option<&'static str> = Some(fields::DATE);
    const STAMP_UPDATED_ON_CREATE: bool = true;

    type New = NewRecord;
    type Patch = RecordPatch;

    fn parse_id(raw: String) -> DomainResult<RecordId> {
        RecordId::new(raw)
    }
}

impl TenantDocument for View {
    const KIND: EntityKind = EntityKind::View;
    const TIMESTAMP_FIELDS: &'static [&'static str] =
        &["filters.dateRange.start", "filters.dateRange.end"];
    const DEFAULT_ORDER: Option<&'static str> = None;

    type New = NewView;
    type Patch = ViewPatch;

    fn parse_id(raw: String) -> DomainResult<ViewId> {
        ViewId::new(raw)
    }
}
