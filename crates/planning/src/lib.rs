//! `planboard-planning` — the planning data model.
//!
//! Entities as read back from the store, the inputs used to create them, and the
//! patches used to update them. Input and patch fields are validated value
//! objects, so anything that reaches a repository has already passed validation.

pub mod employee;
pub mod fields;
pub mod record;
pub mod team;
pub mod tenant;
pub mod view;

pub use employee::{Employee, EmployeePatch, NewEmployee};
pub use fields::{
    EmailAddress, EmployeeDisplayName, HexColor, Label, RequiredText, TeamDisplayName,
};
pub use record::{day_bounds, FontStyle, FontWeight, NewRecord, Record, RecordPatch, RecordStyle};
pub use team::{NewTeam, Team, TeamPatch};
pub use tenant::{NewTenant, Tenant};
pub use view::{DateRange, NewView, View, ViewFilters, ViewPatch};
