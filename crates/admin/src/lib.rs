//! `planboard-admin` — application services over the planning store.
//!
//! Every call runs inside a [`TenantContext`] derived from a resolved identity,
//! passes the permission gate, and only then reaches a repository.

pub mod authz;
pub mod context;
mod demo;
pub mod errors;
pub mod provision;
pub mod services;

pub use context::TenantContext;
pub use errors::{ServiceError, UserOutcome};
pub use provision::{ProvisionError, ProvisionReport, Provisioner, UserSummary};
pub use services::{ClearReport, PlanningService, SeedReport, TenantStats};
