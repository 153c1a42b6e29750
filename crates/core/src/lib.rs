//! `planboard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, and the clock abstraction used to stamp
//! server-side timestamps.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{check_segment, EmployeeId, RecordId, SubjectId, TeamId, TenantId, ViewId};
pub use value_object::ValueObject;
