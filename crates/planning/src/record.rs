//! Planning records: one logical cell per (employee, day) in the grid.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use planboard_core::{EmployeeId, Entity, RecordId, ValueObject};

use crate::fields::HexColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Presentation hints for a grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
}

impl ValueObject for RecordStyle {}

/// Record as stored under `tenants/{tenant}/records/{id}`.
///
/// Uniqueness of (employee, day) is not enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub date: DateTime<Utc>,
    /// Free text, e.g. "Ramcon" or "VACACIONES".
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RecordStyle>,
    pub updated_at: DateTime<Utc>,
    /// Employee who made the last change.
    pub updated_by: EmployeeId,
    pub created_at: DateTime<Utc>,
}

impl Entity for Record {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for creating a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub employee_id: EmployeeId,
    pub date: DateTime<Utc>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<RecordStyle>,
    pub updated_by: EmployeeId,
}

/// Partial update of a record.
///
/// The author is mandatory on every update; the employee and the day of a
/// record are fixed once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub updated_by: EmployeeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Option<RecordStyle>>,
}

impl RecordPatch {
    pub fn by(updated_by: EmployeeId) -> Self {
        Self {
            updated_by,
            value: None,
            style: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn style(mut self, style: RecordStyle) -> Self {
        self.style = Some(Some(style));
        self
    }

    pub fn clear_style(mut self) -> Self {
        self.style = Some(None);
        self
    }
}

/// Inclusive bounds of the UTC day containing `instant`:
/// `00:00:00.000000000` to `23:59:59.999999999`.
pub fn day_bounds(instant: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = instant.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1) - Duration::nanoseconds(1);
    (start, end)
}
