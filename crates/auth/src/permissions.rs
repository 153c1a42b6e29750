use serde::{Deserialize, Serialize};

/// What a caller wants to do inside a tenant.
///
/// Reads need tenant access only; every create, update and delete on a
/// tenant-scoped entity is an `Edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Edit,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Action::Edit)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
