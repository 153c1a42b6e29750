//! Validated field types shared by the planning entities.

use serde::{Deserialize, Serialize};

use planboard_core::{DomainError, DomainResult, ValueObject};

// ─────────────────────────────────────────────────────────────────────────────
// Required text
// ─────────────────────────────────────────────────────────────────────────────

/// Non-empty, trimmed free text (full names, view names, tenant names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredText(String);

impl RequiredText {
    pub fn parse(field: &'static str, value: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "is required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for RequiredText {}

// ─────────────────────────────────────────────────────────────────────────────
// Compact labels
// ─────────────────────────────────────────────────────────────────────────────

/// Non-empty label of at most `MAX` characters, shown in compact grid cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Label<const MAX: usize>(String);

/// Employee display name (≤10 characters).
pub type EmployeeDisplayName = Label<10>;

/// Team display name (≤15 characters).
pub type TeamDisplayName = Label<15>;

impl<const MAX: usize> Label<MAX> {
    pub fn parse(value: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("displayName", "is required"));
        }
        let len = trimmed.chars().count();
        if len > MAX {
            return Err(DomainError::validation(
                "displayName",
                format!("must be at most {MAX} characters (got {len})"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> ValueObject for Label<MAX> {}

// ─────────────────────────────────────────────────────────────────────────────
// Hex color
// ─────────────────────────────────────────────────────────────────────────────

/// `#RRGGBB` color, normalized to uppercase.
///
/// The short `#RGB` form is accepted and expanded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: impl AsRef<str>) -> DomainResult<Self> {
        let invalid =
            || DomainError::validation("color", "invalid color format (use hex color like #FF5733)");

        let digits = value.as_ref().trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            6 => digits.to_ascii_uppercase(),
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_uppercase(),
            _ => return Err(invalid()),
        };

        Ok(Self(format!("#{expanded}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for HexColor {}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl core::fmt::Display for HexColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Email
// ─────────────────────────────────────────────────────────────────────────────

/// Email address with a basic `local@domain.tld` shape check, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = value.as_ref().trim();
        if !looks_like_email(trimmed) {
            return Err(DomainError::validation("email", "invalid email format"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for EmailAddress {}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(RequiredText::parse("fullName", "  Ana Ruiz ").unwrap().as_str(), "Ana Ruiz");
        let err = RequiredText::parse("fullName", "   ").unwrap_err();
        assert_eq!(err.field(), Some("fullName"));
    }

    #[test]
    fn labels_enforce_their_limit() {
        assert!(EmployeeDisplayName::parse("Ana").is_ok());
        assert!(EmployeeDisplayName::parse("ABCDEFGHIJ").is_ok());
        assert!(EmployeeDisplayName::parse("ABCDEFGHIJK").is_err());
        assert!(TeamDisplayName::parse("SALES-MAD").is_ok());
        assert!(TeamDisplayName::parse("A-VERY-LONG-TEAM").is_err());
        // Characters, not bytes.
        assert!(EmployeeDisplayName::parse("ÁÉÍÓÚÁÉÍÓÚ").is_ok());
    }

    #[test]
    fn hex_color_normalizes_case_and_short_form() {
        assert_eq!(HexColor::parse("#16a34a").unwrap().as_str(), "#16A34A");
        assert_eq!(HexColor::parse("#fa0").unwrap().as_str(), "#FFAA00");
        for bad in ["16A34A", "#16A34", "#GGGGGG", "#", "#1234567", ""] {
            assert!(HexColor::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn hex_color_deserialization_normalizes() {
        let c: HexColor = serde_json::from_str("\"#ff5733\"").unwrap();
        assert_eq!(c.as_str(), "#FF5733");
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }

    #[test]
    fn email_shape() {
        assert_eq!(
            EmailAddress::parse(" Carlos.Garcia@Demo.com ").unwrap().as_str(),
            "carlos.garcia@demo.com"
        );
        for bad in ["no-at", "a@b", "@demo.com", "a@.com", "a@demo.", "a b@demo.com", "a@b@c.com"] {
            assert!(EmailAddress::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    proptest! {
        #[test]
        fn any_six_digit_hex_normalizes_to_uppercase(hex in "[0-9a-fA-F]{6}") {
            let color = HexColor::parse(format!("#{hex}")).unwrap();
            prop_assert_eq!(color.as_str().len(), 7);
            prop_assert_eq!(color.as_str(), format!("#{}", hex.to_ascii_uppercase()));
        }
    }
}
