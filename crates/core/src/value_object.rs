//! Value object trait: equality by value, not identity.
//!
//! Field types such as a team color or a compact display name are value
//! objects: they carry no identity and are validated once, at construction.
//! Holding one is proof the raw input already passed validation, which is how
//! malformed input is kept away from the store.

/// Marker trait for value objects.
///
/// Implementors are immutable, compared by value, and only constructible
/// through a validating constructor (or a `TryFrom` used by serde).
///
/// ```ignore
/// let color = HexColor::parse("#16a34a")?;
/// assert_eq!(color.as_str(), "#16A34A");
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
