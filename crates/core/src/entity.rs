//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Tenant-partitioned entities are addressed by their identifier as a document
/// path segment, hence the `AsRef<str>` bound.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + AsRef<str> + Send + Sync;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
