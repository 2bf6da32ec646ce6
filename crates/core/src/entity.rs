//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stock movements are entities without being aggregate roots: they have an
/// identity but are never mutated after creation.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
