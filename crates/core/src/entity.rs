//! Entity trait: identity + continuity across refreshes.

/// Entity marker + minimal interface.
///
/// Records fetched from the services are re-created on every response; the
/// identifier is what ties a fresh record to the one a caller already holds.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Find the entity with the given identifier.
pub fn find_by_id<'a, E: Entity>(entities: &'a [E], id: &E::Id) -> Option<&'a E> {
    entities.iter().find(|e| e.id() == id)
}
