//! Common behaviour shared by all persisted entities.

use chrono::{DateTime, Utc};

/// An entity with a storage-assigned identity and a creation timestamp.
///
/// Both are immutable once set. A transient entity (not yet persisted)
/// returns `None` from [`Entity::id`].
pub trait Entity {
    /// The identity type assigned by storage.
    type Id: Copy + std::fmt::Display;

    /// Returns the entity type name, used in logs and error messages.
    fn entity_type() -> &'static str;

    /// Returns the storage-assigned id, if persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Returns the moment the entity was constructed.
    fn created_at(&self) -> DateTime<Utc>;

    /// Returns true once storage has assigned an id.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
