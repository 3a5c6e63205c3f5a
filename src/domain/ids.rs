//! Type-safe entity identifiers.
//!
//! Each identifier is a newtype wrapper around [`uuid::Uuid`] (v4) so
//! that ids of different entities cannot be confused with each other at
//! compile time. All wrappers share the same shape via a declarative
//! macro.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
            utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a registered user.
    UserId
}

entity_id! {
    /// Unique identifier for a room.
    RoomId
}

entity_id! {
    /// Unique identifier for a shelf.
    ShelfId
}

entity_id! {
    /// Unique identifier for a shelf's movie entry.
    ///
    /// Distinct from the external catalog movie id, which is a plain
    /// integer owned by the catalog, not by this system.
    MovieEntryId
}

entity_id! {
    /// Unique identifier for a single rating row.
    RatingId
}
