//! Row models and read-aggregate shapes.
//!
//! Field names match column names so the [`sqlx::FromRow`] derives stay
//! free of renames. Aggregate shapes are assembled in code by the
//! stores; their collections are always present, never null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MovieEntryId, RatingId, RoomId, ShelfId, UserId};

/// A user's public profile.
///
/// The credential hash never leaves the persistence layer; see
/// [`UserWithCredential`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Unique display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// A user row including the stored credential hash.
///
/// Only the login path reads this shape.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithCredential {
    /// User identifier.
    pub id: UserId,
    /// Unique display name.
    pub name: String,
    /// Argon2id PHC hash string.
    pub password: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserWithCredential {
    /// Strips the credential, leaving the public profile.
    #[must_use]
    pub fn into_public(self) -> User {
        User {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// A room: a tenant-like grouping of users sharing shelves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A membership row joining a room and a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct RoomMembership {
    /// Membership row identifier.
    pub id: uuid::Uuid,
    /// Room side of the relation.
    pub room_id: RoomId,
    /// User side of the relation.
    pub user_id: UserId,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// A named collection of movie entries scoped to one room.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Shelf {
    /// Shelf identifier.
    pub id: ShelfId,
    /// Shelf name.
    pub name: String,
    /// Owning room.
    pub room_id: RoomId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A shelf's reference to an externally-cataloged movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct MovieEntry {
    /// Entry identifier.
    pub id: MovieEntryId,
    /// External catalog movie id (owned by the catalog).
    pub external_id: i64,
    /// Owning shelf.
    pub shelf_id: ShelfId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A single rating row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Rating {
    /// Rating row identifier.
    pub id: RatingId,
    /// Rated movie entry.
    pub movie_entry_id: MovieEntryId,
    /// Rating author.
    pub user_id: UserId,
    /// Numeric rating value.
    pub value: f64,
    /// Rating timestamp.
    pub created_at: DateTime<Utc>,
}

/// A rating joined with its author's public profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingWithAuthor {
    /// Rating author's public profile.
    pub user: User,
    /// Numeric rating value.
    pub value: f64,
    /// Rating timestamp.
    pub created_at: DateTime<Utc>,
}

/// A shelf together with its movie entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShelfWithMovies {
    /// The shelf itself.
    #[serde(flatten)]
    pub shelf: Shelf,
    /// The shelf's movie entries; empty when the shelf has none.
    pub movies: Vec<MovieEntry>,
}

/// A room together with its member list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomWithMembers {
    /// The room itself.
    pub room: Room,
    /// Member profiles; empty when the room has no members.
    pub members: Vec<User>,
}

/// The full nested read-aggregate for one room.
///
/// room → members, and per shelf its movie entries. Collections are
/// always present: a room with zero members or zero shelves yields
/// empty arrays, never null.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomAggregate {
    /// The room itself.
    pub room: Room,
    /// Member profiles.
    pub members: Vec<User>,
    /// Shelves with their movie entries.
    pub shelves: Vec<ShelfWithMovies>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn credential_never_reaches_public_profile() {
        let row = UserWithCredential {
            id: UserId::new(),
            name: "alice".to_string(),
            password: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let public = row.clone().into_public();
        assert_eq!(public.id, row.id);
        assert_eq!(public.name, "alice");

        let json = serde_json::to_string(&public).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn empty_aggregate_serializes_empty_arrays() {
        let aggregate = RoomAggregate {
            room: Room {
                id: RoomId::new(),
                name: "Book Club".to_string(),
                created_at: Utc::now(),
            },
            members: Vec::new(),
            shelves: Vec::new(),
        };
        let json = serde_json::to_value(&aggregate).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("members"), Some(&serde_json::json!([])));
        assert_eq!(json.get("shelves"), Some(&serde_json::json!([])));
    }

    #[test]
    fn shelf_with_movies_flattens_shelf_fields() {
        let shelf = Shelf {
            id: ShelfId::new(),
            name: "Oscars 2024".to_string(),
            room_id: RoomId::new(),
            created_at: Utc::now(),
        };
        let wrapped = ShelfWithMovies {
            shelf,
            movies: Vec::new(),
        };
        let json = serde_json::to_value(&wrapped).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(json.get("name").is_some());
        assert_eq!(json.get("movies"), Some(&serde_json::json!([])));
    }
}
