//! Change events announced after state mutations.
//!
//! Every successful mutation publishes a [`ClubEvent`] through the
//! [`super::Notifier`]. Events are a fire-and-forget side channel for
//! downstream subscribers (e.g. a UI live-update layer); nothing in this
//! service consumes them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{MovieEntryId, RatingId, RoomId, ShelfId, UserId};

/// Domain event emitted after a committed write.
///
/// Subjects are hierarchical strings built from entity ids
/// (`<entity-kind>.<id>.<event>`); see [`ClubEvent::subject`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ClubEvent {
    /// Emitted when a room is created, keyed by its creator.
    RoomCreated {
        /// Room identifier.
        room_id: RoomId,
        /// Room name.
        name: String,
        /// User who created the room.
        creator_id: UserId,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted towards a room when a user joins it.
    MemberJoinedRoom {
        /// Room the user joined.
        room_id: RoomId,
        /// Joining user.
        user_id: UserId,
        /// Joining user's display name.
        user_name: String,
        /// Join timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted towards a user when a room is added to their rooms.
    RoomAddedToUser {
        /// Room that was added.
        room_id: RoomId,
        /// Room name.
        room_name: String,
        /// User who gained the room.
        user_id: UserId,
        /// Join timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a shelf is created inside a room.
    ShelfCreated {
        /// Shelf identifier.
        shelf_id: ShelfId,
        /// Owning room.
        room_id: RoomId,
        /// Shelf name.
        name: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a catalog movie is added to a shelf.
    MovieAdded {
        /// Movie entry identifier.
        entry_id: MovieEntryId,
        /// Shelf the movie was added to.
        shelf_id: ShelfId,
        /// External catalog movie id.
        external_id: i64,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a user rates a movie entry.
    MovieRated {
        /// Rating row identifier.
        rating_id: RatingId,
        /// Rated movie entry.
        entry_id: MovieEntryId,
        /// Rating author.
        user_id: UserId,
        /// Numeric rating value.
        value: f64,
        /// Rating timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ClubEvent {
    /// Returns the bus subject this event is published on.
    ///
    /// Subjects are stable contract strings; downstream subscribers
    /// filter on them.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::RoomCreated { creator_id, .. } => {
                format!("rooms.users.{creator_id}.created")
            }
            Self::MemberJoinedRoom { room_id, .. } => {
                format!("rooms.{room_id}.users.new")
            }
            Self::RoomAddedToUser { user_id, .. } => {
                format!("rooms.users.{user_id}.added")
            }
            Self::ShelfCreated { room_id, .. } => {
                format!("rooms.{room_id}.shelves.create")
            }
            Self::MovieAdded { shelf_id, .. } => {
                format!("shelves.{shelf_id}.movies.new")
            }
            Self::MovieRated { entry_id, .. } => {
                format!("movies.{entry_id}.rated")
            }
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "room_created",
            Self::MemberJoinedRoom { .. } => "member_joined_room",
            Self::RoomAddedToUser { .. } => "room_added_to_user",
            Self::ShelfCreated { .. } => "shelf_created",
            Self::MovieAdded { .. } => "movie_added",
            Self::MovieRated { .. } => "movie_rated",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn room_created_subject_is_keyed_by_creator() {
        let creator = UserId::new();
        let event = ClubEvent::RoomCreated {
            room_id: RoomId::new(),
            name: "Book Club".to_string(),
            creator_id: creator,
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("rooms.users.{creator}.created"));
    }

    #[test]
    fn member_joined_subject_is_keyed_by_room() {
        let room = RoomId::new();
        let event = ClubEvent::MemberJoinedRoom {
            room_id: room,
            user_id: UserId::new(),
            user_name: "alice".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("rooms.{room}.users.new"));
    }

    #[test]
    fn room_added_subject_is_keyed_by_user() {
        let user = UserId::new();
        let event = ClubEvent::RoomAddedToUser {
            room_id: RoomId::new(),
            room_name: "Book Club".to_string(),
            user_id: user,
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("rooms.users.{user}.added"));
    }

    #[test]
    fn shelf_created_subject_is_keyed_by_room() {
        let room = RoomId::new();
        let event = ClubEvent::ShelfCreated {
            shelf_id: ShelfId::new(),
            room_id: room,
            name: "Oscars 2024".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("rooms.{room}.shelves.create"));
    }

    #[test]
    fn movie_added_subject_is_keyed_by_shelf() {
        let shelf = ShelfId::new();
        let event = ClubEvent::MovieAdded {
            entry_id: MovieEntryId::new(),
            shelf_id: shelf,
            external_id: 550,
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("shelves.{shelf}.movies.new"));
    }

    #[test]
    fn movie_rated_subject_is_keyed_by_entry() {
        let entry = MovieEntryId::new();
        let event = ClubEvent::MovieRated {
            rating_id: RatingId::new(),
            entry_id: entry,
            user_id: UserId::new(),
            value: 4.5,
            timestamp: Utc::now(),
        };
        assert_eq!(event.subject(), format!("movies.{entry}.rated"));
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = ClubEvent::MovieRated {
            rating_id: RatingId::new(),
            entry_id: MovieEntryId::new(),
            user_id: UserId::new(),
            value: 4.5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        let Ok(json) = json else {
            panic!("serialization failed");
        };
        assert!(json.contains("movie_rated"));
        assert!(json.contains("4.5"));
    }
}
