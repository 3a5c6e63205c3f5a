//! Room service: creation, membership, aggregates, and the membership
//! events announced to the bus.

use chrono::Utc;

use crate::domain::{ClubEvent, Notifier, RoomId, UserId};
use crate::error::ApiError;
use crate::persistence::models::{Room, RoomAggregate, RoomWithMembers, User};
use crate::persistence::{RoomStore, UserStore};

/// Room creation, membership management, and room reads.
#[derive(Debug, Clone)]
pub struct RoomService {
    rooms: RoomStore,
    users: UserStore,
    notifier: Notifier,
}

impl RoomService {
    /// Creates a new room service.
    #[must_use]
    pub fn new(rooms: RoomStore, users: UserStore, notifier: Notifier) -> Self {
        Self {
            rooms,
            users,
            notifier,
        }
    }

    /// Creates a room with `creator` as its first member.
    ///
    /// Room and membership are committed atomically; the member-added
    /// event pair and the creation event are published afterwards,
    /// fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn create_room(&self, name: &str, creator: UserId) -> Result<Room, ApiError> {
        let room = self.rooms.create_with_creator(name, creator).await?;

        self.publish_member_events(&room, creator).await;
        self.notifier
            .publish(&ClubEvent::RoomCreated {
                room_id: room.id,
                name: room.name.clone(),
                creator_id: creator,
                timestamp: Utc::now(),
            })
            .await;

        tracing::info!(room_id = %room.id, creator = %creator, "room created");
        Ok(room)
    }

    /// Adds `user_id` to a room and announces the change on both the
    /// room-keyed and user-keyed subjects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure. Publish
    /// failures are logged and swallowed.
    pub async fn add_member(&self, room_id: RoomId, user_id: UserId) -> Result<(), ApiError> {
        self.rooms.add_member(room_id, user_id).await?;

        let Some(room) = self.rooms.get(room_id).await? else {
            // The membership row exists; the room vanishing here would
            // take a concurrent delete, which has no path in scope.
            return Ok(());
        };
        self.publish_member_events(&room, user_id).await;

        tracing::info!(room_id = %room_id, user_id = %user_id, "member added");
        Ok(())
    }

    /// Reports whether the notification bus connection is up.
    #[must_use]
    pub fn notifier_healthy(&self) -> bool {
        self.notifier.healthy()
    }

    /// The authorization primitive: `true` iff `user_id` is a member
    /// of `room_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn check_membership(&self, room_id: RoomId, user_id: UserId) -> Result<bool, ApiError> {
        self.rooms.check_membership(room_id, user_id).await
    }

    /// Fetches a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such room exists.
    pub async fn get_room(&self, room_id: RoomId) -> Result<Room, ApiError> {
        self.rooms
            .get(room_id)
            .await?
            .ok_or_else(|| ApiError::not_found("room", room_id))
    }

    /// Lists all rooms.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        self.rooms.list().await
    }

    /// Lists the rooms the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_rooms_for_user(&self, user_id: UserId) -> Result<Vec<Room>, ApiError> {
        self.rooms.list_for_user(user_id).await
    }

    /// Lists every room with its member profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_rooms_with_members(&self) -> Result<Vec<RoomWithMembers>, ApiError> {
        self.rooms.list_with_members().await
    }

    /// Fetches one room with its member profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such room exists.
    pub async fn get_room_with_members(&self, room_id: RoomId) -> Result<RoomWithMembers, ApiError> {
        self.rooms
            .get_with_members(room_id)
            .await?
            .ok_or_else(|| ApiError::not_found("room", room_id))
    }

    /// Assembles the nested room aggregate (room → members → shelves →
    /// movies).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such room exists.
    pub async fn get_room_aggregate(&self, room_id: RoomId) -> Result<RoomAggregate, ApiError> {
        self.rooms
            .get_aggregate(room_id)
            .await?
            .ok_or_else(|| ApiError::not_found("room", room_id))
    }

    /// Finds users that could still be invited to a room.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_available_users(
        &self,
        room_id: RoomId,
        caller: UserId,
        term: &str,
        exclude_self: bool,
        exclude_existing: bool,
    ) -> Result<Vec<User>, ApiError> {
        self.rooms
            .available_users(room_id, caller, term, exclude_self, exclude_existing)
            .await
    }

    /// Publishes the member-added event pair: one subject keyed by the
    /// room, one keyed by the user. Lookup failures here only cost the
    /// events, never the mutation.
    async fn publish_member_events(&self, room: &Room, user_id: UserId) {
        match self.users.get(user_id).await {
            Ok(Some(user)) => {
                self.notifier
                    .publish(&ClubEvent::MemberJoinedRoom {
                        room_id: room.id,
                        user_id: user.id,
                        user_name: user.name,
                        timestamp: Utc::now(),
                    })
                    .await;
            }
            Ok(None) => {
                tracing::warn!(user_id = %user_id, "member event skipped: user not found");
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "member event skipped");
            }
        }

        self.notifier
            .publish(&ClubEvent::RoomAddedToUser {
                room_id: room.id,
                room_name: room.name.clone(),
                user_id,
                timestamp: Utc::now(),
            })
            .await;
    }
}
