//! Room store: rooms, memberships, the membership authorization check,
//! and the nested room read-aggregate.

use std::collections::HashMap;

use sqlx::PgPool;

use super::models::{
    MovieEntry, Room, RoomAggregate, RoomMembership, RoomWithMembers, Shelf, ShelfWithMovies, User,
};
use crate::domain::{RoomId, ShelfId, UserId};
use crate::error::ApiError;

/// PostgreSQL-backed store for rooms and memberships.
#[derive(Debug, Clone)]
pub struct RoomStore {
    pool: PgPool,
}

impl RoomStore {
    /// Creates a new store over the shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a room and its creator's membership atomically.
    ///
    /// Both inserts run inside one transaction: a failure in either
    /// leaves no partial state behind.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn create_with_creator(
        &self,
        name: &str,
        creator: UserId,
    ) -> Result<Room, ApiError> {
        let room_id = RoomId::new();

        let mut tx = self.pool.begin().await?;

        let room = sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
        )
        .bind(room_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO room_members (id, room_id, user_id) VALUES ($1, $2, $3)")
            .bind(uuid::Uuid::new_v4())
            .bind(room_id)
            .bind(creator)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(room)
    }

    /// Inserts a membership row joining `user_id` to `room_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn add_member(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<RoomMembership, ApiError> {
        let membership = sqlx::query_as::<_, RoomMembership>(
            "INSERT INTO room_members (id, room_id, user_id) VALUES ($1, $2, $3) \
             RETURNING id, room_id, user_id, joined_at",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    /// The authorization primitive: `true` iff a membership row joins
    /// the two ids.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn check_membership(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM room_members WHERE room_id = $1 AND user_id = $2)",
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Fetches a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get(&self, room_id: RoomId) -> Result<Option<Room>, ApiError> {
        let row =
            sqlx::query_as::<_, Room>("SELECT id, name, created_at FROM rooms WHERE id = $1")
                .bind(room_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    /// Lists all rooms.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list(&self) -> Result<Vec<Room>, ApiError> {
        let rows =
            sqlx::query_as::<_, Room>("SELECT id, name, created_at FROM rooms ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    /// Lists the rooms `user_id` is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Room>, ApiError> {
        let rows = sqlx::query_as::<_, Room>(
            "SELECT r.id, r.name, r.created_at FROM rooms r \
             JOIN room_members rm ON rm.room_id = r.id \
             WHERE rm.user_id = $1 ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists every room joined with its member profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_with_members(&self) -> Result<Vec<RoomWithMembers>, ApiError> {
        let rooms = self.list().await?;

        let rows = sqlx::query_as::<_, (RoomId, UserId, String, chrono::DateTime<chrono::Utc>)>(
            "SELECT rm.room_id, u.id, u.name, u.created_at FROM room_members rm \
             JOIN users u ON u.id = rm.user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut members_by_room: HashMap<RoomId, Vec<User>> = HashMap::new();
        for (room_id, id, name, created_at) in rows {
            members_by_room
                .entry(room_id)
                .or_default()
                .push(User { id, name, created_at });
        }

        Ok(rooms
            .into_iter()
            .map(|room| {
                let members = members_by_room.remove(&room.id).unwrap_or_default();
                RoomWithMembers { room, members }
            })
            .collect())
    }

    /// Fetches one room joined with its member profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get_with_members(
        &self,
        room_id: RoomId,
    ) -> Result<Option<RoomWithMembers>, ApiError> {
        let Some(room) = self.get(room_id).await? else {
            return Ok(None);
        };

        let members = self.members_of(room_id).await?;

        Ok(Some(RoomWithMembers { room, members }))
    }

    /// Assembles the full nested aggregate for one room:
    /// room → members → shelves → movie entries.
    ///
    /// Tolerates a room with zero members or zero shelves; collections
    /// come back empty, never null.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get_aggregate(&self, room_id: RoomId) -> Result<Option<RoomAggregate>, ApiError> {
        let Some(room) = self.get(room_id).await? else {
            return Ok(None);
        };

        let members = self.members_of(room_id).await?;

        let shelves = sqlx::query_as::<_, Shelf>(
            "SELECT id, name, room_id, created_at FROM shelves WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        let movie_rows = sqlx::query_as::<_, MovieEntry>(
            "SELECT m.id, m.external_id, m.shelf_id, m.created_at FROM shelf_movies m \
             JOIN shelves s ON s.id = m.shelf_id WHERE s.room_id = $1",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        let mut movies_by_shelf: HashMap<ShelfId, Vec<MovieEntry>> = HashMap::new();
        for movie in movie_rows {
            movies_by_shelf.entry(movie.shelf_id).or_default().push(movie);
        }

        let shelves = shelves
            .into_iter()
            .map(|shelf| {
                let movies = movies_by_shelf.remove(&shelf.id).unwrap_or_default();
                ShelfWithMovies { shelf, movies }
            })
            .collect();

        Ok(Some(RoomAggregate {
            room,
            members,
            shelves,
        }))
    }

    /// Finds users matching `term` that could still be added to a room.
    ///
    /// Case-insensitive substring match on the display name;
    /// `exclude_self` removes the caller, `exclude_existing` removes
    /// users that are already members of the room.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn available_users(
        &self,
        room_id: RoomId,
        caller: UserId,
        term: &str,
        exclude_self: bool,
        exclude_existing: bool,
    ) -> Result<Vec<User>, ApiError> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT u.id, u.name, u.created_at FROM users u WHERE lower(u.name) LIKE ",
        );
        builder.push_bind(format!("%{}%", term.to_lowercase()));

        if exclude_self {
            builder.push(" AND u.id <> ").push_bind(caller);
        }

        if exclude_existing {
            builder
                .push(" AND u.id NOT IN (SELECT user_id FROM room_members WHERE room_id = ")
                .push_bind(room_id)
                .push(")");
        }

        let rows = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn members_of(&self, room_id: RoomId) -> Result<Vec<User>, ApiError> {
        let members = sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.created_at FROM room_members rm \
             JOIN users u ON u.id = rm.user_id WHERE rm.room_id = $1",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
