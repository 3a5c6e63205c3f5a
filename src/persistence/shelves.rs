//! Shelf store: shelves scoped to a room and the derived shelf access
//! check.

use sqlx::PgPool;

use super::models::{MovieEntry, Shelf};
use crate::domain::{RoomId, ShelfId, UserId};
use crate::error::ApiError;

/// PostgreSQL-backed store for shelf rows.
#[derive(Debug, Clone)]
pub struct ShelfStore {
    pool: PgPool,
}

impl ShelfStore {
    /// Creates a new store over the shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new shelf under `room_id`.
    ///
    /// The room id is not existence-checked here; a dangling id
    /// surfaces as a store failure through the foreign key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn create(&self, name: &str, room_id: RoomId) -> Result<Shelf, ApiError> {
        let shelf = sqlx::query_as::<_, Shelf>(
            "INSERT INTO shelves (id, name, room_id) VALUES ($1, $2, $3) \
             RETURNING id, name, room_id, created_at",
        )
        .bind(ShelfId::new())
        .bind(name)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(shelf)
    }

    /// Lists the shelves of a room.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_by_room(&self, room_id: RoomId) -> Result<Vec<Shelf>, ApiError> {
        let rows = sqlx::query_as::<_, Shelf>(
            "SELECT id, name, room_id, created_at FROM shelves WHERE room_id = $1 ORDER BY name",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetches a shelf by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get(&self, shelf_id: ShelfId) -> Result<Option<Shelf>, ApiError> {
        let row = sqlx::query_as::<_, Shelf>(
            "SELECT id, name, room_id, created_at FROM shelves WHERE id = $1",
        )
        .bind(shelf_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists the movie entries on a shelf; empty shelf yields an empty
    /// sequence, never null.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_movies(&self, shelf_id: ShelfId) -> Result<Vec<MovieEntry>, ApiError> {
        let rows = sqlx::query_as::<_, MovieEntry>(
            "SELECT id, external_id, shelf_id, created_at FROM shelf_movies WHERE shelf_id = $1",
        )
        .bind(shelf_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Derived authorization: `true` iff the shelf's owning room has
    /// `user_id` as a member.
    ///
    /// Shelf access is never granted independently; it is always
    /// inherited from room membership via shelf → room → membership.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn check_access(&self, shelf_id: ShelfId, user_id: UserId) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shelves s \
             JOIN room_members rm ON rm.room_id = s.room_id \
             WHERE s.id = $1 AND rm.user_id = $2)",
        )
        .bind(shelf_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::models::User;
    use crate::persistence::{RoomStore, UserStore};

    async fn seed_user(pool: &PgPool, name: &str) -> User {
        let Ok(user) = UserStore::new(pool.clone()).create(name, "$argon2id$fake").await else {
            panic!("seed user failed");
        };
        user
    }

    #[sqlx::test]
    async fn create_and_list_by_room(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let Ok(room) = RoomStore::new(pool.clone()).create_with_creator("Book Club", alice.id).await
        else {
            panic!("room create failed");
        };

        let store = ShelfStore::new(pool);
        let Ok(shelf) = store.create("Oscars 2024", room.id).await else {
            panic!("shelf create failed");
        };
        assert_eq!(shelf.room_id, room.id);

        let Ok(shelves) = store.list_by_room(room.id).await else {
            panic!("list failed");
        };
        assert_eq!(shelves.len(), 1);
    }

    #[sqlx::test]
    async fn dangling_room_id_is_store_failure(pool: PgPool) {
        let store = ShelfStore::new(pool);

        // No application-level existence check; the FK reports it.
        let result = store.create("Orphans", RoomId::new()).await;
        assert!(matches!(result, Err(ApiError::Store(_))));
    }

    #[sqlx::test]
    async fn empty_shelf_lists_no_movies(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let Ok(room) = RoomStore::new(pool.clone()).create_with_creator("Book Club", alice.id).await
        else {
            panic!("room create failed");
        };

        let store = ShelfStore::new(pool);
        let Ok(shelf) = store.create("Oscars 2024", room.id).await else {
            panic!("shelf create failed");
        };

        let Ok(movies) = store.list_movies(shelf.id).await else {
            panic!("list failed");
        };
        assert!(movies.is_empty());
    }

    #[sqlx::test]
    async fn shelf_access_mirrors_room_membership(pool: PgPool) {
        let rooms = RoomStore::new(pool.clone());
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;

        let Ok(room) = rooms.create_with_creator("Book Club", alice.id).await else {
            panic!("room create failed");
        };

        let store = ShelfStore::new(pool);
        let Ok(shelf) = store.create("Oscars 2024", room.id).await else {
            panic!("shelf create failed");
        };

        // Access tracks membership exactly, before and after joining.
        assert_eq!(store.check_access(shelf.id, alice.id).await.ok(), Some(true));
        assert_eq!(store.check_access(shelf.id, bob.id).await.ok(), Some(false));

        let _ = rooms.add_member(room.id, bob.id).await;
        assert_eq!(store.check_access(shelf.id, bob.id).await.ok(), Some(true));
        assert_eq!(
            rooms.check_membership(room.id, bob.id).await.ok(),
            store.check_access(shelf.id, bob.id).await.ok()
        );
    }

    #[sqlx::test]
    async fn access_to_unknown_shelf_is_false(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let store = ShelfStore::new(pool);
        assert_eq!(store.check_access(ShelfId::new(), alice.id).await.ok(), Some(false));
    }
}
