//! User store: registration rows, credential lookup, listings.

use sqlx::PgPool;

use super::models::{User, UserWithCredential};
use crate::domain::{RoomId, UserId};
use crate::error::{ApiError, map_user_insert_error};

/// PostgreSQL-backed store for user rows.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    /// Creates a new store over the shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user with a pre-hashed credential.
    ///
    /// Name uniqueness is enforced by the store's unique index, not
    /// pre-checked here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NameTaken`] on a unique violation and
    /// [`ApiError::Store`] on any other database failure.
    pub async fn create(&self, name: &str, password_hash: &str) -> Result<User, ApiError> {
        let id = UserId::new();

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, password) VALUES ($1, $2, $3) \
             RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_user_insert_error(e, name))
    }

    /// Looks up a user with credential by display name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<UserWithCredential>, ApiError> {
        let row = sqlx::query_as::<_, UserWithCredential>(
            "SELECT id, name, password, created_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetches a user's public profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get(&self, user_id: UserId) -> Result<Option<User>, ApiError> {
        let row =
            sqlx::query_as::<_, User>("SELECT id, name, created_at FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let rows =
            sqlx::query_as::<_, User>("SELECT id, name, created_at FROM users ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    /// Returns `true` if a user with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn exists(&self, user_id: UserId) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Lists the members of a room, optionally excluding the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_in_room(
        &self,
        room_id: RoomId,
        caller: UserId,
        exclude_self: bool,
    ) -> Result<Vec<User>, ApiError> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT u.id, u.name, u.created_at FROM users u \
             JOIN room_members rm ON rm.user_id = u.id WHERE rm.room_id = ",
        );
        builder.push_bind(room_id);

        if exclude_self {
            builder.push(" AND u.id <> ").push_bind(caller);
        }

        let rows = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn create_and_fetch_round_trip(pool: PgPool) {
        let store = UserStore::new(pool);

        let Ok(user) = store.create("alice", "$argon2id$fake").await else {
            panic!("create failed");
        };
        assert_eq!(user.name, "alice");

        let fetched = store.get(user.id).await.ok().flatten();
        let Some(fetched) = fetched else {
            panic!("expected user");
        };
        assert_eq!(fetched.id, user.id);
    }

    #[sqlx::test]
    async fn duplicate_name_is_name_taken(pool: PgPool) {
        let store = UserStore::new(pool);

        let first = store.create("alice", "$argon2id$fake").await;
        assert!(first.is_ok());

        let second = store.create("alice", "$argon2id$other").await;
        assert!(matches!(second, Err(ApiError::NameTaken(_))));
    }

    #[sqlx::test]
    async fn get_by_name_returns_credential(pool: PgPool) {
        let store = UserStore::new(pool);
        let _ = store.create("alice", "$argon2id$fake").await;

        let row = store.get_by_name("alice").await.ok().flatten();
        let Some(row) = row else {
            panic!("expected user");
        };
        assert_eq!(row.password, "$argon2id$fake");
    }

    #[sqlx::test]
    async fn unknown_name_is_none(pool: PgPool) {
        let store = UserStore::new(pool);
        let row = store.get_by_name("nobody").await.ok().flatten();
        assert!(row.is_none());
    }

    #[sqlx::test]
    async fn exists_tracks_registration(pool: PgPool) {
        let store = UserStore::new(pool);
        assert_eq!(store.exists(UserId::new()).await.ok(), Some(false));

        let Ok(user) = store.create("alice", "$argon2id$fake").await else {
            panic!("create failed");
        };
        assert_eq!(store.exists(user.id).await.ok(), Some(true));
    }

    #[sqlx::test]
    async fn list_orders_by_name(pool: PgPool) {
        let store = UserStore::new(pool);
        let _ = store.create("bob", "$argon2id$fake").await;
        let _ = store.create("alice", "$argon2id$fake").await;

        let Ok(users) = store.list().await else {
            panic!("list failed");
        };
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }
}
