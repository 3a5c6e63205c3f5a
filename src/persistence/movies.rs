//! Movie entry and rating store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{MovieEntry, Rating, RatingWithAuthor, User};
use crate::domain::{MovieEntryId, RatingId, ShelfId, UserId};
use crate::error::ApiError;

/// PostgreSQL-backed store for shelf-movie associations and ratings.
#[derive(Debug, Clone)]
pub struct MovieStore {
    pool: PgPool,
}

impl MovieStore {
    /// Creates a new store over the shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a shelf-movie association.
    ///
    /// Duplicate `(shelf, external_id)` pairs are allowed; no
    /// uniqueness is enforced.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn insert_entry(
        &self,
        external_id: i64,
        shelf_id: ShelfId,
    ) -> Result<MovieEntry, ApiError> {
        let entry = sqlx::query_as::<_, MovieEntry>(
            "INSERT INTO shelf_movies (id, external_id, shelf_id) VALUES ($1, $2, $3) \
             RETURNING id, external_id, shelf_id, created_at",
        )
        .bind(MovieEntryId::new())
        .bind(external_id)
        .bind(shelf_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Fetches a movie entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn get_entry(&self, entry_id: MovieEntryId) -> Result<Option<MovieEntry>, ApiError> {
        let row = sqlx::query_as::<_, MovieEntry>(
            "SELECT id, external_id, shelf_id, created_at FROM shelf_movies WHERE id = $1",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists an entry's ratings joined with their authors' public
    /// profiles. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn ratings_with_authors(
        &self,
        entry_id: MovieEntryId,
    ) -> Result<Vec<RatingWithAuthor>, ApiError> {
        let rows = sqlx::query_as::<_, (UserId, String, DateTime<Utc>, f64, DateTime<Utc>)>(
            "SELECT u.id, u.name, u.created_at, r.value, r.created_at FROM ratings r \
             JOIN users u ON u.id = r.user_id WHERE r.movie_entry_id = $1",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, user_created_at, value, created_at)| RatingWithAuthor {
                user: User {
                    id,
                    name,
                    created_at: user_created_at,
                },
                value,
                created_at,
            })
            .collect())
    }

    /// Computes the arithmetic mean of an entry's ratings.
    ///
    /// Returns `None` for an entry with zero ratings so the caller can
    /// distinguish "unrated" from "rated zero".
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn avg_rating(&self, entry_id: MovieEntryId) -> Result<Option<f64>, ApiError> {
        let avg = sqlx::query_scalar::<_, f64>(
            "SELECT avg(value) FROM ratings WHERE movie_entry_id = $1 GROUP BY movie_entry_id",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(avg)
    }

    /// Inserts a new rating row.
    ///
    /// This is a plain insert, not an upsert: repeated calls by the
    /// same user create multiple rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn insert_rating(
        &self,
        entry_id: MovieEntryId,
        user_id: UserId,
        value: f64,
    ) -> Result<Rating, ApiError> {
        let rating = sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (id, movie_entry_id, user_id, value) VALUES ($1, $2, $3, $4) \
             RETURNING id, movie_entry_id, user_id, value, created_at",
        )
        .bind(RatingId::new())
        .bind(entry_id)
        .bind(user_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }
}
