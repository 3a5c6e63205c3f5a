//! Movie service: shelf-movie entries, catalog lookups, the movie
//! read-aggregate, and ratings.

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{CatalogClient, CatalogMovie};
use crate::domain::{ClubEvent, MovieEntryId, Notifier, ShelfId, UserId};
use crate::error::ApiError;
use crate::persistence::MovieStore;
use crate::persistence::models::{MovieEntry, Rating, RatingWithAuthor};

/// The full read-aggregate for one movie entry: the stored association,
/// live catalog metadata, the rating mean, and every individual rating
/// with its author.
///
/// `avg_rating` is omitted from the JSON body when the entry has zero
/// ratings, so "unrated" stays distinguishable from "rated zero".
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MovieAggregate {
    /// The stored shelf-movie association.
    pub entry: MovieEntry,
    /// Live metadata from the external catalog.
    pub details: CatalogMovie,
    /// Arithmetic mean of all ratings; absent when unrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    /// Individual ratings with author profiles, in no particular order.
    pub ratings: Vec<RatingWithAuthor>,
}

/// Movie entries, catalog pass-through, aggregates, and ratings.
#[derive(Debug, Clone)]
pub struct MovieService {
    movies: MovieStore,
    catalog: CatalogClient,
    notifier: Notifier,
}

impl MovieService {
    /// Creates a new movie service.
    #[must_use]
    pub fn new(movies: MovieStore, catalog: CatalogClient, notifier: Notifier) -> Self {
        Self {
            movies,
            catalog,
            notifier,
        }
    }

    /// Persists a shelf-movie association and announces it on the
    /// shelf's movies subject.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn add_movie_entry(
        &self,
        external_id: i64,
        shelf_id: ShelfId,
    ) -> Result<MovieEntry, ApiError> {
        let entry = self.movies.insert_entry(external_id, shelf_id).await?;

        self.notifier
            .publish(&ClubEvent::MovieAdded {
                entry_id: entry.id,
                shelf_id,
                external_id,
                timestamp: Utc::now(),
            })
            .await;

        tracing::info!(entry_id = %entry.id, shelf_id = %shelf_id, external_id, "movie added");
        Ok(entry)
    }

    /// Single-item catalog lookup, pass-through with no caching.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the catalog has no such
    /// movie and [`ApiError::Upstream`] on other catalog failures.
    pub async fn fetch_catalog_movie(&self, external_id: i64) -> Result<CatalogMovie, ApiError> {
        self.catalog.get_movie(external_id).await
    }

    /// Assembles the movie read-aggregate: stored entry, live catalog
    /// details, rating mean, and all ratings with authors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the entry does not exist and
    /// [`ApiError::Upstream`] when the catalog lookup fails.
    pub async fn get_movie_aggregate(
        &self,
        entry_id: MovieEntryId,
    ) -> Result<MovieAggregate, ApiError> {
        let Some(entry) = self.movies.get_entry(entry_id).await? else {
            return Err(ApiError::not_found("movie entry", entry_id));
        };

        let details = self.catalog.get_movie(entry.external_id).await?;
        let ratings = self.movies.ratings_with_authors(entry_id).await?;
        let avg_rating = self.movies.avg_rating(entry_id).await?;

        Ok(MovieAggregate {
            entry,
            details,
            avg_rating,
            ratings,
        })
    }

    /// Records a rating and announces it on the entry's rated subject.
    ///
    /// Plain insert: repeated calls by the same user create multiple
    /// rating rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn rate_movie(
        &self,
        entry_id: MovieEntryId,
        user_id: UserId,
        value: f64,
    ) -> Result<Rating, ApiError> {
        let rating = self.movies.insert_rating(entry_id, user_id, value).await?;

        self.notifier
            .publish(&ClubEvent::MovieRated {
                rating_id: rating.id,
                entry_id,
                user_id,
                value,
                timestamp: Utc::now(),
            })
            .await;

        tracing::info!(entry_id = %entry_id, user_id = %user_id, value, "movie rated");
        Ok(rating)
    }
}
