//! Shelf service: room-scoped shelves and the catalog-backed
//! available-movie search.

use std::collections::HashSet;

use chrono::Utc;

use crate::catalog::{CatalogClient, CatalogMovie};
use crate::domain::{ClubEvent, Notifier, RoomId, ShelfId, UserId};
use crate::error::ApiError;
use crate::persistence::ShelfStore;
use crate::persistence::models::{MovieEntry, Shelf};

/// Shelf creation, reads, derived access, and catalog search.
#[derive(Debug, Clone)]
pub struct ShelfService {
    shelves: ShelfStore,
    catalog: CatalogClient,
    notifier: Notifier,
}

impl ShelfService {
    /// Creates a new shelf service.
    #[must_use]
    pub fn new(shelves: ShelfStore, catalog: CatalogClient, notifier: Notifier) -> Self {
        Self {
            shelves,
            catalog,
            notifier,
        }
    }

    /// Creates a shelf under `room_id` and announces it on the room's
    /// shelves subject.
    ///
    /// The room id is not existence-checked; a dangling id fails at
    /// the store through the foreign key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn create_shelf(&self, name: &str, room_id: RoomId) -> Result<Shelf, ApiError> {
        let shelf = self.shelves.create(name, room_id).await?;

        self.notifier
            .publish(&ClubEvent::ShelfCreated {
                shelf_id: shelf.id,
                room_id,
                name: shelf.name.clone(),
                timestamp: Utc::now(),
            })
            .await;

        tracing::info!(shelf_id = %shelf.id, room_id = %room_id, "shelf created");
        Ok(shelf)
    }

    /// Lists the shelves of a room.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_shelves_by_room(&self, room_id: RoomId) -> Result<Vec<Shelf>, ApiError> {
        self.shelves.list_by_room(room_id).await
    }

    /// Fetches a shelf by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such shelf exists.
    pub async fn get_shelf(&self, shelf_id: ShelfId) -> Result<Shelf, ApiError> {
        self.shelves
            .get(shelf_id)
            .await?
            .ok_or_else(|| ApiError::not_found("shelf", shelf_id))
    }

    /// Lists the movie entries on a shelf; never null, an empty shelf
    /// yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_movies_by_shelf(&self, shelf_id: ShelfId) -> Result<Vec<MovieEntry>, ApiError> {
        self.shelves.list_movies(shelf_id).await
    }

    /// Derived authorization: shelf access equals membership of the
    /// owning room.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn check_shelf_access(
        &self,
        shelf_id: ShelfId,
        user_id: UserId,
    ) -> Result<bool, ApiError> {
        self.shelves.check_access(shelf_id, user_id).await
    }

    /// Searches the external catalog, optionally dropping movies whose
    /// external id is already present on the shelf.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] on catalog failure and
    /// [`ApiError::Store`] when the existing-entry lookup fails.
    pub async fn search_available_movies(
        &self,
        shelf_id: ShelfId,
        term: &str,
        exclude_existing: bool,
    ) -> Result<Vec<CatalogMovie>, ApiError> {
        let movies = self.catalog.search_movies(term).await?;

        if !exclude_existing {
            return Ok(movies);
        }

        let existing: HashSet<i64> = self
            .shelves
            .list_movies(shelf_id)
            .await?
            .into_iter()
            .map(|entry| entry.external_id)
            .collect();

        Ok(movies
            .into_iter()
            .filter(|movie| !existing.contains(&movie.id))
            .collect())
    }
}
