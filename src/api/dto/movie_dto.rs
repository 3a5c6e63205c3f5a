//! Movie entry and rating request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ShelfId;

/// Body of `POST /movies`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMovieEntryRequest {
    /// External catalog movie id.
    #[serde(rename = "movie_id")]
    pub external_id: i64,
    /// Shelf to add the movie to.
    pub shelf_id: ShelfId,
}

/// Body of `POST /movies/{entry_id}/ratings`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RateMovieRequest {
    /// Numeric rating value.
    pub rating: f64,
}
