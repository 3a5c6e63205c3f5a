//! Shelf request/response DTOs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::RoomId;

/// Body of `POST /shelves`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShelfRequest {
    /// Shelf name.
    pub name: String,
    /// Owning room. Not existence-checked at creation time; a dangling
    /// id fails at the store.
    pub room_id: RoomId,
}

/// Query parameters of `GET /shelves/{shelf_id}/available-movies`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMoviesParams {
    /// Free-text catalog search term.
    #[serde(default)]
    pub search_term: String,
    /// Exclude movies already on the shelf; defaults to `true` when
    /// missing or unparsable.
    pub exclude_existing: Option<String>,
}
