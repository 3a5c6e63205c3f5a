//! Shelf handlers: creation, listings, and catalog search.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AvailableMoviesParams, CreateShelfRequest, flag_or_true};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::auth::guard;
use crate::catalog::CatalogMovie;
use crate::domain::{RoomId, ShelfId};
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::{MovieEntry, Shelf};

/// `POST /shelves` — Create a shelf inside a room.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure (including a dangling room
/// id, which the schema's foreign key rejects).
#[utoipa::path(
    post,
    path = "/api/v1/shelves",
    tag = "Shelves",
    summary = "Create a shelf",
    request_body = CreateShelfRequest,
    responses(
        (status = 201, description = "Shelf created", body = Shelf),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn create_shelf(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(req): Json<CreateShelfRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let shelf = state.shelves.create_shelf(&req.name, req.room_id).await?;
    Ok((StatusCode::CREATED, Json(shelf)))
}

/// `GET /shelves/rooms/{room_id}` — List the shelves of a room.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/shelves/rooms/{room_id}",
    tag = "Shelves",
    summary = "List shelves by room",
    params(("room_id" = uuid::Uuid, Path, description = "Room UUID")),
    responses(
        (status = 200, description = "Shelves of the room", body = Vec<Shelf>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    )
)]
pub async fn shelves_by_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<impl IntoResponse, ApiError> {
    let shelves = state.shelves.list_shelves_by_room(room_id).await?;
    Ok(Json(shelves))
}

/// `GET /shelves/{shelf_id}` — Fetch one shelf.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the shelf does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/shelves/{shelf_id}",
    tag = "Shelves",
    summary = "Fetch a shelf",
    params(("shelf_id" = uuid::Uuid, Path, description = "Shelf UUID")),
    responses(
        (status = 200, description = "Shelf", body = Shelf),
        (status = 403, description = "Caller lacks access", body = ErrorResponse),
        (status = 404, description = "Shelf not found", body = ErrorResponse),
    )
)]
pub async fn get_shelf(
    State(state): State<AppState>,
    Path(shelf_id): Path<ShelfId>,
) -> Result<impl IntoResponse, ApiError> {
    let shelf = state.shelves.get_shelf(shelf_id).await?;
    Ok(Json(shelf))
}

/// `GET /shelves/{shelf_id}/movies` — List a shelf's movie entries.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/shelves/{shelf_id}/movies",
    tag = "Shelves",
    summary = "List movies on a shelf",
    description = "An empty shelf yields an empty array, never null.",
    params(("shelf_id" = uuid::Uuid, Path, description = "Shelf UUID")),
    responses(
        (status = 200, description = "Movie entries", body = Vec<MovieEntry>),
        (status = 403, description = "Caller lacks access", body = ErrorResponse),
    )
)]
pub async fn shelf_movies(
    State(state): State<AppState>,
    Path(shelf_id): Path<ShelfId>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = state.shelves.list_movies_by_shelf(shelf_id).await?;
    Ok(Json(movies))
}

/// `GET /shelves/{shelf_id}/available-movies` — Search the catalog.
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] when the catalog fails.
#[utoipa::path(
    get,
    path = "/api/v1/shelves/{shelf_id}/available-movies",
    tag = "Shelves",
    summary = "Search catalog movies for a shelf",
    description = "Delegates the text search to the external catalog; excludeExisting (default true) drops movies already on the shelf.",
    params(
        ("shelf_id" = uuid::Uuid, Path, description = "Shelf UUID"),
        AvailableMoviesParams,
    ),
    responses(
        (status = 200, description = "Catalog matches", body = Vec<CatalogMovie>),
        (status = 403, description = "Caller lacks access", body = ErrorResponse),
        (status = 502, description = "Catalog failure", body = ErrorResponse),
    )
)]
pub async fn available_movies(
    State(state): State<AppState>,
    Path(shelf_id): Path<ShelfId>,
    Query(params): Query<AvailableMoviesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let exclude_existing = flag_or_true(params.exclude_existing.as_deref());
    let movies = state
        .shelves
        .search_available_movies(shelf_id, &params.search_term, exclude_existing)
        .await?;
    Ok(Json(movies))
}

/// Shelf routes. Shelf-keyed reads pass the derived shelf guard;
/// room-keyed listing passes the room guard.
pub fn routes(state: AppState) -> Router<AppState> {
    let shelf_scoped = Router::new()
        .route("/shelves/{shelf_id}", get(get_shelf))
        .route("/shelves/{shelf_id}/movies", get(shelf_movies))
        .route("/shelves/{shelf_id}/available-movies", get(available_movies))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_shelf_access,
        ));

    let room_scoped = Router::new()
        .route("/shelves/rooms/{room_id}", get(shelves_by_room))
        .route_layer(middleware::from_fn_with_state(
            state,
            guard::require_room_access,
        ));

    Router::new()
        .route("/shelves", post(create_shelf))
        .merge(shelf_scoped)
        .merge(room_scoped)
}
