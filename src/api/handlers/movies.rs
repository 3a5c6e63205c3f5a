//! Movie handlers: catalog lookups, entries, aggregates, ratings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateMovieEntryRequest, RateMovieRequest};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::catalog::CatalogMovie;
use crate::domain::MovieEntryId;
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::{MovieEntry, Rating};
use crate::service::movies::MovieAggregate;

/// `GET /movies/catalog/{external_id}` — Fetch a catalog movie.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the catalog has no such movie
/// and [`ApiError::Upstream`] on other catalog failures.
#[utoipa::path(
    get,
    path = "/api/v1/movies/catalog/{external_id}",
    tag = "Movies",
    summary = "Fetch a catalog movie",
    description = "Single-item pass-through lookup against the external catalog; no local caching.",
    params(("external_id" = i64, Path, description = "External catalog movie id")),
    responses(
        (status = 200, description = "Catalog movie", body = CatalogMovie),
        (status = 404, description = "No such catalog movie", body = ErrorResponse),
        (status = 502, description = "Catalog failure", body = ErrorResponse),
    )
)]
pub async fn catalog_movie(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(external_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state.movies.fetch_catalog_movie(external_id).await?;
    Ok(Json(movie))
}

/// `GET /movies/{entry_id}/details` — Fetch the movie aggregate.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the entry does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{entry_id}/details",
    tag = "Movies",
    summary = "Fetch the movie aggregate",
    description = "The stored entry, live catalog details, the rating mean (omitted when unrated), and every rating with its author.",
    params(("entry_id" = uuid::Uuid, Path, description = "Movie entry UUID")),
    responses(
        (status = 200, description = "Movie aggregate", body = MovieAggregate),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 502, description = "Catalog failure", body = ErrorResponse),
    )
)]
pub async fn movie_details(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(entry_id): Path<MovieEntryId>,
) -> Result<impl IntoResponse, ApiError> {
    let aggregate = state.movies.get_movie_aggregate(entry_id).await?;
    Ok(Json(aggregate))
}

/// `POST /movies` — Add a catalog movie to a shelf.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    tag = "Movies",
    summary = "Add a movie to a shelf",
    description = "Persists the shelf-movie association and announces it on the shelf's subject. Duplicate pairs are accepted.",
    request_body = CreateMovieEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = MovieEntry),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn create_entry(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(req): Json<CreateMovieEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .movies
        .add_movie_entry(req.external_id, req.shelf_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /movies/{entry_id}/ratings` — Rate a movie entry.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{entry_id}/ratings",
    tag = "Movies",
    summary = "Rate a movie",
    description = "Inserts a new rating row; repeated calls by the same user create multiple rows.",
    params(("entry_id" = uuid::Uuid, Path, description = "Movie entry UUID")),
    request_body = RateMovieRequest,
    responses(
        (status = 201, description = "Rating recorded", body = Rating),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn rate_movie(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(entry_id): Path<MovieEntryId>,
    Json(req): Json<RateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rating = state.movies.rate_movie(entry_id, caller, req.rating).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// Movie routes; all require a verified identity.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", post(create_entry))
        .route("/movies/catalog/{external_id}", get(catalog_movie))
        .route("/movies/{entry_id}/details", get(movie_details))
        .route("/movies/{entry_id}/ratings", post(rate_movie))
}
