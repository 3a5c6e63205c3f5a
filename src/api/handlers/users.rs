//! User handlers: register, login, self, listings, existence check.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AccessResponse, LoginRequest, LoginResponse, RegisterRequest, UsersInRoomParams, flag_or_true,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::auth::guard;
use crate::domain::RoomId;
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::User;

/// `POST /users/register` — Register a new user.
///
/// # Errors
///
/// Returns [`ApiError`] on validation failure or a taken name.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    summary = "Register a new user",
    description = "Validates name and password lengths, hashes the credential, and creates the account.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.register(&req.name, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /users/login` — Verify credentials and issue an assertion.
///
/// # Errors
///
/// Returns [`ApiError`] for unknown names or wrong passwords.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "Users",
    summary = "Log in",
    description = "Verifies the password against the stored hash and returns a signed, time-limited identity assertion.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Assertion issued", body = LoginResponse),
        (status = 401, description = "Invalid credential", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.users.login(&req.name, &req.password).await?;
    Ok(Json(LoginResponse { token }))
}

/// `GET /users` — List all users.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    summary = "List users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// `GET /users/me` — Fetch the caller's own profile.
///
/// # Errors
///
/// Returns [`ApiError`] when the subject no longer resolves.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    summary = "Fetch own profile",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get(user_id).await?;
    Ok(Json(user))
}

/// `GET /users/access` — Liveness probe for the caller's identity.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the asserted user does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/access",
    tag = "Users",
    summary = "Check caller identity is live",
    responses(
        (status = 200, description = "Access allowed", body = AccessResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn access(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    if !state.users.exists(user_id).await? {
        return Err(ApiError::not_found("user", user_id));
    }
    Ok(Json(AccessResponse { allowed: true }))
}

/// `GET /users/rooms/{room_id}` — List the members of a room.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/users/rooms/{room_id}",
    tag = "Users",
    summary = "List users in a room",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room UUID"),
        UsersInRoomParams,
    ),
    responses(
        (status = 200, description = "Room members", body = Vec<User>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    )
)]
pub async fn users_in_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<UsersInRoomParams>,
) -> Result<impl IntoResponse, ApiError> {
    let exclude_self = flag_or_true(params.exclude_self.as_deref());
    let users = state.users.list_in_room(room_id, caller, exclude_self).await?;
    Ok(Json(users))
}

/// User routes. The in-room listing is additionally gated by the room
/// membership guard.
pub fn routes(state: AppState) -> Router<AppState> {
    let room_scoped = Router::new()
        .route("/users/rooms/{room_id}", get(users_in_room))
        .route_layer(middleware::from_fn_with_state(
            state,
            guard::require_room_access,
        ));

    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route("/users/access", get(access))
        .merge(room_scoped)
}
