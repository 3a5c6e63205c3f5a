//! Room handlers: creation, membership, aggregates, available users.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AddMemberRequest, AvailableUsersParams, CreateRoomRequest, RoomAccessResponse, flag_or_true,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::auth::guard;
use crate::domain::RoomId;
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::{Room, RoomAggregate, RoomWithMembers, User};

/// `POST /rooms` — Create a room with the caller as first member.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "Create a room",
    description = "Creates the room and the creator's membership atomically, then announces the change on the bus.",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.rooms.create_room(&req.name, caller).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// `GET /rooms` — List all rooms.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    responses(
        (status = 200, description = "All rooms", body = Vec<Room>),
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = state.rooms.list_rooms().await?;
    Ok(Json(rooms))
}

/// `GET /rooms/{room_id}` — Fetch one room.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    summary = "Fetch a room",
    params(("room_id" = uuid::Uuid, Path, description = "Room UUID")),
    responses(
        (status = 200, description = "Room", body = Room),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.rooms.get_room(room_id).await?;
    Ok(Json(room))
}

/// `GET /rooms/{room_id}/info` — Fetch the nested room aggregate.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/info",
    tag = "Rooms",
    summary = "Fetch the room aggregate",
    description = "One nested structure: the room, its members, and each shelf with its movie entries. Empty collections are returned as empty arrays, never null.",
    params(("room_id" = uuid::Uuid, Path, description = "Room UUID")),
    responses(
        (status = 200, description = "Room aggregate", body = RoomAggregate),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn room_info(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<impl IntoResponse, ApiError> {
    let aggregate = state.rooms.get_room_aggregate(room_id).await?;
    Ok(Json(aggregate))
}

/// `GET /rooms/{room_id}/access` — Query the caller's membership.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/access",
    tag = "Rooms",
    summary = "Check room access",
    params(("room_id" = uuid::Uuid, Path, description = "Room UUID")),
    responses(
        (status = 200, description = "Membership result", body = RoomAccessResponse),
    )
)]
pub async fn room_access(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let access = state.rooms.check_membership(room_id, caller).await?;
    Ok(Json(RoomAccessResponse { access }))
}

/// `GET /rooms/{room_id}/available-users` — Users not yet in the room.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/available-users",
    tag = "Rooms",
    summary = "Find users to invite",
    description = "Case-insensitive substring match on names. excludeSelf and excludeExisting default to true when missing or unparsable.",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room UUID"),
        AvailableUsersParams,
    ),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    )
)]
pub async fn available_users(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<AvailableUsersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let exclude_self = flag_or_true(params.exclude_self.as_deref());
    let exclude_existing = flag_or_true(params.exclude_existing.as_deref());

    let users = state
        .rooms
        .list_available_users(
            room_id,
            caller,
            &params.search_term,
            exclude_self,
            exclude_existing,
        )
        .await?;
    Ok(Json(users))
}

/// `GET /rooms/with-members` — Every room with its member profiles.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/with-members",
    tag = "Rooms",
    summary = "List rooms with members",
    responses(
        (status = 200, description = "Rooms with members", body = Vec<RoomWithMembers>),
    )
)]
pub async fn rooms_with_members(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = state.rooms.list_rooms_with_members().await?;
    Ok(Json(rooms))
}

/// `GET /rooms/with-members/{room_id}` — One room with its members.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/with-members/{room_id}",
    tag = "Rooms",
    summary = "Fetch a room with members",
    params(("room_id" = uuid::Uuid, Path, description = "Room UUID")),
    responses(
        (status = 200, description = "Room with members", body = RoomWithMembers),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn room_with_members(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.rooms.get_room_with_members(room_id).await?;
    Ok(Json(room))
}

/// `GET /rooms/mine` — Rooms the caller belongs to.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/mine",
    tag = "Rooms",
    summary = "List the caller's rooms",
    responses(
        (status = 200, description = "Caller's rooms", body = Vec<Room>),
    )
)]
pub async fn my_rooms(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = state.rooms.list_rooms_for_user(caller).await?;
    Ok(Json(rooms))
}

/// `POST /rooms/members` — Add a user to a room.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/members",
    tag = "Rooms",
    summary = "Add a member",
    description = "Inserts the membership row, then announces the change on the room-keyed and user-keyed subjects.",
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added"),
        (status = 401, description = "Missing or invalid assertion", body = ErrorResponse),
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.rooms.add_member(req.room_id, req.user_id).await?;
    Ok(StatusCode::CREATED)
}

/// Room routes. Reads on a specific room pass the membership guard;
/// listing and creation need only a verified identity.
pub fn routes(state: AppState) -> Router<AppState> {
    let room_scoped = Router::new()
        .route("/rooms/{room_id}", get(get_room))
        .route("/rooms/{room_id}/info", get(room_info))
        .route("/rooms/{room_id}/available-users", get(available_users))
        .route("/rooms/with-members/{room_id}", get(room_with_members))
        .route_layer(middleware::from_fn_with_state(
            state,
            guard::require_room_access,
        ));

    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/mine", get(my_rooms))
        .route("/rooms/with-members", get(rooms_with_members))
        .route("/rooms/members", post(add_member))
        .route("/rooms/{room_id}/access", get(room_access))
        .merge(room_scoped)
}
