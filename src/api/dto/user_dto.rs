//! User request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired display name (3–20 characters, unique).
    pub name: String,
    /// Plain-text password (10–50 characters); hashed before storage.
    pub password: String,
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Registered display name.
    pub name: String,
    /// Plain-text password.
    pub password: String,
}

/// Response of `POST /users/login`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed identity assertion, valid for 24 hours.
    pub token: String,
}

/// Response of `GET /users/access`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessResponse {
    /// Whether the caller's identity resolves to a live user.
    pub allowed: bool,
}

/// Query parameters of `GET /users/rooms/{room_id}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UsersInRoomParams {
    /// Exclude the caller from the result; defaults to `true` when
    /// missing or unparsable.
    pub exclude_self: Option<String>,
}
