//! Room request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{RoomId, UserId};

/// Body of `POST /rooms`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    /// Room name.
    pub name: String,
}

/// Body of `POST /rooms/members`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddMemberRequest {
    /// Room to join.
    pub room_id: RoomId,
    /// User to add.
    pub user_id: UserId,
}

/// Response of `GET /rooms/{room_id}/access`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomAccessResponse {
    /// Whether the caller is a member of the room.
    pub access: bool,
}

/// Query parameters of `GET /rooms/{room_id}/available-users`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUsersParams {
    /// Case-insensitive substring to match against names; empty
    /// matches everyone.
    #[serde(default)]
    pub search_term: String,
    /// Exclude the caller; defaults to `true` when missing or
    /// unparsable.
    pub exclude_self: Option<String>,
    /// Exclude users already in the room; defaults to `true` when
    /// missing or unparsable.
    pub exclude_existing: Option<String>,
}
