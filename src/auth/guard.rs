//! Request guards: caller identity extraction and membership checks.
//!
//! [`CurrentUser`] recovers the caller's id from the bearer assertion;
//! the room and shelf guards wrap route groups and reject callers whose
//! membership check fails, before any handler logic runs.

use axum::extract::{FromRequestParts, Path, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::session;
use crate::app_state::AppState;
use crate::domain::{RoomId, ShelfId, UserId};
use crate::error::ApiError;

/// The authenticated caller, recovered from the `Authorization: Bearer`
/// header by verifying the identity assertion.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let user_id = session::verify_assertion(token, &state.config.secret_key)?;
        Ok(Self(user_id))
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let (scheme, token) = header.split_once(' ')?;
    if scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Route-group guard for `{room_id}` paths: verifies the caller is a
/// member of the room before the handler runs.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when the membership check is false
/// and [`ApiError::Unauthorized`] when the caller identity is missing.
pub async fn require_room_access(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    CurrentUser(user_id): CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.rooms.check_membership(room_id, user_id).await? {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Route-group guard for `{shelf_id}` paths: verifies the caller is a
/// member of the shelf's owning room before the handler runs.
///
/// Shelf access is never granted directly; it is always inherited from
/// room membership.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when the derived check is false and
/// [`ApiError::Unauthorized`] when the caller identity is missing.
pub async fn require_shelf_access(
    State(state): State<AppState>,
    Path(shelf_id): Path<ShelfId>,
    CurrentUser(user_id): CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.shelves.check_shelf_access(shelf_id, user_id).await? {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(request).await)
}
