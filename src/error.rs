//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "room not found: 26e126f7-84d9-41dd-843f-44931badece5",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category             | HTTP Status                  |
/// |-----------|----------------------|------------------------------|
/// | 1000–1999 | Validation           | 400 Bad Request              |
/// | 2000–2999 | Not Found / Conflict | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Store / Internal     | 500 Internal Server Error    |
/// | 4000–4999 | Identity / Access    | 401 / 403                    |
/// | 5000–5999 | Upstream catalog     | 502 Bad Gateway              |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed (malformed input, length violations).
    #[error("invalid request: {0}")]
    Validation(String),

    /// No entity of the given kind with the given identifier exists.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. `"room"`).
        resource: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// Display name already registered by another user.
    #[error("name already taken: {0}")]
    NameTaken(String),

    /// Missing, expired, or otherwise unverifiable identity assertion.
    #[error("unauthorized")]
    Unauthorized,

    /// Caller identity verified but the membership check failed.
    #[error("permission not allowed")]
    Forbidden,

    /// External movie catalog request failed.
    #[error("catalog upstream error: {0}")]
    Upstream(String),

    /// Persistence layer failure.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::NotFound { .. } => 2001,
            Self::NameTaken(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Store(_) => 3001,
            Self::Unauthorized => 4001,
            Self::Forbidden => 4003,
            Self::Upstream(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NameTaken(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convenience constructor for [`ApiError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Store failures carry SQL and connection detail in their display
        // form; clients get the category only.
        let message = match &self {
            Self::Store(_) => "store error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message,
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Maps a sqlx error to [`ApiError::NameTaken`] when it is a unique
/// violation, otherwise to [`ApiError::Store`].
///
/// Registration relies on the store's uniqueness behavior instead of
/// pre-checking the name.
#[must_use]
pub fn map_user_insert_error(err: sqlx::Error, name: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return ApiError::NameTaken(name.to_string());
    }
    ApiError::Store(err)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::Validation("name too short".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::not_found("room", uuid::Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn name_taken_maps_to_409() {
        let err = ApiError::NameTaken("alice".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2002);
    }

    #[test]
    fn identity_and_access_split() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn upstream_maps_to_502() {
        let err = ApiError::Upstream("timeout".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn store_maps_to_500() {
        let err = ApiError::Store(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_message_contains_resource_and_id() {
        let err = ApiError::not_found("shelf", "abc");
        assert_eq!(err.to_string(), "shelf not found: abc");
    }
}
