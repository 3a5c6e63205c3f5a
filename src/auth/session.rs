//! Signed identity assertions (JWT).
//!
//! Login issues a signed, time-limited HS256 token binding the user id
//! as subject; every downstream request recovers caller identity from
//! the bearer token via [`verify_assertion`].

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::error::ApiError;

/// Claims carried by an identity assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Subject: the authenticated user's id.
    pub sub: UserId,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued-at time (unix seconds).
    pub iat: i64,
}

/// Issues a signed assertion for `user_id`, valid for `ttl`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if token encoding fails.
pub fn issue_assertion(
    user_id: UserId,
    secret_key: &str,
    ttl: std::time::Duration,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let exp = now + ttl;

    let claims = AssertionClaims {
        sub: user_id,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    let key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| ApiError::Internal(format!("issue assertion: {e}")))
}

/// Verifies a bearer assertion and recovers the caller's user id.
///
/// Expired, tampered, and malformed tokens all resolve to
/// [`ApiError::Unauthorized`]; only key/crypto misconfiguration maps to
/// [`ApiError::Internal`].
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] on any client-side token problem.
pub fn verify_assertion(token: &str, secret_key: &str) -> Result<UserId, ApiError> {
    let key = DecodingKey::from_secret(secret_key.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<AssertionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken
            | jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::ExpiredSignature
            | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
            | jsonwebtoken::errors::ErrorKind::ImmatureSignature
            | jsonwebtoken::errors::ErrorKind::Base64(_)
            | jsonwebtoken::errors::ErrorKind::Json(_)
            | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => ApiError::Unauthorized,
            _ => ApiError::Internal(format!("assertion verification: {e}")),
        })?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn issue_and_verify_round_trip() {
        let user_id = UserId::new();
        let Ok(token) = issue_assertion(user_id, SECRET, Duration::from_secs(3600)) else {
            panic!("issuing failed");
        };
        assert!(!token.is_empty());

        let verified = verify_assertion(&token, SECRET);
        assert_eq!(verified.ok(), Some(user_id));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let Ok(token) = issue_assertion(UserId::new(), SECRET, Duration::from_secs(3600)) else {
            panic!("issuing failed");
        };

        let result = verify_assertion(&token, "a-different-secret");
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let user_id = UserId::new();
        let now = Utc::now();
        let claims = AssertionClaims {
            sub: user_id,
            exp: (now - chrono::Duration::seconds(3600)).timestamp(),
            iat: (now - chrono::Duration::seconds(7200)).timestamp(),
        };
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let Ok(token) = encode(&Header::default(), &claims, &key) else {
            panic!("encoding failed");
        };

        let result = verify_assertion(&token, SECRET);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn malformed_tokens_are_unauthorized() {
        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            let result = verify_assertion(token, SECRET);
            assert!(
                matches!(result, Err(ApiError::Unauthorized)),
                "expected Unauthorized for token: {token}"
            );
        }
    }
}
