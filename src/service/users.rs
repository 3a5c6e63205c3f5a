//! Identity service: registration, login, profile reads.

use std::time::Duration;

use crate::auth::{password, session};
use crate::domain::{RoomId, UserId};
use crate::error::ApiError;
use crate::persistence::UserStore;
use crate::persistence::models::User;

/// Display name length bounds, inclusive.
const NAME_LEN: std::ops::RangeInclusive<usize> = 3..=20;
/// Password length bounds, inclusive.
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 10..=50;

/// Registration, login, and user reads.
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
    secret_key: String,
    token_ttl: Duration,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(store: UserStore, secret_key: String, token_ttl: Duration) -> Self {
        Self {
            store,
            secret_key,
            token_ttl,
        }
    }

    /// Registers a new user.
    ///
    /// Validates name and password lengths, hashes the credential, and
    /// inserts. Name collisions are reported by the store's uniqueness
    /// behavior, not pre-checked.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on length violations,
    /// [`ApiError::NameTaken`] when the name exists, and
    /// [`ApiError::Store`] on database failure.
    pub async fn register(&self, name: &str, password_plain: &str) -> Result<User, ApiError> {
        if !NAME_LEN.contains(&name.chars().count()) {
            return Err(ApiError::Validation(format!(
                "name must be {}-{} characters",
                NAME_LEN.start(),
                NAME_LEN.end()
            )));
        }
        if !PASSWORD_LEN.contains(&password_plain.chars().count()) {
            return Err(ApiError::Validation(format!(
                "password must be {}-{} characters",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            )));
        }

        let hash = password::hash_password(password_plain)?;
        let user = self.store.create(name, &hash).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verifies credentials and issues a signed identity assertion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown name and
    /// [`ApiError::Unauthorized`] when the password does not match.
    pub async fn login(&self, name: &str, password_plain: &str) -> Result<String, ApiError> {
        let Some(user) = self.store.get_by_name(name).await? else {
            return Err(ApiError::not_found("user", name));
        };

        if !password::verify_password(password_plain, &user.password)? {
            return Err(ApiError::Unauthorized);
        }

        session::issue_assertion(user.id, &self.secret_key, self.token_ttl)
    }

    /// Fetches a user's public profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such user exists.
    pub async fn get(&self, user_id: UserId) -> Result<User, ApiError> {
        self.store
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("user", user_id))
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.store.list().await
    }

    /// Liveness probe for a user id; backs the access-allowed endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn exists(&self, user_id: UserId) -> Result<bool, ApiError> {
        self.store.exists(user_id).await
    }

    /// Lists the members of a room, optionally excluding the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on database failure.
    pub async fn list_in_room(
        &self,
        room_id: RoomId,
        caller: UserId,
        exclude_self: bool,
    ) -> Result<Vec<User>, ApiError> {
        self.store.list_in_room(room_id, caller, exclude_self).await
    }
}
