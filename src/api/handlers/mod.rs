//! REST endpoint handlers organized by resource.

pub mod movies;
pub mod rooms;
pub mod shelves;
pub mod system;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
///
/// The state handle is needed eagerly here because the room and shelf
/// membership guards are state-bound middleware layers.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(users::routes(state.clone()))
        .merge(rooms::routes(state.clone()))
        .merge(shelves::routes(state))
        .merge(movies::routes())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use sqlx::PgPool;

    use crate::app_state::AppState;
    use crate::catalog::CatalogClient;
    use crate::config::Config;
    use crate::domain::Notifier;
    use crate::persistence::models::{Room, User};
    use crate::persistence::{MovieStore, RoomStore, ShelfStore, UserStore};
    use crate::service::{MovieService, RoomService, ShelfService, UserService};

    const SECRET: &str = "test-secret-key";

    fn test_config() -> Config {
        Config {
            listen_addr: ([127, 0, 0, 1], 0).into(),
            database_url: String::new(),
            database_max_connections: 1,
            database_min_connections: 1,
            database_connect_timeout_secs: 5,
            nats_url: String::new(),
            secret_key: SECRET.to_string(),
            token_ttl: Duration::from_secs(3600),
            catalog_auth_token: "token".to_string(),
            catalog_base_url: "http://127.0.0.1:0".to_string(),
            probe_interval_secs: 60,
            probe_failure_threshold: 3,
            shutdown_grace: Duration::from_secs(1),
        }
    }

    fn make_server(pool: PgPool) -> TestServer {
        let config = test_config();
        let notifier = Notifier::disconnected();
        let catalog = CatalogClient::new(&config.catalog_base_url, &config.catalog_auth_token);

        let state = AppState {
            config: Arc::new(config.clone()),
            users: Arc::new(UserService::new(
                UserStore::new(pool.clone()),
                config.secret_key.clone(),
                config.token_ttl,
            )),
            rooms: Arc::new(RoomService::new(
                RoomStore::new(pool.clone()),
                UserStore::new(pool.clone()),
                notifier.clone(),
            )),
            shelves: Arc::new(ShelfService::new(
                ShelfStore::new(pool.clone()),
                catalog.clone(),
                notifier.clone(),
            )),
            movies: Arc::new(MovieService::new(
                MovieStore::new(pool),
                catalog,
                notifier,
            )),
        };

        let app = crate::api::build_router(state.clone()).with_state(state);
        let Ok(server) = TestServer::new(app) else {
            panic!("test server build failed");
        };
        server
    }

    fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) else {
            panic!("header value build failed");
        };
        (axum::http::header::AUTHORIZATION, value)
    }

    async fn register_and_login(server: &TestServer, name: &str) -> (User, String) {
        let response = server
            .post("/api/v1/users/register")
            .json(&serde_json::json!({ "name": name, "password": "a secure password" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let user: User = response.json();

        let response = server
            .post("/api/v1/users/login")
            .json(&serde_json::json!({ "name": name, "password": "a secure password" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let Some(token) = body.get("token").and_then(|t| t.as_str()) else {
            panic!("missing token");
        };
        (user, token.to_string())
    }

    #[sqlx::test]
    async fn health_needs_no_auth(pool: PgPool) {
        let server = make_server(pool);
        let response = server.get("/health").await;
        response.assert_status_ok();
    }

    #[sqlx::test]
    async fn protected_routes_reject_missing_assertion(pool: PgPool) {
        let server = make_server(pool);

        let response = server.get("/api/v1/users/me").await;
        response.assert_status_unauthorized();

        let response = server.get("/api/v1/rooms").await;
        response.assert_status_unauthorized();
    }

    #[sqlx::test]
    async fn register_login_me_round_trip(pool: PgPool) {
        let server = make_server(pool);
        let (user, token) = register_and_login(&server, "alice").await;

        let (name, value) = bearer(&token);
        let response = server.get("/api/v1/users/me").add_header(name, value).await;
        response.assert_status_ok();
        let me: User = response.json();
        assert_eq!(me.id, user.id);
        assert_eq!(me.name, "alice");
    }

    #[sqlx::test]
    async fn short_password_is_rejected_with_400(pool: PgPool) {
        let server = make_server(pool);
        let response = server
            .post("/api/v1/users/register")
            .json(&serde_json::json!({ "name": "alice", "password": "short" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn duplicate_registration_is_409(pool: PgPool) {
        let server = make_server(pool);
        let _ = register_and_login(&server, "alice").await;

        let response = server
            .post("/api/v1/users/register")
            .json(&serde_json::json!({ "name": "alice", "password": "a secure password" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[sqlx::test]
    async fn non_member_is_forbidden_from_room_reads(pool: PgPool) {
        let server = make_server(pool);
        let (_alice, alice_token) = register_and_login(&server, "alice").await;
        let (_mallory, mallory_token) = register_and_login(&server, "mallory").await;

        // Alice creates a room.
        let (name, value) = bearer(&alice_token);
        let response = server
            .post("/api/v1/rooms")
            .add_header(name, value)
            .json(&serde_json::json!({ "name": "Book Club" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let room: Room = response.json();

        // Mallory is not a member: the guard rejects before the handler.
        let (name, value) = bearer(&mallory_token);
        let response = server
            .get(&format!("/api/v1/rooms/{}/info", room.id))
            .add_header(name, value)
            .await;
        response.assert_status_forbidden();

        // Alice passes the guard.
        let (name, value) = bearer(&alice_token);
        let response = server
            .get(&format!("/api/v1/rooms/{}/info", room.id))
            .add_header(name, value)
            .await;
        response.assert_status_ok();
    }

    #[sqlx::test]
    async fn room_access_endpoint_reports_membership(pool: PgPool) {
        let server = make_server(pool);
        let (_alice, alice_token) = register_and_login(&server, "alice").await;
        let (_bob, bob_token) = register_and_login(&server, "bob").await;

        let (name, value) = bearer(&alice_token);
        let response = server
            .post("/api/v1/rooms")
            .add_header(name, value)
            .json(&serde_json::json!({ "name": "Book Club" }))
            .await;
        let room: Room = response.json();

        let (name, value) = bearer(&bob_token);
        let response = server
            .get(&format!("/api/v1/rooms/{}/access", room.id))
            .add_header(name, value)
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body.get("access"), Some(&serde_json::json!(false)));
    }
}
