//! cinenest server entry point.
//!
//! Wires configuration, the connection pool, the notification bus, and
//! the service graph, then serves the Axum router until a shutdown
//! signal arrives.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cinenest::api;
use cinenest::app_state::AppState;
use cinenest::catalog::CatalogClient;
use cinenest::config::Config;
use cinenest::domain::Notifier;
use cinenest::persistence::{MovieStore, RoomStore, ShelfStore, UserStore};
use cinenest::probes;
use cinenest::service::{MovieService, RoomService, ShelfService, UserService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("load config: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting cinenest");

    // Connect the store and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database_connect_timeout_secs,
        ))
        .connect(&config.database_url)
        .await
        .context("connect to store")?;

    sqlx::migrate!().run(&pool).await.context("run migrations")?;

    // Connect the notification bus
    let notifier = Notifier::connect(&config.nats_url)
        .await
        .context("connect to notification bus")?;

    // External catalog bridge
    let catalog = CatalogClient::new(&config.catalog_base_url, &config.catalog_auth_token);

    // Build the service graph: explicit dependencies, no globals
    let users = UserService::new(
        UserStore::new(pool.clone()),
        config.secret_key.clone(),
        config.token_ttl,
    );
    let rooms = RoomService::new(
        RoomStore::new(pool.clone()),
        UserStore::new(pool.clone()),
        notifier.clone(),
    );
    let shelves = ShelfService::new(
        ShelfStore::new(pool.clone()),
        catalog.clone(),
        notifier.clone(),
    );
    let movies = MovieService::new(MovieStore::new(pool.clone()), catalog, notifier);

    let state = AppState {
        config: Arc::new(config.clone()),
        users: Arc::new(users),
        rooms: Arc::new(rooms),
        shelves: Arc::new(shelves),
        movies: Arc::new(movies),
    };

    // Background store liveness probe; fatal on repeated failure
    probes::spawn_store_probe(
        pool.clone(),
        std::time::Duration::from_secs(config.probe_interval_secs),
        config.probe_failure_threshold,
    );

    // Build router
    let app = api::build_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .with_state(state);

    // Serve until a shutdown signal, then grant in-flight requests a
    // bounded grace period before closing the pool.
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("bind listener")?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    let grace = config.shutdown_grace;
    let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(grace));
    serve.await.context("serve")?;

    pool.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives; the returned future then
/// bounds the drain window so a hung request cannot stall shutdown.
async fn shutdown_signal(grace: std::time::Duration) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!(grace_secs = grace.as_secs(), "shutdown signal received");

    // Force the listener closed once the grace period elapses.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("grace period elapsed, forcing exit");
        std::process::exit(0);
    });
}
