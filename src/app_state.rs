//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::service::{MovieService, RoomService, ShelfService, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Constructed once at startup; every field is an explicit dependency
/// passed by reference, there are no process-wide singletons.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Startup configuration (secret key, TTLs, catalog settings).
    pub config: Arc<Config>,
    /// Identity and user reads.
    pub users: Arc<UserService>,
    /// Rooms, memberships, and room aggregates.
    pub rooms: Arc<RoomService>,
    /// Shelves and catalog search.
    pub shelves: Arc<ShelfService>,
    /// Movie entries, aggregates, and ratings.
    pub movies: Arc<MovieService>,
}
