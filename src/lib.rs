//! # cinenest
//!
//! REST API backend for multi-tenant movie clubs: users register, form
//! rooms, curate shelves of movies sourced from an external catalog,
//! and rate movies. Room membership is the single authorization
//! primitive; shelf and movie access derive from it transitively.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/) + membership guards (auth/)
//!     │
//!     ├── UserService / RoomService / ShelfService / MovieService (service/)
//!     ├── Notifier → NATS subjects (domain/)
//!     │
//!     ├── Stores over sqlx::PgPool (persistence/)
//!     ├── CatalogClient → external movie catalog (catalog/)
//!     │
//!     └── PostgreSQL
//! ```
//!
//! Every mutating request resolves caller identity first, passes the
//! membership check where the resource is room- or shelf-scoped, and
//! announces the committed change on the notification bus,
//! fire-and-forget.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod probes;
pub mod service;
