//! Persistence layer: PostgreSQL row models and per-entity stores.
//!
//! Each store wraps a shared [`sqlx::PgPool`] and owns the SQL for one
//! entity family. Every statement is its own implicit transaction; the
//! single multi-statement write (room creation plus the creator's
//! membership) runs inside an explicit transaction in
//! [`rooms::RoomStore::create_with_creator`].

pub mod models;
pub mod movies;
pub mod rooms;
pub mod shelves;
pub mod users;

pub use movies::MovieStore;
pub use rooms::RoomStore;
pub use shelves::ShelfStore;
pub use users::UserStore;
