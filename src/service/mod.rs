//! Service layer: business logic orchestration.
//!
//! Each service owns the stores it needs plus the [`crate::domain::Notifier`],
//! and follows the same pattern for mutations: validate → persist →
//! publish the change event → return. Events are emitted only after the
//! store call has committed, and publish failures never affect the
//! reported outcome.

pub mod movies;
pub mod rooms;
pub mod shelves;
pub mod users;

pub use movies::MovieService;
pub use rooms::RoomService;
pub use shelves::ShelfService;
pub use users::UserService;
