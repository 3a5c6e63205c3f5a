//! Domain layer: typed identifiers, change events, and the notifier.
//!
//! This module contains the core identity types shared by every other
//! layer, the [`ClubEvent`] enum describing every state mutation the
//! service announces, and the [`Notifier`] that publishes those events
//! to the change-notification bus.

pub mod event;
pub mod ids;
pub mod notifier;

pub use event::ClubEvent;
pub use ids::{MovieEntryId, RatingId, RoomId, ShelfId, UserId};
pub use notifier::Notifier;
