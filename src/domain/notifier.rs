//! Publish-only change-notification bus.
//!
//! [`Notifier`] wraps an [`async_nats::Client`] and publishes
//! [`ClubEvent`]s to their subjects with at-most-once, best-effort
//! semantics: a mutation is considered successful once persisted, and a
//! failure to publish is logged and dropped, never surfaced to the
//! caller of the triggering mutation.

use super::ClubEvent;

/// Fire-and-forget publisher for [`ClubEvent`]s.
///
/// Constructed once at startup and shared by reference through the
/// application state. A notifier built with [`Notifier::disconnected`]
/// drops every event; it exists so stores and services can be exercised
/// in tests without a running bus.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Option<async_nats::Client>,
}

impl Notifier {
    /// Connects to the notification bus at `url`.
    ///
    /// # Errors
    ///
    /// Returns the underlying connect error when the bus is unreachable.
    /// Startup treats this as fatal; after startup the connection is
    /// self-healing (the client reconnects internally).
    pub async fn connect(url: &str) -> Result<Self, async_nats::ConnectError> {
        let client = async_nats::connect(url).await?;
        Ok(Self {
            client: Some(client),
        })
    }

    /// Creates a notifier that silently drops every event.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { client: None }
    }

    /// Publishes `event` on its subject.
    ///
    /// Serialization or delivery failures are logged at warn level and
    /// swallowed; this method never fails.
    pub async fn publish(&self, event: &ClubEvent) {
        let Some(client) = &self.client else {
            return;
        };

        let subject = event.subject();

        let payload = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%subject, error = %err, "failed to encode event payload");
                return;
            }
        };

        if let Err(err) = client.publish(subject.clone(), payload.into()).await {
            tracing::warn!(%subject, error = %err, "failed to publish event");
        }
    }

    /// Returns `true` when the underlying bus connection is established.
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.client.as_ref().is_some_and(|client| {
            matches!(
                client.connection_state(),
                async_nats::connection::State::Connected
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, UserId};
    use chrono::Utc;

    fn make_event() -> ClubEvent {
        ClubEvent::RoomCreated {
            room_id: RoomId::new(),
            name: "Book Club".to_string(),
            creator_id: UserId::new(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn disconnected_notifier_swallows_events() {
        let notifier = Notifier::disconnected();
        // Must complete without error; there is nothing to observe.
        notifier.publish(&make_event()).await;
    }

    #[test]
    fn disconnected_notifier_reports_unhealthy() {
        let notifier = Notifier::disconnected();
        assert!(!notifier.healthy());
    }
}
