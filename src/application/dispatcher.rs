//! Event dispatcher - best-effort fan-out to connected users.
//!
//! The dispatcher is a thin convenience over the presence registry:
//! look up the target's handle and push, or drop the event silently if
//! the target is offline. No queuing, no retry, no error for the caller.
//! The durable notification record elsewhere in the platform remains the
//! system of record; this push is a courtesy.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::notification::NotificationEvent;
use crate::ports::{PresenceRegistry, PushEvent};

/// Routes events to the target user's open connection, if any.
#[derive(Clone)]
pub struct EventDispatcher {
    registry: Arc<dyn PresenceRegistry>,
}

impl EventDispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: Arc<dyn PresenceRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to the target, at most once.
    ///
    /// A missing mapping or a closed socket are both silent no-ops.
    pub async fn emit(&self, target: &UserId, event: PushEvent) {
        match self.registry.lookup(target).await {
            Some(handle) => {
                if !handle.send(event) {
                    tracing::debug!(target = %target, "dropped event: connection closed");
                }
            }
            None => {
                tracing::trace!(target = %target, "dropped event: user offline");
            }
        }
    }

    /// Push a social-action notification.
    pub async fn notify(&self, target: &UserId, notification: NotificationEvent) {
        self.emit(target, PushEvent::Notification(notification)).await;
    }

    /// Push a freshly sent message to its receiver.
    pub async fn new_message(&self, target: &UserId, message: serde_json::Value) {
        self.emit(target, PushEvent::NewMessage { message }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::InMemoryPresenceRegistry;
    use crate::domain::notification::NotificationKind;
    use crate::ports::ConnectionHandle;
    use tokio::sync::mpsc;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn emit_delivers_to_connected_user() {
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.connect(ConnectionHandle::new(user("bob"), tx)).await;

        dispatcher
            .notify(
                &user("bob"),
                NotificationEvent::new(NotificationKind::Like, user("alice"), "alice liked your post"),
            )
            .await;

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, PushEvent::Notification(_)));
    }

    #[tokio::test]
    async fn emit_to_offline_user_is_silent_noop() {
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry);

        // Must not panic or error.
        dispatcher
            .emit(
                &user("ghost"),
                PushEvent::UserStopTyping { user_id: user("alice") },
            )
            .await;
    }

    #[tokio::test]
    async fn emit_to_closed_connection_is_silent_noop() {
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry.clone());

        let (tx, rx) = mpsc::unbounded_channel();
        registry.connect(ConnectionHandle::new(user("bob"), tx)).await;
        drop(rx);

        dispatcher
            .new_message(&user("bob"), serde_json::json!({"content": "hi"}))
            .await;
    }

    #[tokio::test]
    async fn emit_reaches_only_the_target() {
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry.clone());

        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
        let (carol_tx, mut carol_rx) = mpsc::unbounded_channel();
        registry.connect(ConnectionHandle::new(user("bob"), bob_tx)).await;
        registry
            .connect(ConnectionHandle::new(user("carol"), carol_tx))
            .await;

        dispatcher
            .emit(
                &user("bob"),
                PushEvent::UserTyping {
                    user_id: user("alice"),
                    username: Some("alice".to_string()),
                },
            )
            .await;

        assert!(bob_rx.recv().await.is_some());
        assert!(carol_rx.try_recv().is_err());
    }
}
