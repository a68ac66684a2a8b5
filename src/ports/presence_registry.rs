//! PresenceRegistry port - tracks which users hold a live connection.
//!
//! The registry is process-local, in-memory state with an implicit
//! lifecycle: populated as clients join, emptied as they disconnect, and
//! rebuilt from zero after a restart. It is owned explicitly and injected
//! into the dispatcher and the connection handler rather than living in a
//! module-level global.
//!
//! One active handle per user: a reconnect overwrites the previous mapping
//! (last writer wins), with no dual-connection support.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::notification::NotificationEvent;

/// Unique identifier for one open connection.
///
/// Generated server-side when the connection is established; used to tell
/// a stale disconnect apart from the current connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event payload deliverable over a connection handle.
///
/// Kinds match the real-time channel's server-to-client vocabulary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PushEvent {
    /// Social-action notification for the recipient.
    Notification(NotificationEvent),

    /// A new message arrived in one of the recipient's conversations.
    ///
    /// Carries the serialized message view so the delivery layer stays
    /// decoupled from the HTTP DTOs.
    NewMessage { message: serde_json::Value },

    /// The peer started typing.
    UserTyping {
        user_id: UserId,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },

    /// The peer stopped typing.
    UserStopTyping { user_id: UserId },
}

/// Opaque reference usable to push an event to one specific open connection.
///
/// Stores a back-reference to the owning user so `disconnect` can resolve
/// the mapping from the handle alone.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    connection_id: ConnectionId,
    user_id: UserId,
    sender: mpsc::UnboundedSender<PushEvent>,
    connected_at: Timestamp,
}

impl ConnectionHandle {
    /// Create a handle for a freshly established connection.
    pub fn new(user_id: UserId, sender: mpsc::UnboundedSender<PushEvent>) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            user_id,
            sender,
            connected_at: Timestamp::now(),
        }
    }

    /// Returns the connection ID.
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Returns the owning user's ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns when the connection was registered.
    pub fn connected_at(&self) -> &Timestamp {
        &self.connected_at
    }

    /// Push an event down this connection.
    ///
    /// Returns false if the connection's receive side is gone. Callers
    /// treat that the same as an absent mapping: silently dropped.
    pub fn send(&self, event: PushEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Port for tracking live user connections.
///
/// Implementations keep the map in process memory; nothing is persisted
/// and no cross-server coordination is attempted.
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// Register (or overwrite) the mapping for the handle's user.
    ///
    /// A prior handle for the same user is silently replaced.
    async fn connect(&self, handle: ConnectionHandle);

    /// Remove the mapping owned by this handle, if it is still current.
    ///
    /// A disconnect from a connection that has already been replaced by a
    /// reconnect leaves the fresh mapping in place.
    async fn disconnect(&self, handle: &ConnectionHandle);

    /// Read-only lookup of the user's active handle.
    async fn lookup(&self, user_id: &UserId) -> Option<ConnectionHandle>;

    /// Number of currently connected users.
    async fn online_count(&self) -> usize;
}
