//! Wire protocol for the real-time channel.
//!
//! Client → server: `join`, `typing`, `stopTyping` (disconnect is implicit).
//! Server → client: `notification`, `newMessage`, `userTyping`,
//! `userStopTyping`. Joins are not acknowledged.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::ports::PushEvent;

// ============================================
// Client → Server Frames
// ============================================

/// All frame types a client may send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Register presence for this connection.
    #[serde(rename_all = "camelCase")]
    Join { user_id: UserId },

    /// Sender started typing; relayed to the receiver.
    ///
    /// The supplied identities are trusted as-is. Whether typing frames
    /// should be checked against the caller's authenticated identity is a
    /// known open question; the relay does not verify today.
    #[serde(rename_all = "camelCase")]
    Typing {
        user_id: UserId,
        #[serde(default)]
        username: Option<String>,
        receiver_id: UserId,
    },

    /// Sender stopped typing; relayed to the receiver.
    #[serde(rename_all = "camelCase")]
    StopTyping {
        user_id: UserId,
        receiver_id: UserId,
    },
}

// ============================================
// Server → Client Frames
// ============================================

/// All frame types the server may send.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Social-action notification.
    Notification { data: serde_json::Value },

    /// New message in one of the client's conversations.
    NewMessage { message: serde_json::Value },

    /// Peer started typing.
    #[serde(rename_all = "camelCase")]
    UserTyping {
        user_id: UserId,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },

    /// Peer stopped typing.
    #[serde(rename_all = "camelCase")]
    UserStopTyping { user_id: UserId },
}

impl ServerFrame {
    /// Convert a dispatched event into its wire frame.
    pub fn from_push_event(event: PushEvent) -> Self {
        match event {
            PushEvent::Notification(notification) => ServerFrame::Notification {
                data: serde_json::to_value(&notification)
                    .unwrap_or_else(|_| serde_json::Value::Null),
            },
            PushEvent::NewMessage { message } => ServerFrame::NewMessage { message },
            PushEvent::UserTyping { user_id, username } => {
                ServerFrame::UserTyping { user_id, username }
            }
            PushEvent::UserStopTyping { user_id } => ServerFrame::UserStopTyping { user_id },
        }
    }
}
