//! Transient notification events.
//!
//! These are the in-memory payloads pushed over an open connection when a
//! social action (like, comment, follow, message) targets a connected user.
//! They are distinct from the durable notification records another part of
//! the platform persists; delivery here is at-most-once and best-effort,
//! and a missed event is not an error.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Kind of social action that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
    Mention,
}

/// Transient notification payload delivered to a connected recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Who triggered it.
    pub from_user: UserId,

    /// Human-readable notification text.
    pub content: String,

    /// The item the action refers to (post id, comment id, ...), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    /// The item's collection name ("post", "blog", ...), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl NotificationEvent {
    /// Creates a notification without an item reference.
    pub fn new(kind: NotificationKind, from_user: UserId, content: impl Into<String>) -> Self {
        Self {
            kind,
            from_user,
            content: content.into(),
            item_id: None,
            item_type: None,
        }
    }

    /// Attaches the referenced item.
    pub fn with_item(mut self, item_id: impl Into<String>, item_type: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self.item_type = Some(item_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_serializes_with_type_field() {
        let event = NotificationEvent::new(
            NotificationKind::Like,
            UserId::new("alice").unwrap(),
            "alice liked your post",
        )
        .with_item("post-1", "post");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"like""#));
        assert!(json.contains(r#""fromUser":"alice""#));
        assert!(json.contains(r#""itemId":"post-1""#));
    }

    #[test]
    fn notification_omits_absent_item() {
        let event = NotificationEvent::new(
            NotificationKind::Follow,
            UserId::new("bob").unwrap(),
            "bob followed you",
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("itemId"));
        assert!(!json.contains("itemType"));
    }
}
