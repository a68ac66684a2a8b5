//! Message entity with its read-state machine.
//!
//! Read state has exactly two states, `unread` and `read`. Every message
//! starts unread; the only transition is `unread -> read`, triggered by the
//! receiver (single mark or conversation-wide bulk mark). There is no way
//! back to unread.

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, MessageId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// A single message inside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    sender_id: UserId,
    receiver_id: UserId,
    content: String,
    is_read: bool,
    created_at: Timestamp,
}

impl Message {
    /// Create a new unread message.
    ///
    /// Content is trimmed before storage.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty after trimming
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content is required",
            ));
        }

        Ok(Self {
            id,
            conversation_id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            is_read: false,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: String,
        is_read: bool,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            receiver_id,
            content,
            is_read,
            created_at,
        }
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the owning conversation's ID.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Returns the sender's user ID.
    pub fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    /// Returns the receiver's user ID.
    pub fn receiver_id(&self) -> &UserId {
        &self.receiver_id
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns whether the receiver has read this message.
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Transition `unread -> read`, authorized only for the receiver.
    ///
    /// Idempotent for an already-read message. Terminal; there is no
    /// reverse transition.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `requester` is not the receiver
    pub fn mark_read(&mut self, requester: &UserId) -> Result<(), DomainError> {
        if requester != &self.receiver_id {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the receiver can mark a message as read",
            ));
        }
        self.is_read = true;
        Ok(())
    }
}
