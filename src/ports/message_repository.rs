//! Message repository port.
//!
//! Messages are append-only from this subsystem's point of view: created
//! unread, flipped to read (singly or in bulk), never deleted.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError, MessageId, UserId};
use crate::domain::messaging::Message;

/// Repository port for Message persistence.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    async fn insert(&self, message: &Message) -> Result<(), DomainError>;

    /// Find a message by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError>;

    /// Page through a conversation's messages, newest first.
    ///
    /// Pagination boundaries are computed on this newest-first order;
    /// callers that want oldest-first presentation reverse the page.
    /// Returns the page plus the total message count.
    async fn list_by_conversation(
        &self,
        conversation_id: &ConversationId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Message>, u64), DomainError>;

    /// The single most recent message in a conversation, if any.
    async fn latest_in_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Message>, DomainError>;

    /// Persist a single message's read flag.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if the message doesn't exist
    async fn mark_read(&self, id: &MessageId) -> Result<(), DomainError>;

    /// Bulk-mark every unread message in the conversation addressed to
    /// `receiver_id`. Returns the number of messages flipped.
    async fn mark_conversation_read(
        &self,
        conversation_id: &ConversationId,
        receiver_id: &UserId,
    ) -> Result<u64, DomainError>;

    /// Count unread messages addressed to the user, across conversations.
    async fn count_unread_for_receiver(&self, receiver_id: &UserId) -> Result<u64, DomainError>;
}
