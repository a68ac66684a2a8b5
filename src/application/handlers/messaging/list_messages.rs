//! ListMessagesHandler - page through a conversation's history.
//!
//! Listing doubles as the read receipt: every unread message addressed
//! to the requester in this conversation is flipped to read, regardless
//! of which page was asked for.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::messaging::{Message, MessagingError};
use crate::ports::{ConversationRepository, MessageRepository};

/// Query for a page of conversation history.
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub requester: UserId,
    pub conversation_id: ConversationId,
    pub page: u32,
    pub limit: u32,
}

/// One page of messages plus pagination totals.
#[derive(Debug, Clone)]
pub struct ListMessagesResult {
    /// Oldest-first within the page; page boundaries are computed on the
    /// newest-first order.
    pub messages: Vec<Message>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Handler for listing messages.
pub struct ListMessagesHandler {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ListMessagesHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            conversations,
            messages,
        }
    }

    pub async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResult, MessagingError> {
        let conversation = self
            .conversations
            .find_by_id(&query.conversation_id)
            .await?
            .ok_or(MessagingError::NotFound)?;

        if !conversation.has_participant(&query.requester) {
            return Err(MessagingError::NotFound);
        }

        // Viewing the conversation marks everything addressed to the
        // requester as read, even messages outside this page. The flip
        // happens before the fetch so the returned page already carries
        // the receipt.
        self.messages
            .mark_conversation_read(&query.conversation_id, &query.requester)
            .await?;

        let (mut page_items, total) = self
            .messages
            .list_by_conversation(&query.conversation_id, query.page, query.limit)
            .await?;

        // Newest-first pagination, oldest-first presentation.
        page_items.reverse();

        Ok(ListMessagesResult {
            messages: page_items,
            page: query.page,
            limit: query.limit,
            total,
        })
    }
}
