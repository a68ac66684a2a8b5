//! ListConversationsHandler - the requester's inbox view.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::messaging::{Conversation, Message, MessagingError};
use crate::ports::{ConversationRepository, MessageRepository};

/// Query for the requester's conversations.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    pub requester: UserId,
    pub page: u32,
    pub limit: u32,
}

/// One conversation annotated for the inbox: who the requester is
/// talking to, and the most recent message (if any).
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub other_participant: UserId,
    pub last_message: Option<Message>,
}

/// A page of conversation summaries plus pagination totals.
#[derive(Debug, Clone)]
pub struct ListConversationsResult {
    pub conversations: Vec<ConversationSummary>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Handler for listing conversations.
pub struct ListConversationsHandler {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ListConversationsHandler {
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
        query: ListConversationsQuery,
    ) -> Result<ListConversationsResult, MessagingError> {
        let (page_items, total) = self
            .conversations
            .list_for_participant(&query.requester, query.page, query.limit)
            .await?;

        let mut summaries = Vec::with_capacity(page_items.len());
        for conversation in page_items {
            // list_for_participant only returns conversations the
            // requester is in, so the other participant always resolves.
            let other_participant = conversation
                .other_participant(&query.requester)
                .ok_or_else(|| {
                    MessagingError::infrastructure("conversation without requester as participant")
                })?
                .clone();

            let last_message = self.messages.latest_in_conversation(conversation.id()).await?;

            summaries.push(ConversationSummary {
                conversation,
                other_participant,
                last_message,
            });
        }

        Ok(ListConversationsResult {
            conversations: summaries,
            page: query.page,
            limit: query.limit,
            total,
        })
    }
}
