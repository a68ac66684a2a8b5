//! UnreadCountHandler - badge count for the authenticated user.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::messaging::MessagingError;
use crate::ports::MessageRepository;

/// Query for the requester's total unread message count.
#[derive(Debug, Clone)]
pub struct UnreadCountQuery {
    pub requester: UserId,
}

/// Handler for the unread count.
pub struct UnreadCountHandler {
    messages: Arc<dyn MessageRepository>,
}

impl UnreadCountHandler {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn handle(&self, query: UnreadCountQuery) -> Result<u64, MessagingError> {
        Ok(self
            .messages
            .count_unread_for_receiver(&query.requester)
            .await?)
    }
}
