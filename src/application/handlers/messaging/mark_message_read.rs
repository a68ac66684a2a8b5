//! MarkMessageReadHandler - single-message read receipt.

use std::sync::Arc;

use crate::domain::foundation::{MessageId, UserId};
use crate::domain::messaging::{Message, MessagingError};
use crate::ports::MessageRepository;

/// Command to mark one message as read.
#[derive(Debug, Clone)]
pub struct MarkMessageReadCommand {
    pub requester: UserId,
    pub message_id: MessageId,
}

/// Handler for marking messages read.
pub struct MarkMessageReadHandler {
    messages: Arc<dyn MessageRepository>,
}

impl MarkMessageReadHandler {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn handle(&self, cmd: MarkMessageReadCommand) -> Result<Message, MessagingError> {
        let mut message = self
            .messages
            .find_by_id(&cmd.message_id)
            .await?
            .ok_or(MessagingError::NotFound)?;

        // Receiver-only; anyone else (including the sender) sees NotFound
        // via the Forbidden conflation in the error mapping.
        message.mark_read(&cmd.requester)?;
        self.messages.mark_read(&cmd.message_id).await?;

        Ok(message)
    }
}
