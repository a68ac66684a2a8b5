//! StartConversationHandler - find-or-create a conversation and send the
//! opening message.

use std::sync::Arc;

use crate::application::EventDispatcher;
use crate::domain::foundation::{MessageId, UserId};
use crate::domain::messaging::{Conversation, Message, MessagingError, ParticipantPair};
use crate::ports::{ConversationRepository, MessageRepository};

use super::message_push_payload;

/// Command to start (or resume) a conversation with another user.
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub sender: UserId,
    pub receiver_id: UserId,
    pub content: String,
}

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub conversation: Conversation,
    pub message: Message,
}

/// Handler for starting conversations.
pub struct StartConversationHandler {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: EventDispatcher,
}

impl StartConversationHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self {
            conversations,
            messages,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, MessagingError> {
        // Rejects self-pairing before any I/O.
        let pair = ParticipantPair::new(cmd.sender.clone(), cmd.receiver_id.clone())?;

        // Idempotent under concurrent first contact: both callers land on
        // the same conversation row.
        let conversation = self.conversations.find_or_create(&pair).await?;

        let message = Message::new(
            MessageId::new(),
            *conversation.id(),
            cmd.sender,
            cmd.receiver_id.clone(),
            &cmd.content,
        )?;

        self.messages.insert(&message).await?;
        self.conversations
            .touch(conversation.id(), *message.created_at())
            .await?;

        // Best-effort push; an offline receiver is not an error.
        self.dispatcher
            .new_message(&cmd.receiver_id, message_push_payload(&message))
            .await;

        Ok(StartConversationResult {
            conversation,
            message,
        })
    }
}
