//! SendMessageHandler - append a message to an existing conversation.

use std::sync::Arc;

use crate::application::EventDispatcher;
use crate::domain::foundation::{ConversationId, MessageId, UserId};
use crate::domain::messaging::{Message, MessagingError};
use crate::ports::{ConversationRepository, MessageRepository};

use super::message_push_payload;

/// Command to send a message into an existing conversation.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub sender: UserId,
    pub conversation_id: ConversationId,
    pub content: String,
}

/// Handler for sending messages.
pub struct SendMessageHandler {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: EventDispatcher,
}

impl SendMessageHandler {
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

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<Message, MessagingError> {
        let conversation = self
            .conversations
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(MessagingError::NotFound)?;

        // Non-participants get the same answer as an absent conversation.
        let receiver = conversation
            .other_participant(&cmd.sender)
            .ok_or(MessagingError::NotFound)?
            .clone();

        let message = Message::new(
            MessageId::new(),
            *conversation.id(),
            cmd.sender,
            receiver.clone(),
            &cmd.content,
        )?;

        self.messages.insert(&message).await?;
        self.conversations
            .touch(conversation.id(), *message.created_at())
            .await?;

        self.dispatcher
            .new_message(&receiver, message_push_payload(&message))
            .await;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryConversationRepository, InMemoryMessageRepository};
    use crate::adapters::websocket::InMemoryPresenceRegistry;
    use crate::domain::messaging::ParticipantPair;
    use crate::ports::{ConnectionHandle, PresenceRegistry, PushEvent};
    use tokio::sync::mpsc;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    struct Fixture {
        handler: SendMessageHandler,
        conversations: Arc<InMemoryConversationRepository>,
        messages: Arc<InMemoryMessageRepository>,
        registry: Arc<InMemoryPresenceRegistry>,
    }

    fn fixture() -> Fixture {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry.clone());
        Fixture {
            handler: SendMessageHandler::new(
                conversations.clone(),
                messages.clone(),
                dispatcher,
            ),
            conversations,
            messages,
            registry,
        }
    }

    async fn seed_conversation(fixture: &Fixture, a: &str, b: &str) -> ConversationId {
        let pair = ParticipantPair::new(user(a), user(b)).unwrap();
        *fixture
            .conversations
            .find_or_create(&pair)
            .await
            .unwrap()
            .id()
    }

    #[tokio::test]
    async fn derives_receiver_from_conversation() {
        let fixture = fixture();
        let conversation_id = seed_conversation(&fixture, "alice", "bob").await;

        let message = fixture
            .handler
            .handle(SendMessageCommand {
                sender: user("alice"),
                conversation_id,
                content: "hi".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(message.receiver_id(), &user("bob"));
        assert_eq!(fixture.messages.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let fixture = fixture();

        let result = fixture
            .handler
            .handle(SendMessageCommand {
                sender: user("alice"),
                conversation_id: ConversationId::new(),
                content: "hi".to_string(),
            })
            .await;

        assert_eq!(result.unwrap_err(), MessagingError::NotFound);
    }

    #[tokio::test]
    async fn non_participant_gets_not_found() {
        let fixture = fixture();
        let conversation_id = seed_conversation(&fixture, "alice", "bob").await;

        let result = fixture
            .handler
            .handle(SendMessageCommand {
                sender: user("mallory"),
                conversation_id,
                content: "let me in".to_string(),
            })
            .await;

        assert_eq!(result.unwrap_err(), MessagingError::NotFound);
        assert_eq!(fixture.messages.len().await, 0);
    }

    #[tokio::test]
    async fn sending_bumps_conversation_activity() {
        let fixture = fixture();
        let conversation_id = seed_conversation(&fixture, "alice", "bob").await;
        let before = *fixture
            .conversations
            .find_by_id(&conversation_id)
            .await
            .unwrap()
            .unwrap()
            .last_activity_at();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        fixture
            .handler
            .handle(SendMessageCommand {
                sender: user("bob"),
                conversation_id,
                content: "bump".to_string(),
            })
            .await
            .unwrap();

        let after = *fixture
            .conversations
            .find_by_id(&conversation_id)
            .await
            .unwrap()
            .unwrap()
            .last_activity_at();
        assert!(after.is_after(&before));
    }

    #[tokio::test]
    async fn pushes_to_receiver_not_sender() {
        let fixture = fixture();
        let conversation_id = seed_conversation(&fixture, "alice", "bob").await;

        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
        fixture
            .registry
            .connect(ConnectionHandle::new(user("alice"), alice_tx))
            .await;
        fixture
            .registry
            .connect(ConnectionHandle::new(user("bob"), bob_tx))
            .await;

        fixture
            .handler
            .handle(SendMessageCommand {
                sender: user("alice"),
                conversation_id,
                content: "ping".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            bob_rx.recv().await.unwrap(),
            PushEvent::NewMessage { .. }
        ));
        assert!(alice_rx.try_recv().is_err());
    }
}
