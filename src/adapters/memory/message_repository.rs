//! In-memory implementation of MessageRepository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId, UserId};
use crate::domain::messaging::Message;
use crate::ports::MessageRepository;

/// In-memory implementation of MessageRepository.
#[derive(Clone, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages (test helper).
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), DomainError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError> {
        let messages = self.messages.read().await;
        Ok(messages.iter().find(|m| m.id() == id).cloned())
    }

    async fn list_by_conversation(
        &self,
        conversation_id: &ConversationId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Message>, u64), DomainError> {
        let messages = self.messages.read().await;

        let mut in_conversation: Vec<Message> = messages
            .iter()
            .filter(|m| m.conversation_id() == conversation_id)
            .cloned()
            .collect();
        in_conversation.sort_by(|a, b| b.created_at().cmp(a.created_at()));

        let total = in_conversation.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * page_size as usize;
        let page_items: Vec<Message> = in_conversation
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok((page_items, total))
    }

    async fn latest_in_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Message>, DomainError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.conversation_id() == conversation_id)
            .max_by_key(|m| *m.created_at())
            .cloned())
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), DomainError> {
        let mut messages = self.messages.write().await;

        let message = messages.iter_mut().find(|m| m.id() == id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message not found: {}", id),
            )
        })?;

        let receiver = message.receiver_id().clone();
        message.mark_read(&receiver)?;
        Ok(())
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: &ConversationId,
        receiver_id: &UserId,
    ) -> Result<u64, DomainError> {
        let mut messages = self.messages.write().await;

        let mut flipped = 0u64;
        for message in messages.iter_mut() {
            if message.conversation_id() == conversation_id
                && message.receiver_id() == receiver_id
                && !message.is_read()
            {
                message.mark_read(receiver_id)?;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn count_unread_for_receiver(&self, receiver_id: &UserId) -> Result<u64, DomainError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.receiver_id() == receiver_id && !m.is_read())
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn message(conversation_id: &ConversationId, from: &str, to: &str, content: &str) -> Message {
        Message::new(
            MessageId::new(),
            *conversation_id,
            user(from),
            user(to),
            content,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let repo = InMemoryMessageRepository::new();
        let conversation_id = ConversationId::new();

        for i in 0..5 {
            repo.insert(&message(&conversation_id, "alice", "bob", &format!("msg {}", i)))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let (page, total) = repo.list_by_conversation(&conversation_id, 1, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].content(), "msg 4");
        assert_eq!(page[1].content(), "msg 3");
    }

    #[tokio::test]
    async fn latest_returns_most_recent() {
        let repo = InMemoryMessageRepository::new();
        let conversation_id = ConversationId::new();

        repo.insert(&message(&conversation_id, "alice", "bob", "first"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        repo.insert(&message(&conversation_id, "bob", "alice", "second"))
            .await
            .unwrap();

        let latest = repo.latest_in_conversation(&conversation_id).await.unwrap();
        assert_eq!(latest.unwrap().content(), "second");
    }

    #[tokio::test]
    async fn bulk_mark_flips_only_receivers_unread() {
        let repo = InMemoryMessageRepository::new();
        let conversation_id = ConversationId::new();

        repo.insert(&message(&conversation_id, "alice", "bob", "to bob 1"))
            .await
            .unwrap();
        repo.insert(&message(&conversation_id, "alice", "bob", "to bob 2"))
            .await
            .unwrap();
        repo.insert(&message(&conversation_id, "bob", "alice", "to alice"))
            .await
            .unwrap();

        let flipped = repo
            .mark_conversation_read(&conversation_id, &user("bob"))
            .await
            .unwrap();
        assert_eq!(flipped, 2);

        assert_eq!(repo.count_unread_for_receiver(&user("bob")).await.unwrap(), 0);
        assert_eq!(
            repo.count_unread_for_receiver(&user("alice")).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn bulk_mark_is_idempotent() {
        let repo = InMemoryMessageRepository::new();
        let conversation_id = ConversationId::new();

        repo.insert(&message(&conversation_id, "alice", "bob", "hi"))
            .await
            .unwrap();

        let first = repo
            .mark_conversation_read(&conversation_id, &user("bob"))
            .await
            .unwrap();
        let second = repo
            .mark_conversation_read(&conversation_id, &user("bob"))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn mark_read_unknown_message_is_not_found() {
        let repo = InMemoryMessageRepository::new();
        let result = repo.mark_read(&MessageId::new()).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::MessageNotFound);
    }
}
