//! In-memory implementation of ConversationRepository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::messaging::{Conversation, ParticipantPair};
use crate::ports::ConversationRepository;

/// In-memory implementation of ConversationRepository.
///
/// Backed by a single RwLock'd Vec. Find-or-create runs under the write
/// lock, so the one-conversation-per-pair invariant holds without a
/// database constraint.
#[derive(Clone, Default)]
pub struct InMemoryConversationRepository {
    conversations: Arc<RwLock<Vec<Conversation>>>,
}

impl InMemoryConversationRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations (test helper).
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Whether the repository is empty (test helper).
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_or_create(
        &self,
        participants: &ParticipantPair,
    ) -> Result<Conversation, DomainError> {
        let mut conversations = self.conversations.write().await;

        if let Some(existing) = conversations
            .iter()
            .find(|c| c.participants() == participants)
        {
            return Ok(existing.clone());
        }

        let conversation = Conversation::new(ConversationId::new(), participants.clone());
        conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.iter().find(|c| c.id() == id).cloned())
    }

    async fn list_for_participant(
        &self,
        user_id: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Conversation>, u64), DomainError> {
        let conversations = self.conversations.read().await;

        let mut mine: Vec<Conversation> = conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.last_activity_at().cmp(a.last_activity_at()));

        let total = mine.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * page_size as usize;
        let page_items: Vec<Conversation> = mine
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok((page_items, total))
    }

    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;

        let conversation = conversations
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ConversationNotFound,
                    format!("Conversation not found: {}", id),
                )
            })?;

        *conversation = Conversation::reconstitute(
            *conversation.id(),
            conversation.participants().clone(),
            *conversation.created_at(),
            at,
        );
        Ok(())
    }
}
