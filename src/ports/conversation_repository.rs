//! Conversation repository port.
//!
//! The store is keyed by the normalized participant pair: at most one
//! conversation exists per unordered pair, and implementations must make
//! `find_or_create` idempotent under concurrent first contact (uniqueness
//! constraint on the normalized pair, not read-then-create).

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError, Timestamp, UserId};
use crate::domain::messaging::{Conversation, ParticipantPair};

/// Repository port for Conversation persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Return the conversation for this pair, creating it if absent.
    ///
    /// Safe to call concurrently for the same pair: both callers observe
    /// the same conversation id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn find_or_create(
        &self,
        participants: &ParticipantPair,
    ) -> Result<Conversation, DomainError>;

    /// Find a conversation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// List conversations the user participates in.
    ///
    /// Ordered by last activity descending. Returns the page plus the
    /// total count across all pages.
    async fn list_for_participant(
        &self,
        user_id: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Conversation>, u64), DomainError>;

    /// Bump a conversation's activity timestamp.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError>;
}
