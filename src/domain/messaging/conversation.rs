//! Conversation aggregate - the durable two-party message container.
//!
//! A conversation exists for exactly one unordered pair of users.
//! (A, B) and (B, A) resolve to the same conversation; lookup and
//! creation always go through the normalized `ParticipantPair`.

use crate::domain::foundation::{ConversationId, DomainError, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Normalized unordered pair of conversation participants.
///
/// # Invariants
///
/// - The two participants are never equal (no self-conversations)
/// - `low <= high` under lexicographic user-id order, so (A, B) and
///   (B, A) produce identical pairs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair {
    low: UserId,
    high: UserId,
}

impl ParticipantPair {
    /// Create a normalized pair from two participants, in any order.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if both identities are the same user
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::validation(
                "receiver_id",
                "Cannot start a conversation with yourself",
            ));
        }
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    /// The lexicographically smaller participant id.
    pub fn low(&self) -> &UserId {
        &self.low
    }

    /// The lexicographically larger participant id.
    pub fn high(&self) -> &UserId {
        &self.high
    }

    /// Checks whether the given user is one of the two participants.
    pub fn contains(&self, user_id: &UserId) -> bool {
        &self.low == user_id || &self.high == user_id
    }

    /// Returns the participant that is not `user_id`, if `user_id` is a member.
    pub fn other(&self, user_id: &UserId) -> Option<&UserId> {
        if user_id == &self.low {
            Some(&self.high)
        } else if user_id == &self.high {
            Some(&self.low)
        } else {
            None
        }
    }
}

/// Conversation aggregate.
///
/// Created lazily on first contact between two users. Only mutation is the
/// activity timestamp touch on every new message; messages themselves live
/// in their own store keyed by conversation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    participants: ParticipantPair,
    created_at: Timestamp,
    last_activity_at: Timestamp,
}

impl Conversation {
    /// Create a new conversation between two distinct users.
    pub fn new(id: ConversationId, participants: ParticipantPair) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            participants,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Reconstitute a conversation from persistence (no validation).
    pub fn reconstitute(
        id: ConversationId,
        participants: ParticipantPair,
        created_at: Timestamp,
        last_activity_at: Timestamp,
    ) -> Self {
        Self {
            id,
            participants,
            created_at,
            last_activity_at,
        }
    }

    /// Returns the conversation ID.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the normalized participant pair.
    pub fn participants(&self) -> &ParticipantPair {
        &self.participants
    }

    /// Returns when the conversation was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the conversation last saw a message.
    pub fn last_activity_at(&self) -> &Timestamp {
        &self.last_activity_at
    }

    /// Checks if the given user is a participant.
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// Returns the participant that is not `user_id`.
    pub fn other_participant(&self, user_id: &UserId) -> Option<&UserId> {
        self.participants.other(user_id)
    }

    /// Bump the activity timestamp. Called on every appended message.
    pub fn touch(&mut self) {
        self.last_activity_at = Timestamp::now();
    }
}
