//! PostgreSQL implementation of ConversationRepository.
//!
//! The conversations table carries a unique index on the normalized
//! participant pair (low, high), so creation is idempotent under
//! concurrent first contact: both racers insert-or-skip and then read
//! back the same row.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::messaging::{Conversation, ParticipantPair};
use crate::ports::ConversationRepository;

/// PostgreSQL implementation of ConversationRepository.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    /// Creates a new PostgresConversationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn find_or_create(
        &self,
        participants: &ParticipantPair,
    ) -> Result<Conversation, DomainError> {
        let candidate = Conversation::new(ConversationId::new(), participants.clone());

        sqlx::query(
            r#"
            INSERT INTO conversations (
                id, participant_low, participant_high, created_at, last_activity_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (participant_low, participant_high) DO NOTHING
            "#,
        )
        .bind(candidate.id().as_uuid())
        .bind(participants.low().as_str())
        .bind(participants.high().as_str())
        .bind(candidate.created_at().as_datetime())
        .bind(candidate.last_activity_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert conversation: {}", e),
            )
        })?;

        // Read back by pair: returns our insert or the concurrent winner's.
        let row = sqlx::query(
            r#"
            SELECT id, participant_low, participant_high, created_at, last_activity_at
            FROM conversations
            WHERE participant_low = $1 AND participant_high = $2
            "#,
        )
        .bind(participants.low().as_str())
        .bind(participants.high().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch conversation by pair: {}", e),
            )
        })?;

        row_to_conversation(row)
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, participant_low, participant_high, created_at, last_activity_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch conversation: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_conversation(row)?)),
            None => Ok(None),
        }
    }

    async fn list_for_participant(
        &self,
        user_id: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Conversation>, u64), DomainError> {
        let offset = (page.saturating_sub(1) as i64) * page_size as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, participant_low, participant_high, created_at, last_activity_at
            FROM conversations
            WHERE participant_low = $1 OR participant_high = $1
            ORDER BY last_activity_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list conversations: {}", e),
            )
        })?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM conversations WHERE participant_low = $1 OR participant_high = $1",
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count conversations: {}", e),
            )
        })?;

        let conversations: Result<Vec<Conversation>, DomainError> =
            rows.into_iter().map(row_to_conversation).collect();

        Ok((conversations?, total.0 as u64))
    }

    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE conversations SET last_activity_at = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to touch conversation: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("Conversation not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_conversation(row: sqlx::postgres::PgRow) -> Result<Conversation, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(db_err("id"))?;
    let low: String = row.try_get("participant_low").map_err(db_err("participant_low"))?;
    let high: String = row
        .try_get("participant_high")
        .map_err(db_err("participant_high"))?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(db_err("created_at"))?;
    let last_activity_at: chrono::DateTime<chrono::Utc> = row
        .try_get("last_activity_at")
        .map_err(db_err("last_activity_at"))?;

    let low = UserId::new(low).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid participant: {}", e))
    })?;
    let high = UserId::new(high).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid participant: {}", e))
    })?;
    let participants = ParticipantPair::new(low, high)?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        participants,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(last_activity_at),
    ))
}

fn db_err(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", column, e),
        )
    }
}
