//! PostgreSQL implementation of MessageRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, MessageId, Timestamp, UserId,
};
use crate::domain::messaging::Message;
use crate::ports::MessageRepository;

/// PostgreSQL implementation of MessageRepository.
#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    /// Creates a new PostgresMessageRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO messages (
                id, conversation_id, sender_id, receiver_id, content, is_read, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(message.conversation_id().as_uuid())
        .bind(message.sender_id().as_str())
        .bind(message.receiver_id().as_str())
        .bind(message.content())
        .bind(message.is_read())
        .bind(message.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert message: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch message: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_message(row)?)),
            None => Ok(None),
        }
    }

    async fn list_by_conversation(
        &self,
        conversation_id: &ConversationId,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Message>, u64), DomainError> {
        let offset = (page.saturating_sub(1) as i64) * page_size as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list messages: {}", e),
            )
        })?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
                .bind(conversation_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to count messages: {}", e),
                    )
                })?;

        let messages: Result<Vec<Message>, DomainError> =
            rows.into_iter().map(row_to_message).collect();

        Ok((messages?, total.0 as u64))
    }

    async fn latest_in_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch latest message: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_message(row)?)),
            None => Ok(None),
        }
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to mark message read: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: &ConversationId,
        receiver_id: &UserId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE conversation_id = $1 AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(receiver_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to bulk-mark messages read: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }

    async fn count_unread_for_receiver(&self, receiver_id: &UserId) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count unread messages: {}", e),
            )
        })?;

        Ok(result.0 as u64)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_message(row: sqlx::postgres::PgRow) -> Result<Message, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(db_err("id"))?;
    let conversation_id: uuid::Uuid = row
        .try_get("conversation_id")
        .map_err(db_err("conversation_id"))?;
    let sender_id: String = row.try_get("sender_id").map_err(db_err("sender_id"))?;
    let receiver_id: String = row.try_get("receiver_id").map_err(db_err("receiver_id"))?;
    let content: String = row.try_get("content").map_err(db_err("content"))?;
    let is_read: bool = row.try_get("is_read").map_err(db_err("is_read"))?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(db_err("created_at"))?;

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        ConversationId::from_uuid(conversation_id),
        UserId::new(sender_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid sender_id: {}", e))
        })?,
        UserId::new(receiver_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid receiver_id: {}", e))
        })?,
        content,
        is_read,
        Timestamp::from_datetime(created_at),
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
