//! HTTP DTOs for messaging endpoints.
//!
//! These types decouple the HTTP API from domain types. Field names are
//! camelCase on the wire to match the rest of the platform's API.

use serde::{Deserialize, Serialize};

use crate::application::handlers::messaging::ConversationSummary;
use crate::domain::messaging::Message;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start (or resume) a conversation with an opening message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub receiver_id: String,
    pub content: String,
}

/// Request to send a message into an existing conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Resolve page and limit against a default page size.
    ///
    /// Page floors at 1, limit is clamped to 1..=100.
    pub fn resolve(&self, default_limit: u32) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        (page, limit)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A message as exposed over the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            conversation_id: message.conversation_id().to_string(),
            sender_id: message.sender_id().to_string(),
            receiver_id: message.receiver_id().to_string(),
            content: message.content().to_string(),
            is_read: message.is_read(),
            created_at: message.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// A conversation annotated for the inbox view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub other_participant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<MessageResponse>,
    pub last_activity_at: String,
    pub created_at: String,
}

impl From<&ConversationSummary> for ConversationResponse {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.conversation.id().to_string(),
            other_participant: summary.other_participant.to_string(),
            last_message: summary.last_message.as_ref().map(MessageResponse::from),
            last_activity_at: summary
                .conversation
                .last_activity_at()
                .as_datetime()
                .to_rfc3339(),
            created_at: summary.conversation.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Pagination envelope attached to list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1) as u64);
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Response for starting a conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationResponse {
    pub conversation_id: String,
    pub message: MessageResponse,
}

/// Paginated message history, oldest-first within the page.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub pagination: PaginationMeta,
}

/// Paginated conversation list, most recent activity first.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationResponse>,
    pub pagination: PaginationMeta,
}

/// Response for the unread count endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: "Not found".to_string(),
            details: None,
        }
    }

    pub fn internal() -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR".to_string(),
            message: "Internal server error".to_string(),
            details: None,
        }
    }
}
