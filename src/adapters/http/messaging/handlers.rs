//! HTTP handlers for messaging endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::messaging::{
    ListConversationsHandler, ListConversationsQuery, ListMessagesHandler, ListMessagesQuery,
    MarkMessageReadCommand, MarkMessageReadHandler, SendMessageCommand, SendMessageHandler,
    StartConversationCommand, StartConversationHandler, UnreadCountHandler, UnreadCountQuery,
};
use crate::domain::foundation::{ConversationId, MessageId, UserId};
use crate::domain::messaging::MessagingError;

use super::dto::{
    ConversationListResponse, ConversationResponse, ErrorResponse, MessageListResponse,
    MessageResponse, PaginationMeta, PaginationQuery, SendMessageRequest,
    StartConversationRequest, StartConversationResponse, UnreadCountResponse,
};

const CONVERSATION_PAGE_SIZE: u32 = 20;
const MESSAGE_PAGE_SIZE: u32 = 50;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MessagingHandlers {
    start_handler: Arc<StartConversationHandler>,
    send_handler: Arc<SendMessageHandler>,
    list_messages_handler: Arc<ListMessagesHandler>,
    list_conversations_handler: Arc<ListConversationsHandler>,
    mark_read_handler: Arc<MarkMessageReadHandler>,
    unread_count_handler: Arc<UnreadCountHandler>,
}

impl MessagingHandlers {
    pub fn new(
        start_handler: Arc<StartConversationHandler>,
        send_handler: Arc<SendMessageHandler>,
        list_messages_handler: Arc<ListMessagesHandler>,
        list_conversations_handler: Arc<ListConversationsHandler>,
        mark_read_handler: Arc<MarkMessageReadHandler>,
        unread_count_handler: Arc<UnreadCountHandler>,
    ) -> Self {
        Self {
            start_handler,
            send_handler,
            list_messages_handler,
            list_conversations_handler,
            mark_read_handler,
            unread_count_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations - Start (or resume) a conversation
pub async fn start_conversation(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<StartConversationRequest>,
) -> Response {
    let receiver_id = match UserId::new(req.receiver_id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("receiverId is required")),
            )
                .into_response()
        }
    };

    let cmd = StartConversationCommand {
        sender: user.id,
        receiver_id,
        content: req.content,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => {
            let response = StartConversationResponse {
                conversation_id: result.conversation.id().to_string(),
                message: MessageResponse::from(&result.message),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_messaging_error(e),
    }
}

/// GET /api/conversations - List the requester's conversations
pub async fn list_conversations(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Query(pagination): Query<PaginationQuery>,
) -> Response {
    let (page, limit) = pagination.resolve(CONVERSATION_PAGE_SIZE);

    let query = ListConversationsQuery {
        requester: user.id,
        page,
        limit,
    };

    match handlers.list_conversations_handler.handle(query).await {
        Ok(result) => {
            let response = ConversationListResponse {
                conversations: result
                    .conversations
                    .iter()
                    .map(ConversationResponse::from)
                    .collect(),
                pagination: PaginationMeta::new(result.page, result.limit, result.total),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_messaging_error(e),
    }
}

/// GET /api/conversations/:id/messages - Page through a conversation
pub async fn list_messages(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Response {
    let conversation_id = match conversation_id.parse::<ConversationId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid conversation ID")),
            )
                .into_response()
        }
    };

    let (page, limit) = pagination.resolve(MESSAGE_PAGE_SIZE);

    let query = ListMessagesQuery {
        requester: user.id,
        conversation_id,
        page,
        limit,
    };

    match handlers.list_messages_handler.handle(query).await {
        Ok(result) => {
            let response = MessageListResponse {
                messages: result.messages.iter().map(MessageResponse::from).collect(),
                pagination: PaginationMeta::new(result.page, result.limit, result.total),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_messaging_error(e),
    }
}

/// POST /api/conversations/:id/messages - Send a message
pub async fn send_message(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let conversation_id = match conversation_id.parse::<ConversationId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid conversation ID")),
            )
                .into_response()
        }
    };

    let cmd = SendMessageCommand {
        sender: user.id,
        conversation_id,
        content: req.content,
    };

    match handlers.send_handler.handle(cmd).await {
        Ok(message) => {
            (StatusCode::CREATED, Json(MessageResponse::from(&message))).into_response()
        }
        Err(e) => handle_messaging_error(e),
    }
}

/// PUT /api/messages/:id/read - Mark one message as read
pub async fn mark_message_read(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(message_id): Path<String>,
) -> Response {
    let message_id = match message_id.parse::<MessageId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation("Invalid message ID")),
            )
                .into_response()
        }
    };

    let cmd = MarkMessageReadCommand {
        requester: user.id,
        message_id,
    };

    match handlers.mark_read_handler.handle(cmd).await {
        Ok(message) => (StatusCode::OK, Json(MessageResponse::from(&message))).into_response(),
        Err(e) => handle_messaging_error(e),
    }
}

/// GET /api/messages/unread-count - Total unread messages for the requester
pub async fn unread_count(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = UnreadCountQuery { requester: user.id };

    match handlers.unread_count_handler.handle(query).await {
        Ok(count) => (StatusCode::OK, Json(UnreadCountResponse { count })).into_response(),
        Err(e) => handle_messaging_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_messaging_error(error: MessagingError) -> Response {
    match error {
        MessagingError::NotFound => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found())).into_response()
        }
        MessagingError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(format!(
                "Validation failed for {}: {}",
                field, message
            ))),
        )
            .into_response(),
        MessagingError::Infrastructure(msg) => {
            tracing::error!("messaging endpoint failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response()
        }
    }
}
