//! HTTP routes for messaging endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    list_conversations, list_messages, mark_message_read, send_message, start_conversation,
    unread_count, MessagingHandlers,
};

/// Creates the conversation router, mounted under `/api/conversations`.
pub fn conversation_routes(handlers: MessagingHandlers) -> Router {
    Router::new()
        .route("/", post(start_conversation))
        .route("/", get(list_conversations))
        .route("/:id/messages", get(list_messages))
        .route("/:id/messages", post(send_message))
        .with_state(handlers)
}

/// Creates the message router, mounted under `/api/messages`.
pub fn message_routes(handlers: MessagingHandlers) -> Router {
    Router::new()
        .route("/unread-count", get(unread_count))
        .route("/:id/read", put(mark_message_read))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Extension;
    use tower::ServiceExt;

    use crate::adapters::memory::{InMemoryConversationRepository, InMemoryMessageRepository};
    use crate::adapters::websocket::InMemoryPresenceRegistry;
    use crate::application::handlers::messaging::{
        ListConversationsHandler, ListMessagesHandler, MarkMessageReadHandler, SendMessageHandler,
        StartConversationHandler, UnreadCountHandler,
    };
    use crate::application::EventDispatcher;
    use crate::domain::foundation::{AuthenticatedUser, UserId};
    use crate::ports::PresenceRegistry;

    use super::*;

    fn test_handlers() -> MessagingHandlers {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let registry: Arc<dyn PresenceRegistry> = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = EventDispatcher::new(registry);

        MessagingHandlers::new(
            Arc::new(StartConversationHandler::new(
                conversations.clone(),
                messages.clone(),
                dispatcher.clone(),
            )),
            Arc::new(SendMessageHandler::new(
                conversations.clone(),
                messages.clone(),
                dispatcher,
            )),
            Arc::new(ListMessagesHandler::new(
                conversations.clone(),
                messages.clone(),
            )),
            Arc::new(ListConversationsHandler::new(conversations, messages.clone())),
            Arc::new(MarkMessageReadHandler::new(messages.clone())),
            Arc::new(UnreadCountHandler::new(messages)),
        )
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("alice").unwrap(), "alice")
    }

    #[tokio::test]
    async fn unread_count_requires_authentication() {
        let app = message_routes(test_handlers());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/unread-count")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unread_count_returns_zero_for_fresh_user() {
        // The extension stands in for what auth_middleware injects.
        let app = message_routes(test_handlers()).layer(Extension(test_user()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/unread-count")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"count":0}"#);
    }

    #[tokio::test]
    async fn starting_a_conversation_requires_authentication() {
        let app = conversation_routes(test_handlers());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"receiverId": "bob", "content": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_inbox_lists_no_conversations() {
        let app = conversation_routes(test_handlers()).layer(Extension(test_user()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["conversations"], serde_json::json!([]));
        assert_eq!(json["pagination"]["total"], 0);
    }
}
