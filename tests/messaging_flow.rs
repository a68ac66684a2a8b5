//! End-to-end messaging scenario over the in-memory adapters.
//!
//! Exercises the full conversation lifecycle: alice opens a conversation
//! with bob, bob receives the real-time push, reads the history (which
//! flips the read flags), and both sides see consistent inbox state.

use std::sync::Arc;

use tokio::sync::mpsc;

use commons_backend::adapters::memory::{
    InMemoryConversationRepository, InMemoryMessageRepository,
};
use commons_backend::adapters::websocket::InMemoryPresenceRegistry;
use commons_backend::application::handlers::messaging::{
    ListConversationsHandler, ListConversationsQuery, ListMessagesHandler, ListMessagesQuery,
    MarkMessageReadCommand, MarkMessageReadHandler, SendMessageCommand, SendMessageHandler,
    StartConversationCommand, StartConversationHandler, UnreadCountHandler, UnreadCountQuery,
};
use commons_backend::application::EventDispatcher;
use commons_backend::domain::foundation::UserId;
use commons_backend::domain::messaging::MessagingError;
use commons_backend::ports::{ConnectionHandle, PresenceRegistry, PushEvent};

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

struct App {
    registry: Arc<InMemoryPresenceRegistry>,
    start: StartConversationHandler,
    send: SendMessageHandler,
    list_messages: ListMessagesHandler,
    list_conversations: ListConversationsHandler,
    mark_read: MarkMessageReadHandler,
    unread_count: UnreadCountHandler,
}

fn app() -> App {
    let conversations = Arc::new(InMemoryConversationRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new());
    let registry = Arc::new(InMemoryPresenceRegistry::new());
    let dispatcher = EventDispatcher::new(registry.clone());

    App {
        registry,
        start: StartConversationHandler::new(
            conversations.clone(),
            messages.clone(),
            dispatcher.clone(),
        ),
        send: SendMessageHandler::new(conversations.clone(), messages.clone(), dispatcher),
        list_messages: ListMessagesHandler::new(conversations.clone(), messages.clone()),
        list_conversations: ListConversationsHandler::new(conversations, messages.clone()),
        mark_read: MarkMessageReadHandler::new(messages.clone()),
        unread_count: UnreadCountHandler::new(messages),
    }
}

async fn connect(app: &App, who: &str) -> mpsc::UnboundedReceiver<PushEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    app.registry
        .connect(ConnectionHandle::new(user(who), tx))
        .await;
    rx
}

#[tokio::test]
async fn full_conversation_lifecycle() {
    let app = app();
    let mut bob_events = connect(&app, "bob").await;

    // Alice opens the conversation.
    let opened = app
        .start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "hey bob".to_string(),
        })
        .await
        .unwrap();
    let conversation_id = *opened.conversation.id();

    // Bob gets the push in real time.
    match bob_events.recv().await.unwrap() {
        PushEvent::NewMessage { message } => {
            assert_eq!(message["content"], "hey bob");
            assert_eq!(message["isRead"], false);
        }
        other => panic!("Expected NewMessage, got {:?}", other),
    }

    // Bob has one unread message.
    assert_eq!(
        app.unread_count
            .handle(UnreadCountQuery { requester: user("bob") })
            .await
            .unwrap(),
        1
    );

    // Bob replies into the same conversation.
    app.send
        .handle(SendMessageCommand {
            sender: user("bob"),
            conversation_id,
            content: "hey alice".to_string(),
        })
        .await
        .unwrap();

    // Bob opens the history: oldest-first page, and his unread flips.
    let history = app
        .list_messages
        .handle(ListMessagesQuery {
            requester: user("bob"),
            conversation_id,
            page: 1,
            limit: 50,
        })
        .await
        .unwrap();
    assert_eq!(history.total, 2);
    assert_eq!(history.messages[0].content(), "hey bob");
    assert_eq!(history.messages[1].content(), "hey alice");
    // The returned page already reflects the read receipt.
    assert!(history.messages[0].is_read());

    assert_eq!(
        app.unread_count
            .handle(UnreadCountQuery { requester: user("bob") })
            .await
            .unwrap(),
        0
    );

    // Alice still has bob's reply unread until she reads it.
    assert_eq!(
        app.unread_count
            .handle(UnreadCountQuery { requester: user("alice") })
            .await
            .unwrap(),
        1
    );

    // Alice's inbox shows bob and his reply as the latest message.
    let inbox = app
        .list_conversations
        .handle(ListConversationsQuery {
            requester: user("alice"),
            page: 1,
            limit: 20,
        })
        .await
        .unwrap();
    assert_eq!(inbox.total, 1);
    let summary = &inbox.conversations[0];
    assert_eq!(summary.other_participant, user("bob"));
    assert_eq!(summary.last_message.as_ref().unwrap().content(), "hey alice");
}

#[tokio::test]
async fn starting_twice_lands_in_the_same_conversation() {
    let app = app();

    let first = app
        .start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "one".to_string(),
        })
        .await
        .unwrap();

    // Same pair from the other direction.
    let second = app
        .start
        .handle(StartConversationCommand {
            sender: user("bob"),
            receiver_id: user("alice"),
            content: "two".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(first.conversation.id(), second.conversation.id());

    let history = app
        .list_messages
        .handle(ListMessagesQuery {
            requester: user("alice"),
            conversation_id: *first.conversation.id(),
            page: 1,
            limit: 50,
        })
        .await
        .unwrap();
    assert_eq!(history.total, 2);
}

#[tokio::test]
async fn single_message_read_receipt_is_receiver_only() {
    let app = app();

    let opened = app
        .start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "read me".to_string(),
        })
        .await
        .unwrap();
    let message_id = *opened.message.id();

    // The sender cannot acknowledge their own message.
    let result = app
        .mark_read
        .handle(MarkMessageReadCommand {
            requester: user("alice"),
            message_id,
        })
        .await;
    assert_eq!(result.unwrap_err(), MessagingError::NotFound);

    // The receiver can, and it sticks.
    let message = app
        .mark_read
        .handle(MarkMessageReadCommand {
            requester: user("bob"),
            message_id,
        })
        .await
        .unwrap();
    assert!(message.is_read());
}

#[tokio::test]
async fn outsiders_cannot_observe_a_conversation() {
    let app = app();

    let opened = app
        .start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "private".to_string(),
        })
        .await
        .unwrap();

    let result = app
        .list_messages
        .handle(ListMessagesQuery {
            requester: user("mallory"),
            conversation_id: *opened.conversation.id(),
            page: 1,
            limit: 50,
        })
        .await;

    // Indistinguishable from a conversation that does not exist.
    assert_eq!(result.unwrap_err(), MessagingError::NotFound);
}

#[tokio::test]
async fn reconnect_redirects_pushes_to_the_new_connection() {
    let app = app();

    let mut stale = connect(&app, "bob").await;
    let mut fresh = connect(&app, "bob").await;

    app.start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "after reconnect".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(
        fresh.recv().await.unwrap(),
        PushEvent::NewMessage { .. }
    ));
    assert!(stale.try_recv().is_err());
}

#[tokio::test]
async fn offline_receiver_still_gets_durable_messages() {
    let app = app();

    // Nobody is connected; send succeeds anyway.
    let opened = app
        .start
        .handle(StartConversationCommand {
            sender: user("alice"),
            receiver_id: user("bob"),
            content: "while you were out".to_string(),
        })
        .await
        .unwrap();

    let history = app
        .list_messages
        .handle(ListMessagesQuery {
            requester: user("bob"),
            conversation_id: *opened.conversation.id(),
            page: 1,
            limit: 50,
        })
        .await
        .unwrap();
    assert_eq!(history.messages.len(), 1);
    assert_eq!(history.messages[0].content(), "while you were out");
}
