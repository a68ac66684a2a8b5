//! Messaging command/query handlers.

mod list_conversations;
mod list_messages;
mod mark_message_read;
mod send_message;
mod start_conversation;
mod unread_count;

pub use list_conversations::{
    ConversationSummary, ListConversationsHandler, ListConversationsQuery, ListConversationsResult,
};
pub use list_messages::{ListMessagesHandler, ListMessagesQuery, ListMessagesResult};
pub use mark_message_read::{MarkMessageReadCommand, MarkMessageReadHandler};
pub use send_message::{SendMessageCommand, SendMessageHandler};
pub use start_conversation::{
    StartConversationCommand, StartConversationHandler, StartConversationResult,
};
pub use unread_count::{UnreadCountHandler, UnreadCountQuery};

use crate::domain::messaging::Message;

/// Wire view of a message for real-time push payloads.
///
/// Field names match the REST message representation so a client can
/// treat pushed and fetched messages uniformly.
pub(crate) fn message_push_payload(message: &Message) -> serde_json::Value {
    serde_json::json!({
        "id": message.id(),
        "conversationId": message.conversation_id(),
        "senderId": message.sender_id(),
        "receiverId": message.receiver_id(),
        "content": message.content(),
        "isRead": message.is_read(),
        "createdAt": message.created_at(),
    })
}
