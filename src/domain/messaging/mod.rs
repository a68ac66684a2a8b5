//! Messaging domain - conversations, messages, and read state.

mod conversation;
mod error;
mod message;

pub use conversation::{Conversation, ParticipantPair};
pub use error::MessagingError;
pub use message::Message;
