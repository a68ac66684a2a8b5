//! In-memory adapters - lock-guarded stores for tests and local runs.

mod conversation_repository;
mod message_repository;

pub use conversation_repository::InMemoryConversationRepository;
pub use message_repository::InMemoryMessageRepository;
