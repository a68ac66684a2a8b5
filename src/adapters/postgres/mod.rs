//! PostgreSQL adapters - sqlx implementations of the persistence ports.

mod conversation_repository;
mod message_repository;

pub use conversation_repository::PostgresConversationRepository;
pub use message_repository::PostgresMessageRepository;
