//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRepository` / `MessageRepository` - persistence contracts
//! - `PresenceRegistry` - live connection tracking for real-time delivery
//! - `TokenVerifier` - black-box bearer token verification

mod conversation_repository;
mod message_repository;
mod presence_registry;
mod token_verifier;

pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;
pub use presence_registry::{ConnectionHandle, ConnectionId, PresenceRegistry, PushEvent};
pub use token_verifier::TokenVerifier;
