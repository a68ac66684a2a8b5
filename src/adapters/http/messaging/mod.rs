//! HTTP adapter for the messaging module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MessagingHandlers;
pub use routes::{conversation_routes, message_routes};
