//! Application layer - orchestration between the HTTP/WebSocket surface
//! and the domain, plus real-time event fan-out.

mod dispatcher;
pub mod handlers;

pub use dispatcher::EventDispatcher;
