//! WebSocket adapters - real-time channel plumbing.
//!
//! - `presence` - in-memory registry of online users
//! - `messages` - wire protocol frames
//! - `handler` - axum upgrade handler and connection loop
//!
//! Event fan-out lives in `application::EventDispatcher`; this module
//! owns the socket lifecycle around it.

mod handler;
mod messages;
mod presence;

pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientFrame, ServerFrame};
pub use presence::InMemoryPresenceRegistry;
