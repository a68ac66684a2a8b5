//! HTTP adapters - axum routers, handlers, DTOs, and middleware.

pub mod messaging;
pub mod middleware;
