//! Adapters - implementations of the ports for concrete technologies.
//!
//! - `auth` - token verification (JWT, mock)
//! - `http` - axum routers, handlers, and middleware
//! - `memory` - in-memory stores for tests and local runs
//! - `postgres` - sqlx repositories
//! - `websocket` - real-time channel

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;
