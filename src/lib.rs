//! Commons Backend - Community messaging and presence core
//!
//! Implements the real-time subsystem of a community platform: two-party
//! conversations with read-state tracking, an in-process presence registry,
//! and best-effort event fan-out to connected clients.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
