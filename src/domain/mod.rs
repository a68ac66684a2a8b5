//! Domain layer - value objects, aggregates, and domain errors.

pub mod foundation;
pub mod messaging;
pub mod notification;
