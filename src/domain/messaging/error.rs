//! Messaging-specific error types.
//!
//! Note the deliberate conflation: "conversation/message absent" and
//! "requester is not a participant" both surface as `NotFound`, so an
//! outsider cannot probe whether a conversation between two other users
//! exists.

use crate::domain::foundation::{DomainError, ErrorCode};

/// Messaging-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// Conversation or message absent, or requester not a participant.
    NotFound,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl MessagingError {
    pub fn not_found() -> Self {
        MessagingError::NotFound
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MessagingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MessagingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            MessagingError::NotFound => ErrorCode::ConversationNotFound,
            MessagingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MessagingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            MessagingError::NotFound => "Not found".to_string(),
            MessagingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MessagingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for MessagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MessagingError {}

impl From<DomainError> for MessagingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConversationNotFound | ErrorCode::MessageNotFound => {
                MessagingError::NotFound
            }
            // Receiver-only operations attempted by another user are reported
            // as NotFound, never Forbidden.
            ErrorCode::Forbidden => MessagingError::NotFound,
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                MessagingError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => MessagingError::Infrastructure(err.to_string()),
        }
    }
}
