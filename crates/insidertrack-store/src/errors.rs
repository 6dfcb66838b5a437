//! Error helpers for insidertrack-store
//!
//! Wraps the core `ExError` with store-specific constructors.

use insidertrack_core::errors::{ExError, ExErrorKind};
use insidertrack_core::EntityKey;

pub use insidertrack_core::errors::io_error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// A stored document exists but cannot be decoded
pub fn corrupt_document(operation: &str, key: &EntityKey, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_entity_key(key.as_str())
        .with_message(format!("stored document is unreadable: {}", err))
}

/// A document could not be encoded for writing
pub fn encode_failed(operation: &str, key: &EntityKey, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_entity_key(key.as_str())
        .with_message(format!("failed to encode document: {}", err))
}

/// A history record id that does not exist
pub fn history_missing(key: &EntityKey, id: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("read_history")
        .with_entity_key(key.as_str())
        .with_message(format!("history record {} not found", id))
}
