//! Protocol error types.

use thiserror::Error;

/// Result alias for wire operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding wire payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload could not be serialized to JSON.
    #[error("json encode failed: {0}")]
    Encode(String),

    /// Payload was not valid JSON for the expected type.
    #[error("json decode failed: {0}")]
    Decode(String),

    /// Room identifiers must contain at least one non-whitespace character.
    #[error("room id must not be empty")]
    EmptyRoomId,
}
