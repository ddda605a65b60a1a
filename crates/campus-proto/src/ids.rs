//! Identifiers as they appear on the wire.
//!
//! The backend is unversioned and emits identifiers as JSON numbers in some
//! responses and strings in others. Both are accepted.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ProtocolError, Result};

/// Identifier exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    /// Numeric identifier.
    Number(u64),
    /// Opaque string identifier.
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Opaque room token.
///
/// # Invariants
///
/// - Never empty or whitespace-only. Enforced by [`RoomId::new`] and by
///   deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room id, rejecting empty tokens.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ProtocolError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    /// Token as a string slice, suitable for URL path segments.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for RoomId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = WireId::deserialize(deserializer)?;
        Self::new(id.to_string()).map_err(serde::de::Error::custom)
    }
}
