//! Realtime channel frames.
//!
//! Every frame is a JSON object whose `type` field selects the kind:
//!
//! ```text
//! {"type":"message","content":"hi","sender":"Alice","timestamp":"..."}
//! {"type":"typing","user":"Alice"}
//! ```
//!
//! The same envelope is used in both directions. Kinds this client does not
//! understand decode to [`ChannelFrame::Unknown`] so that newer servers can add
//! kinds without breaking older clients.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Result, WireId, timestamp};

/// A single payload exchanged over the realtime channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelFrame {
    /// Chat message.
    Message(MessageFrame),
    /// Remote party is typing.
    Typing(TypingFrame),
    /// Any kind this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Body of a `message` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFrame {
    /// Message text.
    pub content: String,
    /// Sender label.
    #[serde(default)]
    pub sender: String,
    /// ISO-8601 creation time.
    #[serde(default)]
    pub timestamp: String,
    /// Server-assigned id, when the server echoes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
}

/// Body of a `typing` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingFrame {
    /// Label of the party that is typing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ChannelFrame {
    /// Outgoing chat message stamped with the current time.
    pub fn message(content: impl Into<String>, sender: impl Into<String>) -> Self {
        Self::Message(MessageFrame {
            content: content.into(),
            sender: sender.into(),
            timestamp: timestamp::now(),
            id: None,
        })
    }

    /// Outgoing typing notification.
    pub fn typing(user: impl Into<String>) -> Self {
        Self::Typing(TypingFrame { user: Some(user.into()) })
    }

    /// Wire discriminator for this frame.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Typing(_) => "typing",
            Self::Unknown => "unknown",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a JSON text frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Decode` if the text is not JSON, has no `type` field,
    ///   or a recognized kind is missing required fields.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
