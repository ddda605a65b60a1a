//! REST collaborator records and response normalization.
//!
//! The backend returns collections in two shapes:
//!
//! ```text
//! [ {...}, {...} ]                  bare array
//! { "rooms": [ {...}, {...} ] }     enveloped (also "messages" / "items")
//! ```
//!
//! [`Listing`] accepts both and anything else, so callers normalize once with
//! [`Listing::into_items`] and never inspect response shapes themselves.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned, de::IgnoredAny};

use crate::{ProtocolError, Result, RoomId, WireId};

/// Collection response in any shape the backend is known to produce.
///
/// Elements are decoded one by one: a record that does not fit `T` is
/// skipped without discarding its neighbours.
#[derive(Debug, Deserialize)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned"))]
pub enum Listing<T> {
    /// Bare JSON array.
    Bare(Vec<Entry<T>>),
    /// Object wrapping the array.
    Enveloped(Envelope<T>),
    /// Any other JSON value. Normalizes to an empty collection.
    Unrecognized(IgnoredAny),
}

/// Envelope object around a collection.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    /// Wrapped items. Absent field means empty.
    #[serde(default = "Vec::new", alias = "rooms", alias = "messages")]
    items: Vec<Entry<T>>,
}

/// One collection element, `None` if it did not decode as `T`.
#[derive(Debug)]
pub struct Entry<T>(Option<T>);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(serde_json::from_value(value).ok()))
    }
}

impl<T> Listing<T> {
    fn entries(&self) -> &[Entry<T>] {
        match self {
            Self::Bare(entries) | Self::Enveloped(Envelope { items: entries }) => entries,
            Self::Unrecognized(_) => &[],
        }
    }

    /// Collapse any shape into the ordered sequence of decodable items.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(entries) | Self::Enveloped(Envelope { items: entries }) => {
                entries.into_iter().filter_map(|Entry(item)| item).collect()
            },
            Self::Unrecognized(_) => Vec::new(),
        }
    }

    /// Whether the response matched a known shape.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Number of elements that were present but did not decode.
    pub fn skipped(&self) -> usize {
        self.entries().iter().filter(|Entry(item)| item.is_none()).count()
    }
}

impl<T: DeserializeOwned> Listing<T> {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Decode` only if the body is not JSON at all. Valid JSON
    ///   of an unexpected shape yields [`Listing::Unrecognized`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

/// `null` reads as the default value.
fn null_as_default<'de, D, V>(deserializer: D) -> std::result::Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    Ok(Option::<V>::deserialize(deserializer)?.unwrap_or_default())
}

/// Room entry from `GET /chat/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room token.
    pub id: RoomId,
    /// Counterparty display name.
    #[serde(default)]
    pub user: Option<String>,
    /// Preview of the latest message.
    #[serde(default)]
    pub last_message: Option<String>,
    /// ISO-8601 time of the latest activity.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RoomSummary {
    /// Name to show for this room, falling back to `Room {id}`.
    pub fn display_name(&self) -> String {
        match self.user.as_deref() {
            Some(user) if !user.is_empty() => user.to_string(),
            _ => format!("Room {}", self.id),
        }
    }

    /// Preview line, falling back to `No messages yet`.
    pub fn preview(&self) -> &str {
        match self.last_message.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => "No messages yet",
        }
    }
}

/// Message entry from `GET /chat/rooms/{roomId}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Option<WireId>,
    /// Sender label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    /// Message text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// ISO-8601 creation time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}
