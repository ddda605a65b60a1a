//! Observable conversation state.
//!
//! These types are the view model the presentation layer reads: the ordered
//! message log of the active room, the transient typing signal, and the room
//! list.

use std::{ops::Sub, time::Duration};

use campus_proto::{MessageFrame, MessageRecord, RoomId, RoomSummary, WireId, timestamp};
use uuid::Uuid;

/// Identifier of a message in the log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Assigned by the server.
    Server(WireId),
    /// Assigned on append for realtime and locally originated messages.
    Local {
        /// Log length after the append. Stable rendering key within a room.
        seq: usize,
        /// Random token, unique across rooms and server ids.
        token: Uuid,
    },
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{id}"),
            Self::Local { seq, .. } => write!(f, "{seq}"),
        }
    }
}

/// A message in the active room's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Sender label.
    pub sender: String,
    /// Text content.
    pub content: String,
    /// ISO-8601 creation time as received.
    pub timestamp: String,
}

impl Message {
    /// Sent by this client's user.
    pub fn is_own(&self, self_label: &str) -> bool {
        self.sender == self_label
    }

    /// Creation time as local wall-clock `HH:MM`. `None` if the timestamp is
    /// missing or invalid.
    pub fn local_time(&self) -> Option<String> {
        timestamp::local_clock(&self.timestamp)
    }
}

/// Append-only message log for one room.
///
/// Messages are never reordered and never changed after they are appended.
/// The whole log is replaced only by a history load or emptied by
/// [`MessageStore::clear`].
#[derive(Debug, Clone)]
pub struct MessageStore {
    room_id: RoomId,
    messages: Vec<Message>,
}

impl MessageStore {
    /// Empty log for `room_id`.
    pub fn new(room_id: RoomId) -> Self {
        Self { room_id, messages: Vec::new() }
    }

    /// Room this log belongs to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replace the log with a history page, keeping server order.
    ///
    /// Records without a server id get a local id from their position.
    pub fn load_history(&mut self, records: Vec<MessageRecord>) {
        self.messages = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Message {
                id: record.id.map_or_else(
                    || MessageId::Local { seq: index + 1, token: Uuid::new_v4() },
                    MessageId::Server,
                ),
                room_id: self.room_id.clone(),
                sender: record.sender,
                content: record.content,
                timestamp: record.timestamp,
            })
            .collect();
    }

    /// Append a message to the end of the log.
    ///
    /// A frame carrying a server id keeps it; otherwise the message gets
    /// [`MessageId::Local`] with `seq` equal to the new length.
    pub fn append(&mut self, frame: MessageFrame) -> &Message {
        let seq = self.messages.len() + 1;
        let id = frame
            .id
            .map_or_else(|| MessageId::Local { seq, token: Uuid::new_v4() }, MessageId::Server);

        self.messages.push(Message {
            id,
            room_id: self.room_id.clone(),
            sender: frame.sender,
            content: frame.content,
            timestamp: frame.timestamp,
        });
        &self.messages[seq - 1]
    }

    /// Empty the log.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Transient "someone is typing" flag with a single debounced timer.
///
/// Each [`TypingSignal::signal`] restarts the window, so the flag drops
/// `timeout` after the most recent signal, not the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSignal<I> {
    since: Option<I>,
}

impl<I> Default for TypingSignal<I> {
    fn default() -> Self {
        Self { since: None }
    }
}

impl<I> TypingSignal<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Inactive signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote user is typing.
    pub fn is_active(&self) -> bool {
        self.since.is_some()
    }

    /// Raise the flag and restart the window at `now`.
    pub fn signal(&mut self, now: I) {
        self.since = Some(now);
    }

    /// Drop the flag if `timeout` has elapsed since the last signal.
    ///
    /// Returns `true` if the flag changed.
    pub fn expire(&mut self, now: I, timeout: Duration) -> bool {
        match self.since {
            Some(since) if now >= since && now - since >= timeout => {
                self.since = None;
                true
            },
            _ => false,
        }
    }

    /// Drop the flag immediately.
    pub fn clear(&mut self) {
        self.since = None;
    }
}

/// Room list as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomList {
    /// First fetch has not resolved.
    #[default]
    Loading,
    /// Fetched rooms in server order. May be empty.
    Ready(Vec<RoomSummary>),
}

impl RoomList {
    /// Still waiting for the first fetch.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Rooms, empty while loading.
    pub fn rooms(&self) -> &[RoomSummary] {
        match self {
            Self::Loading => &[],
            Self::Ready(rooms) => rooms,
        }
    }
}

/// Connection banner shown while the channel is not open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Handshake in progress.
    Connecting,
    /// Channel closed or failed. Sends stay local.
    Disconnected,
}

impl Banner {
    /// Text shown to the user.
    pub fn text(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting to chat...",
            Self::Disconnected => "Disconnected. Messages will not be delivered until you reconnect.",
        }
    }
}
