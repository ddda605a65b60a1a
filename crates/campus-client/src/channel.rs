//! Realtime channel state machine.
//!
//! Owns the lifecycle of a single channel bound to one room. Uses the action
//! pattern: transport notifications and application intents go in as
//! [`ChannelEvent`]s, instructions for the transport come out as
//! [`ChannelAction`]s.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐  Opened   ┌──────┐
//! │ Connecting │──────────>│ Open │
//! └────────────┘           └──────┘
//!       │                     │
//!       │ Failed / Close      │ Failed → Errored
//!       ↓                     ↓ Closed / Close → Closed
//!  ┌──────────────────────────────┐
//!  │ Closed | Errored  (terminal) │
//!  └──────────────────────────────┘
//! ```
//!
//! Terminal states are final for the instance. Reconnecting means building a
//! fresh [`Channel`] with [`Channel::open`].

use campus_proto::{ChannelFrame, RoomId};

use crate::ChannelError;

/// Channel lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Channel established. The only state in which frames flow.
    Open,
    /// Channel closed by either side.
    Closed,
    /// Transport failed.
    Errored,
}

impl ConnectionState {
    /// Frames can be sent and received.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

/// Events the caller feeds into the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Transport completed the handshake.
    Opened,

    /// Text frame received from the transport.
    Received(String),

    /// Transport reported an error or failed to connect.
    Failed {
        /// Transport error description.
        reason: String,
    },

    /// Peer closed the channel.
    Closed,

    /// Application wants to transmit a frame.
    Send(ChannelFrame),

    /// Application is tearing the channel down.
    Close,
}

/// Actions the channel produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    /// Start the transport handshake for this room.
    Connect {
        /// Room the channel is scoped to.
        room_id: RoomId,
    },

    /// Write this text frame to the transport.
    Transmit(String),

    /// Hand a recognized inbound frame to the consumer.
    ///
    /// Only [`ChannelFrame::Message`] and [`ChannelFrame::Typing`] are ever
    /// delivered.
    Deliver(ChannelFrame),

    /// Lifecycle transition the UI should reflect.
    StateChanged(ConnectionState),

    /// Release the transport. Emitted exactly once per instance.
    Release,
}

/// A realtime channel scoped to one room.
///
/// Pure state machine: no I/O, no timers. The caller owns the transport.
#[derive(Debug, Clone)]
pub struct Channel {
    room_id: RoomId,
    state: ConnectionState,
}

impl Channel {
    /// Construct a channel in [`ConnectionState::Connecting`].
    ///
    /// Returns the channel and the actions that start the handshake.
    pub fn open(room_id: RoomId) -> (Self, Vec<ChannelAction>) {
        let actions = vec![
            ChannelAction::StateChanged(ConnectionState::Connecting),
            ChannelAction::Connect { room_id: room_id.clone() },
        ];
        tracing::debug!(%room_id, "opening channel");
        (Self { room_id, state: ConnectionState::Connecting }, actions)
    }

    /// Room this channel is bound to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// `true` only while [`ConnectionState::Open`].
    pub fn is_connected(&self) -> bool {
        self.state.is_open()
    }

    /// Process an event and return actions.
    ///
    /// Sends while not open and events arriving after a terminal state are
    /// silently dropped. Neither is an error.
    ///
    /// # Errors
    ///
    /// - `ChannelError::InvalidState` if the transport reports a second
    ///   successful handshake on an open channel.
    pub fn handle(&mut self, event: ChannelEvent) -> Result<Vec<ChannelAction>, ChannelError> {
        match event {
            ChannelEvent::Opened => self.handle_opened(),
            ChannelEvent::Received(text) => Ok(self.handle_received(&text)),
            ChannelEvent::Failed { reason } => {
                if self.state.is_terminal() {
                    return Ok(vec![]);
                }
                tracing::warn!(room_id = %self.room_id, %reason, "channel failed");
                Ok(self.terminate(ConnectionState::Errored))
            },
            ChannelEvent::Closed | ChannelEvent::Close => {
                if self.state.is_terminal() {
                    return Ok(vec![]);
                }
                tracing::debug!(room_id = %self.room_id, "channel closed");
                Ok(self.terminate(ConnectionState::Closed))
            },
            ChannelEvent::Send(frame) => Ok(self.handle_send(&frame)),
        }
    }

    fn handle_opened(&mut self) -> Result<Vec<ChannelAction>, ChannelError> {
        match self.state {
            ConnectionState::Connecting => {
                self.state = ConnectionState::Open;
                tracing::debug!(room_id = %self.room_id, "channel open");
                Ok(vec![ChannelAction::StateChanged(ConnectionState::Open)])
            },
            // Handshake finished after teardown; transport is already released
            ConnectionState::Closed | ConnectionState::Errored => Ok(vec![]),
            ConnectionState::Open => {
                Err(ChannelError::InvalidState { state: self.state, operation: "open" })
            },
        }
    }

    fn handle_received(&self, text: &str) -> Vec<ChannelAction> {
        if !self.state.is_open() {
            tracing::debug!(room_id = %self.room_id, state = ?self.state, "dropping frame");
            return vec![];
        }

        match ChannelFrame::decode(text) {
            Ok(ChannelFrame::Unknown) => {
                tracing::debug!(room_id = %self.room_id, "ignoring unknown frame kind");
                vec![]
            },
            Ok(frame) => vec![ChannelAction::Deliver(frame)],
            Err(e) => {
                tracing::warn!(room_id = %self.room_id, error = %e, "malformed frame");
                vec![]
            },
        }
    }

    fn handle_send(&self, frame: &ChannelFrame) -> Vec<ChannelAction> {
        if !self.state.is_open() {
            return vec![];
        }

        match frame.encode() {
            Ok(text) => vec![ChannelAction::Transmit(text)],
            Err(e) => {
                tracing::warn!(room_id = %self.room_id, error = %e, "failed to encode frame");
                vec![]
            },
        }
    }

    fn terminate(&mut self, state: ConnectionState) -> Vec<ChannelAction> {
        self.state = state;
        vec![ChannelAction::StateChanged(state), ChannelAction::Release]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_channel() -> Channel {
        let (mut channel, _) = Channel::open(RoomId::from(1));
        channel.handle(ChannelEvent::Opened).unwrap();
        channel
    }

    #[test]
    fn open_requests_connect() {
        let (channel, actions) = Channel::open(RoomId::from(7));

        assert_eq!(channel.state(), ConnectionState::Connecting);
        assert!(matches!(actions.as_slice(), [
            ChannelAction::StateChanged(ConnectionState::Connecting),
            ChannelAction::Connect { .. }
        ]));
    }

    #[test]
    fn handshake_opens() {
        let channel = open_channel();
        assert!(channel.is_connected());
    }

    #[test]
    fn second_handshake_is_invalid() {
        let mut channel = open_channel();
        let result = channel.handle(ChannelEvent::Opened);
        assert!(matches!(result, Err(ChannelError::InvalidState { .. })));
    }

    #[test]
    fn handshake_failure_errors_and_releases() {
        let (mut channel, _) = Channel::open(RoomId::from(1));
        let actions =
            channel.handle(ChannelEvent::Failed { reason: "refused".into() }).unwrap();

        assert_eq!(channel.state(), ConnectionState::Errored);
        assert_eq!(actions, vec![
            ChannelAction::StateChanged(ConnectionState::Errored),
            ChannelAction::Release
        ]);
    }

    #[test]
    fn send_while_connecting_is_noop() {
        let (mut channel, _) = Channel::open(RoomId::from(1));
        let actions = channel.handle(ChannelEvent::Send(ChannelFrame::typing("You"))).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn send_while_open_transmits() {
        let mut channel = open_channel();
        let actions = channel.handle(ChannelEvent::Send(ChannelFrame::typing("You"))).unwrap();
        assert_eq!(actions, vec![ChannelAction::Transmit(r#"{"type":"typing","user":"You"}"#.into())]);
    }

    #[test]
    fn inbound_message_delivered() {
        let mut channel = open_channel();
        let actions = channel
            .handle(ChannelEvent::Received(
                r#"{"type":"message","content":"hi","sender":"Alice","timestamp":"t"}"#.into(),
            ))
            .unwrap();

        assert!(matches!(actions.as_slice(), [ChannelAction::Deliver(ChannelFrame::Message(m))] if m.content == "hi"));
    }

    #[test]
    fn unknown_and_malformed_frames_ignored() {
        let mut channel = open_channel();
        let unknown = channel.handle(ChannelEvent::Received(r#"{"type":"presence"}"#.into()));
        let garbage = channel.handle(ChannelEvent::Received("not json".into()));

        assert_eq!(unknown, Ok(vec![]));
        assert_eq!(garbage, Ok(vec![]));
        assert!(channel.is_connected());
    }

    #[test]
    fn frames_after_close_dropped() {
        let mut channel = open_channel();
        channel.handle(ChannelEvent::Close).unwrap();

        let actions = channel
            .handle(ChannelEvent::Received(r#"{"type":"typing","user":"Alice"}"#.into()))
            .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn close_releases_once() {
        let mut channel = open_channel();
        let first = channel.handle(ChannelEvent::Close).unwrap();
        let second = channel.handle(ChannelEvent::Close).unwrap();
        let late_error = channel.handle(ChannelEvent::Failed { reason: "reset".into() }).unwrap();

        assert!(first.contains(&ChannelAction::Release));
        assert!(second.is_empty());
        assert!(late_error.is_empty());
        assert_eq!(channel.state(), ConnectionState::Closed);
    }

    #[test]
    fn late_handshake_after_close_ignored() {
        let (mut channel, _) = Channel::open(RoomId::from(1));
        channel.handle(ChannelEvent::Close).unwrap();

        assert_eq!(channel.handle(ChannelEvent::Opened), Ok(vec![]));
        assert_eq!(channel.state(), ConnectionState::Closed);
    }
}
