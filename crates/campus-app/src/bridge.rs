//! Bridge between App and the realtime channel.
//!
//! The Bridge owns the [`Channel`] state machine for the current session and
//! translates in both directions:
//!
//! - [`AppAction`]s that concern the channel become [`ChannelEvent`]s, and the
//!   resulting [`ChannelAction`]s become [`TransportCommand`]s for the driver.
//! - Transport notifications become [`ChannelEvent`]s, and delivered frames and
//!   state changes become [`AppEvent`]s for the App.
//!
//! Everything is tagged with the [`SessionId`] the channel was opened for.
//! Notifications from any other session are dropped here, before they reach
//! the App.

use campus_client::{Channel, ChannelAction, ChannelEvent, ConnectionState};
use campus_proto::RoomId;

use crate::{AppAction, AppEvent, SessionId};

/// Instructions for the driver's transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Start a channel for `room_id`. Replaces any running channel.
    Connect {
        /// Session the channel belongs to.
        session: SessionId,
        /// Room to connect to.
        room_id: RoomId,
    },
    /// Write an encoded frame. Fire-and-forget.
    Transmit {
        /// Session the channel belongs to.
        session: SessionId,
        /// Encoded frame.
        text: String,
    },
    /// Stop the channel and release the socket.
    Release {
        /// Session the channel belongs to.
        session: SessionId,
    },
}

/// Bridge between App and Channel.
#[derive(Debug, Default)]
pub struct Bridge {
    /// Channel of the current session.
    channel: Option<(SessionId, Channel)>,
    /// Commands for the driver.
    outgoing: Vec<TransportCommand>,
}

impl Bridge {
    /// Create a bridge with no channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session of the current channel.
    pub fn session(&self) -> Option<SessionId> {
        self.channel.as_ref().map(|(session, _)| *session)
    }

    /// State of the current channel.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.channel.as_ref().map(|(_, channel)| channel.state())
    }

    /// Process an App action and return events for the App.
    ///
    /// Actions that do not concern the channel return no events.
    pub fn process_app_action<I: Copy>(&mut self, action: AppAction, now: I) -> Vec<AppEvent<I>> {
        match action {
            AppAction::OpenChannel { session, room_id } => {
                let mut events = self.release_current(now);
                let (channel, actions) = Channel::open(room_id);
                self.channel = Some((session, channel));
                events.extend(self.apply(session, actions, now));
                events
            },
            AppAction::SendFrame { session, frame } => {
                self.feed(session, ChannelEvent::Send(frame), now)
            },
            AppAction::CloseChannel { session } => {
                if self.session() != Some(session) {
                    return vec![];
                }
                self.release_current(now)
            },
            AppAction::Render
            | AppAction::Quit
            | AppAction::FetchRooms
            | AppAction::FetchHistory { .. } => vec![],
        }
    }

    /// Process a transport notification for `session`.
    pub fn handle_channel_event<I: Copy>(
        &mut self,
        session: SessionId,
        event: ChannelEvent,
        now: I,
    ) -> Vec<AppEvent<I>> {
        self.feed(session, event, now)
    }

    /// Take pending transport commands.
    pub fn take_outgoing(&mut self) -> Vec<TransportCommand> {
        std::mem::take(&mut self.outgoing)
    }

    fn feed<I: Copy>(&mut self, session: SessionId, event: ChannelEvent, now: I) -> Vec<AppEvent<I>> {
        let Some((current, channel)) = self.channel.as_mut() else {
            return vec![];
        };
        if *current != session {
            tracing::debug!(%session, current = %*current, "dropping event for stale channel");
            return vec![];
        }

        match channel.handle(event) {
            Ok(actions) => self.apply(session, actions, now),
            Err(e) => {
                tracing::warn!(%session, error = %e, "channel rejected event");
                vec![AppEvent::Error { message: e.to_string() }]
            },
        }
    }

    /// Close and forget the current channel.
    fn release_current<I: Copy>(&mut self, now: I) -> Vec<AppEvent<I>> {
        let Some((session, mut channel)) = self.channel.take() else {
            return vec![];
        };
        match channel.handle(ChannelEvent::Close) {
            Ok(actions) => self.apply(session, actions, now),
            Err(e) => {
                tracing::warn!(%session, error = %e, "failed to close channel");
                self.outgoing.push(TransportCommand::Release { session });
                vec![]
            },
        }
    }

    fn apply<I: Copy>(
        &mut self,
        session: SessionId,
        actions: Vec<ChannelAction>,
        now: I,
    ) -> Vec<AppEvent<I>> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ChannelAction::Connect { room_id } => {
                    self.outgoing.push(TransportCommand::Connect { session, room_id });
                },
                ChannelAction::Transmit(text) => {
                    self.outgoing.push(TransportCommand::Transmit { session, text });
                },
                ChannelAction::Deliver(frame) => {
                    events.push(AppEvent::FrameReceived { session, frame, received_at: now });
                },
                ChannelAction::StateChanged(state) => {
                    events.push(AppEvent::ConnectionChanged { session, state });
                },
                ChannelAction::Release => {
                    self.outgoing.push(TransportCommand::Release { session });
                },
            }
        }

        events
    }
}
