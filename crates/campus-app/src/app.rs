//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the conversation
//! view completely decoupled from I/O and channel mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! user intents and produces [`crate::AppAction`] instructions for the runtime
//! to execute.
//!
//! # Responsibilities
//!
//! - Tracks the room list and the selected room.
//! - Owns the active room's message log and typing signal.
//! - Sequences each room selection: history fetch first, channel second.
//! - Tracks the channel state reported by the bridge for the banner.
//! - Discards results that belong to an earlier selection.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use campus_client::ConnectionState;
use campus_proto::{ChannelFrame, MessageFrame, MessageRecord, RoomId, RoomSummary, timestamp};

use crate::{
    AppAction, AppEvent, Banner, ChatConfig, DataSource, Message, MessageStore, RoomList,
    SessionId, TypingSignal, fixtures,
};

/// State of the selected room.
#[derive(Debug, Clone)]
pub struct Conversation<I> {
    /// Selection the state belongs to.
    session: SessionId,
    /// Ordered message log.
    store: MessageStore,
    /// Remote typing indicator.
    typing: TypingSignal<I>,
    /// History fetch has resolved, successfully or not.
    history_loaded: bool,
    /// Channel state. `None` until the channel is requested.
    connection: Option<ConnectionState>,
}

impl<I> Conversation<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    fn new(session: SessionId, room_id: RoomId) -> Self {
        Self {
            session,
            store: MessageStore::new(room_id),
            typing: TypingSignal::new(),
            history_loaded: false,
            connection: None,
        }
    }

    /// Selected room.
    pub fn room_id(&self) -> &RoomId {
        self.store.room_id()
    }

    /// Current session.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Message log in arrival order.
    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// Remote party is typing.
    pub fn is_typing(&self) -> bool {
        self.typing.is_active()
    }

    /// History fetch still in flight.
    pub fn is_loading(&self) -> bool {
        !self.history_loaded
    }

    /// Channel state, if a channel was requested.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.connection
    }
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies. Time is supplied by the caller, so tests can drive
/// the typing window with any instant type.
#[derive(Debug, Clone)]
pub struct App<I = Instant> {
    /// Injected configuration.
    config: ChatConfig,
    /// Room list.
    rooms: RoomList,
    /// Selected room. `None` until the user picks one.
    conversation: Option<Conversation<I>>,
    /// Next session to hand out.
    next_session: SessionId,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl<I> App<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an App with nothing selected and rooms not yet loaded.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            rooms: RoomList::Loading,
            conversation: None,
            next_session: SessionId::first(),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent<I>) -> Vec<AppAction> {
        match event {
            AppEvent::Tick { now } => {
                let timeout = self.config.typing_timeout;
                let expired =
                    self.conversation.as_mut().is_some_and(|c| c.typing.expire(now, timeout));
                if expired { vec![AppAction::Render] } else { vec![] }
            },
            AppEvent::Resize => vec![AppAction::Render],
            AppEvent::RoomsLoaded { rooms } => {
                tracing::debug!(count = rooms.len(), "rooms loaded");
                self.rooms = RoomList::Ready(rooms);
                vec![AppAction::Render]
            },
            AppEvent::RoomsFailed { reason } => {
                tracing::warn!(%reason, "room list fetch failed");
                if self.rooms.is_loading() {
                    self.rooms = RoomList::Ready(Vec::new());
                }
                self.status_message = Some(format!("Could not load chats: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::HistoryLoaded { session, messages } => self.history_resolved(session, messages),
            AppEvent::HistoryFailed { session, reason } => {
                if self.current(session).is_some() {
                    tracing::warn!(%session, %reason, "history fetch failed");
                    self.status_message = Some(format!("Could not load messages: {reason}"));
                }
                self.history_resolved(session, Vec::new())
            },
            AppEvent::ConnectionChanged { session, state } => {
                let Some(conversation) = self.current(session) else {
                    return vec![];
                };
                conversation.connection = Some(state);
                if state == ConnectionState::Errored {
                    self.status_message = Some("Connection lost".to_string());
                }
                vec![AppAction::Render]
            },
            AppEvent::FrameReceived { session, frame, received_at } => {
                let Some(conversation) = self.current(session) else {
                    return vec![];
                };
                match frame {
                    ChannelFrame::Message(body) => {
                        conversation.store.append(body);
                        vec![AppAction::Render]
                    },
                    ChannelFrame::Typing(_) => {
                        conversation.typing.signal(received_at);
                        vec![AppAction::Render]
                    },
                    ChannelFrame::Unknown => vec![],
                }
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Load (or reload) the room list.
    pub fn load_rooms(&mut self) -> Vec<AppAction> {
        match self.config.source {
            DataSource::Fixtures => {
                self.rooms = RoomList::Ready(fixtures::rooms());
                vec![AppAction::Render]
            },
            DataSource::Remote => vec![AppAction::FetchRooms, AppAction::Render],
        }
    }

    /// Switch the conversation to `room_id`.
    ///
    /// Tears down the previous room's channel, starts a new session with an
    /// empty log and requests its history. The channel is opened once the
    /// history resolves. Selecting the room that is already active does
    /// nothing.
    pub fn select_room(&mut self, room_id: RoomId) -> Vec<AppAction> {
        if self.active_room() == Some(&room_id) {
            return vec![];
        }

        let mut actions = self.close_conversation();
        let session = self.allocate_session();
        let mut conversation = Conversation::new(session, room_id.clone());
        tracing::debug!(%session, %room_id, "room selected");

        match self.config.source {
            DataSource::Fixtures => {
                conversation.store.load_history(fixtures::messages());
                conversation.history_loaded = true;
            },
            DataSource::Remote => actions.push(AppAction::FetchHistory {
                session,
                room_id,
                page: self.config.page,
                page_size: self.config.page_size,
            }),
        }

        self.conversation = Some(conversation);
        actions.push(AppAction::Render);
        actions
    }

    /// Select the room after the active one, wrapping around.
    pub fn select_next_room(&mut self) -> Vec<AppAction> {
        self.cycle_room(true)
    }

    /// Select the room before the active one, wrapping around.
    pub fn select_previous_room(&mut self) -> Vec<AppAction> {
        self.cycle_room(false)
    }

    /// Submit composer text.
    ///
    /// Whitespace-only text is ignored. Otherwise the message is appended to
    /// the log immediately, then handed to the channel, which drops it unless
    /// open. Sending never fails.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        if text.trim().is_empty() {
            return vec![];
        }
        let Some(conversation) = self.conversation.as_mut() else {
            self.status_message = Some("Select a chat to start messaging".to_string());
            return vec![AppAction::Render];
        };

        let body = MessageFrame {
            content: text.to_string(),
            sender: self.config.self_label.clone(),
            timestamp: timestamp::now(),
            id: None,
        };
        conversation.store.append(body.clone());

        let mut actions = Vec::with_capacity(2);
        if conversation.connection.is_some() {
            actions.push(AppAction::SendFrame {
                session: conversation.session,
                frame: ChannelFrame::Message(body),
            });
        }
        actions.push(AppAction::Render);
        actions
    }

    /// The composer changed. Sends a typing frame while the channel is open.
    pub fn notify_typing(&mut self) -> Vec<AppAction> {
        match &self.conversation {
            Some(c) if c.connection == Some(ConnectionState::Open) => vec![AppAction::SendFrame {
                session: c.session,
                frame: ChannelFrame::typing(self.config.self_label.clone()),
            }],
            _ => vec![],
        }
    }

    /// Open a fresh channel after the previous one closed or failed.
    ///
    /// The log is kept. Frames missed while disconnected are not replayed.
    /// Does nothing unless the channel is in a terminal state.
    pub fn reconnect(&mut self) -> Vec<AppAction> {
        let can_reconnect = self
            .conversation
            .as_ref()
            .and_then(|c| c.connection)
            .is_some_and(ConnectionState::is_terminal);
        if !can_reconnect {
            return vec![];
        }

        let session = self.allocate_session();
        let Some(conversation) = self.conversation.as_mut() else {
            return vec![];
        };
        let previous = std::mem::replace(&mut conversation.session, session);
        conversation.connection = Some(ConnectionState::Connecting);
        conversation.typing.clear();
        tracing::debug!(%previous, %session, "reconnecting");

        self.status_message = Some("Reconnecting...".to_string());
        vec![
            AppAction::CloseChannel { session: previous },
            AppAction::OpenChannel { session, room_id: conversation.room_id().clone() },
            AppAction::Render,
        ]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Configuration the App was built with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Label used for own messages.
    pub fn self_label(&self) -> &str {
        &self.config.self_label
    }

    /// Room list state.
    pub fn room_list(&self) -> &RoomList {
        &self.rooms
    }

    /// Rooms in server order. Empty while loading.
    pub fn rooms(&self) -> &[RoomSummary] {
        self.rooms.rooms()
    }

    /// Selected room.
    pub fn active_room(&self) -> Option<&RoomId> {
        self.conversation.as_ref().map(Conversation::room_id)
    }

    /// Selected room's state.
    pub fn conversation(&self) -> Option<&Conversation<I>> {
        self.conversation.as_ref()
    }

    /// Active room's log. Empty with nothing selected.
    pub fn messages(&self) -> &[Message] {
        self.conversation.as_ref().map(Conversation::messages).unwrap_or_default()
    }

    /// Remote party is typing in the active room.
    pub fn is_typing(&self) -> bool {
        self.conversation.as_ref().is_some_and(Conversation::is_typing)
    }

    /// Active room's channel is open.
    pub fn is_connected(&self) -> bool {
        self.connection_state() == Some(ConnectionState::Open)
    }

    /// Active room's channel state.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.conversation.as_ref().and_then(|c| c.connection)
    }

    /// Banner to show, if the channel is not open.
    pub fn banner(&self) -> Option<Banner> {
        match self.connection_state()? {
            ConnectionState::Open => None,
            ConnectionState::Connecting => Some(Banner::Connecting),
            ConnectionState::Closed | ConnectionState::Errored => Some(Banner::Disconnected),
        }
    }


    /// Transient status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn current(&mut self, session: SessionId) -> Option<&mut Conversation<I>> {
        match self.conversation.as_mut() {
            Some(c) if c.session == session => Some(c),
            _ => {
                tracing::debug!(%session, "discarding event for stale session");
                None
            },
        }
    }

    fn history_resolved(&mut self, session: SessionId, records: Vec<MessageRecord>) -> Vec<AppAction> {
        let remote = self.config.source == DataSource::Remote;
        let Some(conversation) = self.current(session) else {
            return vec![];
        };
        if conversation.history_loaded {
            return vec![];
        }

        tracing::debug!(%session, count = records.len(), "history loaded");
        conversation.store.load_history(records);
        conversation.history_loaded = true;

        if !remote {
            return vec![AppAction::Render];
        }
        conversation.connection = Some(ConnectionState::Connecting);
        vec![
            AppAction::OpenChannel { session, room_id: conversation.room_id().clone() },
            AppAction::Render,
        ]
    }

    fn close_conversation(&mut self) -> Vec<AppAction> {
        match self.conversation.take() {
            Some(c) if c.connection.is_some() => vec![AppAction::CloseChannel { session: c.session }],
            _ => vec![],
        }
    }

    fn allocate_session(&mut self) -> SessionId {
        let session = self.next_session;
        self.next_session = session.next();
        session
    }

    fn cycle_room(&mut self, forward: bool) -> Vec<AppAction> {
        let rooms = self.rooms.rooms();
        if rooms.is_empty() {
            return vec![];
        }

        let len = rooms.len();
        let current = self.active_room().and_then(|id| rooms.iter().position(|r| &r.id == id));
        let index = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };

        let room_id = rooms[index].id.clone();
        self.select_room(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_app() -> App {
        App::new(ChatConfig::production().unwrap())
    }

    fn fixture_app() -> App {
        App::new(ChatConfig::production().unwrap().with_source(DataSource::Fixtures))
    }

    fn session_of(actions: &[AppAction]) -> SessionId {
        actions
            .iter()
            .find_map(|a| match a {
                AppAction::FetchHistory { session, .. } => Some(*session),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn initial_state() {
        let app = remote_app();
        assert!(app.room_list().is_loading());
        assert!(app.active_room().is_none());
        assert!(app.messages().is_empty());
        assert!(!app.is_connected());
        assert!(app.banner().is_none());
    }

    #[test]
    fn select_room_requests_history_page() {
        let mut app = remote_app();
        let actions = app.select_room(RoomId::from(4));

        assert!(matches!(actions.as_slice(), [
            AppAction::FetchHistory { page: 1, page_size: 50, .. },
            AppAction::Render
        ]));
        assert!(app.conversation().unwrap().is_loading());
    }

    #[test]
    fn reselecting_active_room_is_noop() {
        let mut app = remote_app();
        app.select_room(RoomId::from(4));
        assert!(app.select_room(RoomId::from(4)).is_empty());
    }

    #[test]
    fn channel_opens_after_history() {
        let mut app = remote_app();
        let session = session_of(&app.select_room(RoomId::from(4)));

        let actions = app.handle(AppEvent::HistoryLoaded { session, messages: vec![] });

        assert_eq!(actions, vec![
            AppAction::OpenChannel { session, room_id: RoomId::from(4) },
            AppAction::Render
        ]);
        assert_eq!(app.banner(), Some(Banner::Connecting));
    }

    #[test]
    fn history_failure_still_opens_channel() {
        let mut app = remote_app();
        let session = session_of(&app.select_room(RoomId::from(4)));

        let actions = app.handle(AppEvent::HistoryFailed { session, reason: "500".into() });

        assert!(actions.iter().any(|a| matches!(a, AppAction::OpenChannel { .. })));
        assert!(app.messages().is_empty());
        assert!(app.status_message().unwrap().contains("500"));
    }

    #[test]
    fn switching_rooms_closes_previous_channel_first() {
        let mut app = remote_app();
        let first = session_of(&app.select_room(RoomId::from(1)));
        app.handle(AppEvent::HistoryLoaded { session: first, messages: vec![] });

        let actions = app.select_room(RoomId::from(2));

        assert_eq!(actions.first(), Some(&AppAction::CloseChannel { session: first }));
        assert!(app.connection_state().is_none());
    }

    #[test]
    fn whitespace_submission_ignored() {
        let mut app = fixture_app();
        app.select_room(RoomId::from(1));
        let before = app.messages().len();

        assert!(app.send_message("   \n").is_empty());
        assert_eq!(app.messages().len(), before);
    }

    #[test]
    fn send_without_room_sets_status() {
        let mut app = remote_app();
        app.send_message("hello");
        assert_eq!(app.status_message(), Some("Select a chat to start messaging"));
    }

    #[test]
    fn typing_frames_only_while_open() {
        let mut app = remote_app();
        let session = session_of(&app.select_room(RoomId::from(1)));
        app.handle(AppEvent::HistoryLoaded { session, messages: vec![] });
        assert!(app.notify_typing().is_empty());

        app.handle(AppEvent::ConnectionChanged { session, state: ConnectionState::Open });

        assert_eq!(app.notify_typing(), vec![AppAction::SendFrame {
            session,
            frame: ChannelFrame::typing("You")
        }]);
    }

    #[test]
    fn reconnect_requires_terminal_channel() {
        let mut app = remote_app();
        let session = session_of(&app.select_room(RoomId::from(1)));
        app.handle(AppEvent::HistoryLoaded { session, messages: vec![] });
        assert!(app.reconnect().is_empty());

        app.handle(AppEvent::ConnectionChanged { session, state: ConnectionState::Errored });
        let actions = app.reconnect();

        let [AppAction::CloseChannel { session: old }, AppAction::OpenChannel { session: new, .. }, AppAction::Render] =
            actions.as_slice()
        else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_eq!(*old, session);
        assert!(*new > session);
        assert_eq!(app.banner(), Some(Banner::Connecting));
    }

    #[test]
    fn fixtures_never_open_channel() {
        let mut app = fixture_app();
        assert_eq!(app.load_rooms(), vec![AppAction::Render]);
        assert_eq!(app.rooms().len(), 2);

        let actions = app.select_room(RoomId::from(1));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.messages().len(), 2);
        assert!(app.banner().is_none());
        assert!(!app.is_connected());
    }

    #[test]
    fn tab_cycles_rooms() {
        let mut app = fixture_app();
        app.load_rooms();

        app.select_next_room();
        assert_eq!(app.active_room(), Some(&RoomId::from(1)));
        app.select_next_room();
        assert_eq!(app.active_room(), Some(&RoomId::from(2)));
        app.select_next_room();
        assert_eq!(app.active_room(), Some(&RoomId::from(1)));
        app.select_previous_room();
        assert_eq!(app.active_room(), Some(&RoomId::from(2)));
    }

    #[test]
    fn rooms_failure_yields_empty_list() {
        let mut app = remote_app();
        app.handle(AppEvent::RoomsFailed { reason: "timeout".into() });

        assert!(!app.room_list().is_loading());
        assert!(app.rooms().is_empty());
    }

    #[test]
    fn resize_only_redraws() {
        let mut app = fixture_app();
        app.load_rooms();
        app.select_room(RoomId::from(1));
        let before = app.messages().len();

        assert_eq!(app.handle(AppEvent::Resize), vec![AppAction::Render]);
        assert_eq!(app.messages().len(), before);
        assert_eq!(app.active_room(), Some(&RoomId::from(1)));
    }
}
