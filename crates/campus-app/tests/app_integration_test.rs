//! Integration tests for App and Bridge behavior.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The active room's log holds exactly the expected messages, in order
//! - Banner and connection status agree with the channel state
//! - Transport commands match what the user did

use std::time::Duration;

use campus_app::{
    App, AppAction, AppEvent, Banner, Bridge, ChatConfig, MessageId, SessionId, TransportCommand,
};
use campus_client::{ChannelEvent, ConnectionState};
use campus_proto::{ChannelFrame, Listing, MessageRecord, RoomId, RoomSummary, WireId};

/// App, bridge and a virtual clock wired together the way the runtime does.
struct Harness {
    app: App<Duration>,
    bridge: Bridge,
    now: Duration,
    sent: Vec<TransportCommand>,
    fetches: Vec<(SessionId, RoomId)>,
}

impl Harness {
    fn new() -> Self {
        Self {
            app: App::new(ChatConfig::production().unwrap()),
            bridge: Bridge::new(),
            now: Duration::ZERO,
            sent: Vec::new(),
            fetches: Vec::new(),
        }
    }

    /// Process actions from App through Bridge and update App state.
    fn process(&mut self, actions: Vec<AppAction>) {
        let mut pending = actions;
        while !pending.is_empty() {
            for action in std::mem::take(&mut pending) {
                match action {
                    AppAction::FetchHistory { session, room_id, .. } => {
                        self.fetches.push((session, room_id));
                    },
                    AppAction::OpenChannel { .. }
                    | AppAction::SendFrame { .. }
                    | AppAction::CloseChannel { .. } => {
                        for event in self.bridge.process_app_action(action, self.now) {
                            pending.extend(self.app.handle(event));
                        }
                    },
                    AppAction::Render | AppAction::Quit | AppAction::FetchRooms => {},
                }
            }
            self.sent.extend(self.bridge.take_outgoing());
        }
    }

    fn handle(&mut self, event: AppEvent<Duration>) {
        let actions = self.app.handle(event);
        self.process(actions);
    }

    /// Select a room and return the session of its history fetch.
    fn select(&mut self, room: u64) -> SessionId {
        let actions = self.app.select_room(RoomId::from(room));
        self.process(actions);
        self.fetches.last().map(|(session, _)| *session).unwrap()
    }

    fn load_history(&mut self, session: SessionId, messages: Vec<MessageRecord>) {
        self.handle(AppEvent::HistoryLoaded { session, messages });
    }

    /// Simulate a transport notification.
    fn transport(&mut self, session: SessionId, event: ChannelEvent) {
        let events = self.bridge.handle_channel_event(session, event, self.now);
        self.sent.extend(self.bridge.take_outgoing());
        for event in events {
            self.handle(event);
        }
    }

    fn receive(&mut self, session: SessionId, json: &str) {
        self.transport(session, ChannelEvent::Received(json.to_string()));
    }

    fn send(&mut self, text: &str) {
        let actions = self.app.send_message(text);
        self.process(actions);
    }

    fn advance(&mut self, millis: u64) {
        self.now += Duration::from_millis(millis);
        self.handle(AppEvent::Tick { now: self.now });
    }

    /// Select a room, resolve its history empty and complete the handshake.
    fn open_room(&mut self, room: u64) -> SessionId {
        let session = self.select(room);
        self.load_history(session, vec![]);
        self.transport(session, ChannelEvent::Opened);
        session
    }

    fn contents(&self) -> Vec<&str> {
        self.app.messages().iter().map(|m| m.content.as_str()).collect()
    }

    fn transmitted(&self) -> Vec<ChannelFrame> {
        self.sent
            .iter()
            .filter_map(|c| match c {
                TransportCommand::Transmit { text, .. } => ChannelFrame::decode(text).ok(),
                _ => None,
            })
            .collect()
    }
}

fn record(id: u64, sender: &str, content: &str) -> MessageRecord {
    MessageRecord {
        id: Some(WireId::Number(id)),
        sender: sender.into(),
        content: content.into(),
        timestamp: "2025-08-19T10:00:00Z".into(),
    }
}

#[test]
fn stale_history_never_touches_new_room() {
    let mut h = Harness::new();
    let first = h.select(1);
    let second = h.select(2);

    h.load_history(first, vec![record(1, "Alice", "for room one")]);

    // Oracle: room two is still loading and empty, nothing was opened
    assert_eq!(h.app.active_room(), Some(&RoomId::from(2)));
    assert!(h.app.messages().is_empty());
    assert!(h.app.conversation().unwrap().is_loading());
    assert!(!h.sent.iter().any(|c| matches!(c, TransportCommand::Connect { .. })));

    h.load_history(second, vec![record(9, "Bob", "for room two")]);
    assert_eq!(h.contents(), ["for room two"]);
}

#[test]
fn stale_channel_frames_are_dropped() {
    let mut h = Harness::new();
    let first = h.open_room(1);
    let second = h.open_room(2);

    h.receive(first, r#"{"type":"message","content":"late","sender":"Alice","timestamp":""}"#);
    h.receive(second, r#"{"type":"message","content":"fresh","sender":"Bob","timestamp":""}"#);

    assert_eq!(h.contents(), ["fresh"]);
    assert!(h.sent.contains(&TransportCommand::Release { session: first }));
}

#[test]
fn switching_rooms_releases_before_connecting() {
    let mut h = Harness::new();
    let first = h.open_room(1);
    let second = h.open_room(2);

    let release = h.sent.iter().position(|c| *c == TransportCommand::Release { session: first });
    let connect = h
        .sent
        .iter()
        .position(|c| matches!(c, TransportCommand::Connect { session, .. } if *session == second));

    assert!(release.unwrap() < connect.unwrap());
}

#[test]
fn inbound_message_appends_and_outbound_transmits() {
    let mut h = Harness::new();
    let session = h.open_room(1);
    assert!(h.app.is_connected());
    assert!(h.app.banner().is_none());

    h.receive(session, r#"{"type":"message","content":"Is it still for sale?","sender":"Alice","timestamp":"2025-08-19T10:00:00Z"}"#);
    h.send("Yes!");

    // Oracle: both in arrival order, only ours went out
    assert_eq!(h.contents(), ["Is it still for sale?", "Yes!"]);
    let own = &h.app.messages()[1];
    assert_eq!(own.sender, "You");
    assert!(matches!(own.id, MessageId::Local { seq: 2, .. }));

    let frames = h.transmitted();
    assert!(matches!(frames.as_slice(), [ChannelFrame::Message(m)] if m.content == "Yes!" && m.sender == "You"));
}

#[test]
fn send_while_connecting_appends_without_transmitting() {
    let mut h = Harness::new();
    let session = h.select(1);
    h.load_history(session, vec![]);
    assert_eq!(h.app.connection_state(), Some(ConnectionState::Connecting));

    h.send("queued?");

    assert_eq!(h.contents(), ["queued?"]);
    assert!(h.transmitted().is_empty());
}

#[test]
fn typing_indicator_lasts_exactly_the_window() {
    let mut h = Harness::new();
    let session = h.open_room(1);

    h.receive(session, r#"{"type":"typing","user":"Alice"}"#);
    assert!(h.app.is_typing());

    h.advance(1999);
    assert!(h.app.is_typing());

    h.advance(1);
    assert!(!h.app.is_typing());
}

#[test]
fn repeated_typing_restarts_window() {
    let mut h = Harness::new();
    let session = h.open_room(1);

    h.receive(session, r#"{"type":"typing","user":"Alice"}"#);
    h.advance(1500);
    h.receive(session, r#"{"type":"typing","user":"Alice"}"#);
    h.advance(1500);

    // 3000ms after the first signal, 1500ms after the last
    assert!(h.app.is_typing());

    h.advance(500);
    assert!(!h.app.is_typing());
}

#[test]
fn enveloped_history_is_normalized() {
    let mut h = Harness::new();
    let session = h.select(1);
    let body = br#"{"messages":[{"id":1,"sender":"Alice","content":"hi","timestamp":"2025-08-19T10:00:00Z"}]}"#;

    let messages = Listing::<MessageRecord>::from_slice(body).unwrap().into_items();
    h.load_history(session, messages);

    // Oracle: one message, server id 1, text "hi"
    assert_eq!(h.contents(), ["hi"]);
    assert_eq!(h.app.messages()[0].id, MessageId::Server(WireId::Number(1)));
}

#[test]
fn unrecognized_history_shape_is_empty() {
    let mut h = Harness::new();
    let session = h.select(1);

    let messages = Listing::<MessageRecord>::from_slice(br#"{"detail":"not found"}"#).unwrap().into_items();
    h.load_history(session, messages);

    assert!(h.app.messages().is_empty());
    assert!(!h.app.conversation().unwrap().is_loading());
}

#[test]
fn failed_handshake_shows_banner_and_keeps_local_sends() {
    let mut h = Harness::new();
    let session = h.select(1);
    h.load_history(session, vec![]);

    h.transport(session, ChannelEvent::Failed { reason: "connection refused".into() });
    h.send("hello");

    // Oracle: disconnected banner, local echo, nothing transmitted
    assert!(!h.app.is_connected());
    assert_eq!(h.app.banner(), Some(Banner::Disconnected));
    let last = h.app.messages().last().unwrap();
    assert_eq!((last.sender.as_str(), last.content.as_str()), ("You", "hello"));
    assert!(h.transmitted().is_empty());
    assert!(h.sent.contains(&TransportCommand::Release { session }));
}

#[test]
fn reconnect_opens_fresh_channel_and_keeps_log() {
    let mut h = Harness::new();
    let first = h.open_room(1);
    h.send("before");
    h.transport(first, ChannelEvent::Closed);
    assert_eq!(h.app.banner(), Some(Banner::Disconnected));

    let actions = h.app.reconnect();
    h.process(actions);
    let second = h.bridge.session().unwrap();
    h.transport(second, ChannelEvent::Opened);
    h.send("after");

    assert_ne!(first, second);
    assert!(h.app.is_connected());
    assert_eq!(h.contents(), ["before", "after"]);
    assert_eq!(h.transmitted().len(), 2);
}

#[test]
fn composer_edits_send_typing_frames_when_open() {
    let mut h = Harness::new();
    h.open_room(1);

    let actions = h.app.notify_typing();
    h.process(actions);

    assert_eq!(h.transmitted(), vec![ChannelFrame::typing("You")]);
}

#[test]
fn bare_room_list_is_kept_verbatim() {
    let mut h = Harness::new();
    let body = br#"[{"id":1,"user":"Alice","lastMessage":"Hey, is this still available?","timestamp":"2025-08-19T10:00:00Z"},{"id":"abc"}]"#;
    let rooms = Listing::<RoomSummary>::from_slice(body).unwrap().into_items();

    h.handle(AppEvent::RoomsLoaded { rooms: rooms.clone() });

    assert_eq!(h.app.rooms(), rooms.as_slice());
    assert_eq!(h.app.rooms()[1].display_name(), "Room abc");
    assert_eq!(h.app.rooms()[1].preview(), "No messages yet");
}

#[test]
fn empty_enveloped_room_list_is_empty_state() {
    let mut h = Harness::new();
    let rooms = Listing::<RoomSummary>::from_slice(br#"{"rooms":[]}"#).unwrap().into_items();

    h.handle(AppEvent::RoomsLoaded { rooms });

    assert!(!h.app.room_list().is_loading());
    assert!(h.app.rooms().is_empty());
}
