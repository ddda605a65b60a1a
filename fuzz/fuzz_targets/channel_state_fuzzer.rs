//! Fuzz target for the Channel state machine
//!
//! # Strategy
//!
//! - Arbitrary interleavings of transport notifications and app intents
//! - Received payloads mix valid frames, unknown kinds and garbage
//!
//! # Invariants
//!
//! - Release is emitted at most once per channel
//! - Nothing is transmitted or delivered unless the channel is open
//! - Once terminal, the state never changes again

#![no_main]

use arbitrary::Arbitrary;
use campus_client::{Channel, ChannelAction, ChannelEvent};
use campus_proto::{ChannelFrame, RoomId};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Opened,
    Received(Payload),
    Failed,
    Closed,
    SendTyping,
    SendMessage(String),
    Close,
}

#[derive(Debug, Clone, Arbitrary)]
enum Payload {
    Message(String),
    Typing,
    Unknown,
    Raw(String),
}

impl Payload {
    fn text(&self) -> String {
        match self {
            Self::Message(content) => ChannelFrame::message(content.clone(), "Alice")
                .encode()
                .unwrap_or_default(),
            Self::Typing => r#"{"type":"typing","user":"Alice"}"#.to_string(),
            Self::Unknown => r#"{"type":"presence"}"#.to_string(),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let (mut channel, _) = Channel::open(RoomId::from(1));
    let mut releases = 0;
    let mut terminal_state = None;

    for op in ops {
        let was_open = channel.is_connected();
        let event = match op {
            Op::Opened => ChannelEvent::Opened,
            Op::Received(payload) => ChannelEvent::Received(payload.text()),
            Op::Failed => ChannelEvent::Failed { reason: "fuzz".into() },
            Op::Closed => ChannelEvent::Closed,
            Op::SendTyping => ChannelEvent::Send(ChannelFrame::typing("You")),
            Op::SendMessage(text) => ChannelEvent::Send(ChannelFrame::message(text, "You")),
            Op::Close => ChannelEvent::Close,
        };

        let Ok(actions) = channel.handle(event) else {
            continue;
        };

        for action in &actions {
            match action {
                ChannelAction::Release => releases += 1,
                ChannelAction::Transmit(_) | ChannelAction::Deliver(_) => assert!(was_open),
                _ => {},
            }
        }
        assert!(releases <= 1);

        if let Some(state) = terminal_state {
            assert_eq!(channel.state(), state);
        } else if channel.state().is_terminal() {
            terminal_state = Some(channel.state());
        }
    }
});
