//! Property-based tests for the Channel state machine.
//!
//! Arbitrary interleavings of transport notifications and application
//! intents must never break the lifecycle invariants.

use campus_client::{Channel, ChannelAction, ChannelEvent, ChannelFrame, ConnectionState, RoomId};
use proptest::prelude::*;

fn event_strategy() -> impl Strategy<Value = ChannelEvent> {
    prop_oneof![
        2 => Just(ChannelEvent::Opened),
        3 => "[a-z]{0,8}".prop_map(|content| {
            ChannelEvent::Received(ChannelFrame::message(content, "Alice").encode().unwrap())
        }),
        1 => Just(ChannelEvent::Received(r#"{"type":"typing","user":"Alice"}"#.into())),
        1 => Just(ChannelEvent::Received(r#"{"type":"read_receipt"}"#.into())),
        1 => any::<String>().prop_map(ChannelEvent::Received),
        1 => Just(ChannelEvent::Failed { reason: "reset".into() }),
        1 => Just(ChannelEvent::Closed),
        2 => "[a-z]{1,8}".prop_map(|text| ChannelEvent::Send(ChannelFrame::message(text, "You"))),
        1 => Just(ChannelEvent::Close),
    ]
}

proptest! {
    /// Release is emitted at most once and terminal states are final.
    #[test]
    fn release_once_and_terminal_is_final(events in prop::collection::vec(event_strategy(), 0..50)) {
        let (mut channel, _) = Channel::open(RoomId::from(1));
        let mut releases = 0;
        let mut terminal: Option<ConnectionState> = None;

        for event in events {
            let Ok(actions) = channel.handle(event) else { continue };
            releases += actions.iter().filter(|a| **a == ChannelAction::Release).count();
            prop_assert!(releases <= 1);

            match terminal {
                Some(state) => prop_assert_eq!(channel.state(), state),
                None if channel.state().is_terminal() => terminal = Some(channel.state()),
                None => {},
            }
        }
    }

    /// Frames only move while the channel is open.
    #[test]
    fn frames_flow_only_while_open(events in prop::collection::vec(event_strategy(), 0..50)) {
        let (mut channel, _) = Channel::open(RoomId::from(1));

        for event in events {
            let was_open = channel.is_connected();
            let Ok(actions) = channel.handle(event) else { continue };
            let moved = actions
                .iter()
                .any(|a| matches!(a, ChannelAction::Transmit(_) | ChannelAction::Deliver(_)));
            prop_assert!(!moved || was_open);
        }
    }
}
