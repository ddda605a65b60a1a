//! Integration tests for the WebSocket transport.
//!
//! These tests run a real WebSocket peer on localhost and drive the Sans-IO
//! [`Channel`] with the events the transport reports.

use std::time::Duration;

use campus_client::{
    Channel, ChannelAction, ChannelEvent, ConnectionState, RoomId,
    transport::{self, ChannelHandle, TransportEvent},
};
use futures::{SinkExt, StreamExt};
use tokio::{net::TcpListener, time::timeout};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

const WAIT: Duration = Duration::from_secs(5);

/// Start a WebSocket peer that sends `greeting`, then echoes every text frame.
async fn start_echo_peer(greeting: &'static str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
        socket.send(Message::text(greeting)).await.unwrap();

        while let Some(Ok(message)) = socket.next().await {
            match message {
                Message::Text(text) => socket.send(Message::Text(text)).await.unwrap(),
                Message::Close(_) => break,
                _ => {},
            }
        }
    });

    Url::parse(&format!("ws://{addr}/ws/1")).unwrap()
}

/// Next transport event, failing the test on timeout.
async fn next_event(handle: &mut ChannelHandle) -> TransportEvent {
    timeout(WAIT, handle.from_server.recv()).await.expect("timed out").expect("task ended")
}

/// Feed a transport event through the state machine.
fn feed(channel: &mut Channel, event: TransportEvent) -> Vec<ChannelAction> {
    let event = match event {
        TransportEvent::Opened => ChannelEvent::Opened,
        TransportEvent::Text(text) => ChannelEvent::Received(text),
        TransportEvent::Failed { reason } => ChannelEvent::Failed { reason },
        TransportEvent::Closed => ChannelEvent::Closed,
    };
    channel.handle(event).unwrap()
}

#[tokio::test]
async fn open_receive_and_echo() {
    let url = start_echo_peer(r#"{"type":"typing","user":"Alice"}"#).await;
    let (mut channel, _) = Channel::open(RoomId::from(1));
    let mut handle = transport::connect(&url);

    let opened = next_event(&mut handle).await;
    assert_eq!(opened, TransportEvent::Opened);
    feed(&mut channel, opened);
    assert_eq!(channel.state(), ConnectionState::Open);

    let greeting = next_event(&mut handle).await;
    let actions = feed(&mut channel, greeting);
    assert!(matches!(actions.as_slice(), [ChannelAction::Deliver(_)]));

    let send = channel
        .handle(ChannelEvent::Send(campus_client::ChannelFrame::message("hello", "You")))
        .unwrap();
    let [ChannelAction::Transmit(text)] = send.as_slice() else {
        panic!("expected a transmit action, got {send:?}");
    };
    handle.send(text.clone()).await.unwrap();

    let echoed = next_event(&mut handle).await;
    assert_eq!(echoed, TransportEvent::Text(text.clone()));

    handle.stop();
}

#[tokio::test]
async fn refused_connection_reports_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/ws/1")).unwrap();
    let (mut channel, _) = Channel::open(RoomId::from(1));
    let mut handle = transport::connect(&url);

    let event = next_event(&mut handle).await;
    assert!(matches!(event, TransportEvent::Failed { .. }));

    let actions = feed(&mut channel, event);
    assert_eq!(channel.state(), ConnectionState::Errored);
    assert!(actions.contains(&ChannelAction::Release));
}
