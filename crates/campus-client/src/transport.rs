//! WebSocket transport for the realtime channel.
//!
//! Provides [`ChannelHandle`], which moves text frames between the caller and a
//! background task that owns the socket. This is a thin layer: lifecycle
//! decisions remain in the Sans-IO [`Channel`](crate::Channel), which is fed
//! the [`TransportEvent`]s this task reports.

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

const CHANNEL_CAPACITY: usize = 64;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Background task is gone (connection finished or was stopped).
    #[error("channel task is not running")]
    NotRunning,
}

/// What the socket task observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// Text frame from the server.
    Text(String),
    /// Handshake or stream failure.
    Failed {
        /// Error description.
        reason: String,
    },
    /// Server closed the connection.
    Closed,
}

/// Handle to a WebSocket channel running on a background task.
///
/// Dropping the handle or calling [`ChannelHandle::stop`] ends the task.
pub struct ChannelHandle {
    /// Text frames to write to the socket.
    pub to_server: mpsc::Sender<String>,
    /// Events observed on the socket.
    pub from_server: mpsc::Receiver<TransportEvent>,
    /// Abort handle to stop the socket task.
    abort_handle: tokio::task::AbortHandle,
}

impl ChannelHandle {
    /// Queue a text frame for the socket.
    ///
    /// # Errors
    ///
    /// - `TransportError::NotRunning` if the task has exited.
    pub async fn send(&self, text: String) -> Result<(), TransportError> {
        self.to_server.send(text).await.map_err(|_| TransportError::NotRunning)
    }

    /// Stop the socket task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start connecting to `url` on a background task.
///
/// Returns immediately. The outcome of the handshake arrives on
/// [`ChannelHandle::from_server`] as [`TransportEvent::Opened`] or
/// [`TransportEvent::Failed`].
///
/// Must be called from within a tokio runtime.
pub fn connect(url: &Url) -> ChannelHandle {
    // `wss` needs a process-wide TLS provider; a second install is a no-op
    let _ = rustls::crypto::ring::default_provider().install_default();

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_channel(url.clone(), to_server_rx, from_server_tx));

    ChannelHandle {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    }
}

/// Run the socket, bridging between channels and the WebSocket stream.
async fn run_channel(
    url: Url,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    let socket = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            tracing::warn!(%url, error = %e, "websocket handshake failed");
            let _ = from_server.send(TransportEvent::Failed { reason: e.to_string() }).await;
            return;
        },
    };

    tracing::debug!(%url, "websocket connected");
    if from_server.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(text) = outgoing else {
                    // Handle dropped: close politely
                    let _ = sink.send(Message::Close(None)).await;
                    return;
                };
                if let Err(e) = sink.send(Message::text(text)).await {
                    let _ = from_server.send(TransportEvent::Failed { reason: e.to_string() }).await;
                    return;
                }
            }

            incoming = stream.next() => {
                let event = match incoming {
                    Some(Ok(Message::Text(text))) => TransportEvent::Text(text.as_str().to_owned()),
                    Some(Ok(Message::Close(_))) | None => {
                        let _ = from_server.send(TransportEvent::Closed).await;
                        return;
                    },
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        let _ = from_server.send(TransportEvent::Failed { reason: e.to_string() }).await;
                        return;
                    },
                };
                if from_server.send(event).await.is_err() {
                    return;
                }
            }
        }
    }
}
