//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. REST fetches run on spawned
//! tasks and report back through a channel; the realtime channel uses the
//! WebSocket transport from `campus-client`.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use campus_app::{
    App, AppAction, AppError, AppEvent, ChatConfig, Driver, Polled, SessionId, TransportCommand,
};
use campus_client::{
    ChannelEvent,
    http::RestClient,
    transport::{self, ChannelHandle, TransportEvent},
};
use campus_proto::RoomId;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::{sync::mpsc, task::AbortHandle};

use crate::{InputState, KeyInput, ui};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] AppError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), REST fetches
/// (reqwest) and the realtime channel (tokio-tungstenite). Owns the composer
/// state.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    rest: RestClient,
    /// Fetch results from spawned tasks.
    completions_tx: mpsc::UnboundedSender<AppEvent>,
    completions_rx: mpsc::UnboundedReceiver<AppEvent>,
    rooms_task: Option<AbortHandle>,
    history_task: Option<AbortHandle>,
    /// Running channel and the session it was started for.
    channel: Option<(SessionId, ChannelHandle)>,
}

impl TerminalDriver {
    /// Enter the alternate screen and create a driver for `config`.
    pub fn new(config: &ChatConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input_state: InputState::new(),
            rest: RestClient::new(config.endpoints.clone()),
            completions_tx,
            completions_rx,
            rooms_task: None,
            history_task: None,
            channel: None,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::BackTab => Some(KeyInput::BackTab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::F(5) => Some(KeyInput::Refresh),
            _ => None,
        }
    }

    /// Translate a socket observation for the channel state machine.
    fn convert_transport(event: Option<TransportEvent>) -> ChannelEvent {
        match event {
            Some(TransportEvent::Opened) => ChannelEvent::Opened,
            Some(TransportEvent::Text(text)) => ChannelEvent::Received(text),
            Some(TransportEvent::Failed { reason }) => ChannelEvent::Failed { reason },
            // Task ended without saying why
            Some(TransportEvent::Closed) | None => ChannelEvent::Closed,
        }
    }

    fn handle_terminal_event(
        &mut self,
        event: Option<io::Result<Event>>,
        app: &mut App,
    ) -> Result<Vec<AppAction>, TerminalError> {
        match event {
            Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                Ok(Self::convert_key(key_event.code)
                    .map_or_else(Vec::new, |key| self.input_state.handle_key(key, app)))
            },
            Some(Ok(Event::Resize(..))) => Ok(app.handle(AppEvent::Resize)),
            Some(Err(e)) => Err(TerminalError::Io(e)),
            // Input stream ended
            None => Ok(app.quit()),
            _ => Ok(vec![]),
        }
    }

    fn release_channel(&mut self) {
        if let Some((session, handle)) = self.channel.take() {
            tracing::debug!(%session, "releasing channel");
            handle.stop();
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Polled, Self::Error> {
        let slot = &mut self.channel;
        let channel = async move {
            match slot.as_mut() {
                Some((session, handle)) => (*session, handle.from_server.recv().await),
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                let actions = self.handle_terminal_event(maybe_event, app)?;
                Ok(Polled::Actions(actions))
            }

            // Fetch results
            Some(event) = self.completions_rx.recv() => {
                Ok(Polled::Actions(app.handle(event)))
            }

            // Channel traffic
            (session, event) = channel => {
                if event.is_none() {
                    self.channel = None;
                }
                Ok(Polled::Channel { session, event: Self::convert_transport(event) })
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => {
                Ok(Polled::Actions(app.handle(AppEvent::Tick { now: Instant::now() })))
            }
        }
    }

    fn fetch_rooms(&mut self) -> Result<(), Self::Error> {
        if let Some(task) = self.rooms_task.take() {
            task.abort();
        }

        let rest = self.rest.clone();
        let completions = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let event = match rest.fetch_rooms().await {
                Ok(rooms) => AppEvent::RoomsLoaded { rooms },
                Err(e) => AppEvent::RoomsFailed { reason: e.to_string() },
            };
            let _ = completions.send(event);
        });

        self.rooms_task = Some(task.abort_handle());
        Ok(())
    }

    fn fetch_history(
        &mut self,
        session: SessionId,
        room_id: RoomId,
        page: u32,
        page_size: u32,
    ) -> Result<(), Self::Error> {
        // Only the latest selection's history matters
        if let Some(task) = self.history_task.take() {
            task.abort();
        }

        let rest = self.rest.clone();
        let completions = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let event = match rest.fetch_history(&room_id, page, page_size).await {
                Ok(messages) => AppEvent::HistoryLoaded { session, messages },
                Err(e) => AppEvent::HistoryFailed { session, reason: e.to_string() },
            };
            let _ = completions.send(event);
        });

        self.history_task = Some(task.abort_handle());
        Ok(())
    }

    fn execute(&mut self, command: TransportCommand) -> Result<(), Self::Error> {
        match command {
            TransportCommand::Connect { session, room_id } => {
                self.release_channel();
                let url = self.rest.endpoints().channel(&room_id);
                tracing::debug!(%session, %url, "connecting channel");
                self.channel = Some((session, transport::connect(&url)));
            },
            TransportCommand::Transmit { session, text } => match &self.channel {
                Some((current, handle)) if *current == session => {
                    if let Err(e) = handle.to_server.try_send(text) {
                        tracing::warn!(%session, error = %e, "dropping outgoing frame");
                    }
                },
                _ => tracing::debug!(%session, "no channel for outgoing frame"),
            },
            TransportCommand::Release { session } => {
                if self.channel.as_ref().is_some_and(|(current, _)| *current == session) {
                    self.release_channel();
                }
            },
        }
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.release_channel();
        for task in [self.rooms_task.take(), self.history_task.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
