//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use campus_client::ChannelEvent;
use campus_proto::RoomId;

use crate::{App, AppAction, SessionId, TransportCommand};

/// What a driver observed while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled {
    /// Actions produced by feeding input, fetch results or ticks to the App.
    Actions(Vec<AppAction>),
    /// Notification from the channel transport of `session`.
    Channel {
        /// Session the transport was started for.
        session: SessionId,
        /// Translated transport notification.
        event: ChannelEvent,
    },
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. Fetches and the
/// channel handshake must not block: they are started here and their
/// outcomes come back through [`Driver::poll_event`].
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in tests.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Wait for the next input.
    ///
    /// User input, resizes, ticks and completed fetches are applied to `app`
    /// and returned as [`Polled::Actions`]. Channel notifications are
    /// returned untranslated as [`Polled::Channel`].
    fn poll_event(
        &mut self,
        app: &mut App<Self::Instant>,
    ) -> impl Future<Output = Result<Polled, Self::Error>> + Send;

    /// Start fetching the room list.
    ///
    /// The result arrives later as `RoomsLoaded` or `RoomsFailed`.
    fn fetch_rooms(&mut self) -> Result<(), Self::Error>;

    /// Start fetching one history page for `session`.
    ///
    /// The result arrives later as `HistoryLoaded` or `HistoryFailed` tagged
    /// with `session`. A previous history fetch may be abandoned.
    fn fetch_history(
        &mut self,
        session: SessionId,
        room_id: RoomId,
        page: u32,
        page_size: u32,
    ) -> Result<(), Self::Error>;

    /// Execute a channel transport command.
    fn execute(&mut self, command: TransportCommand) -> Result<(), Self::Error>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App<Self::Instant>) -> Result<(), Self::Error>;

    /// Stop all background work and clean up resources.
    fn stop(&mut self);
}
