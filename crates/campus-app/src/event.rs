//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - System ticks and terminal resizes.
//! - Completed REST fetches reported by the driver.
//! - Channel lifecycle changes and frames translated by the
//!   [`crate::Bridge`].
//!
//! User intents do not go through events; frontends call the App's methods
//! directly.

use std::time::Instant;

use campus_client::ConnectionState;
use campus_proto::{ChannelFrame, MessageRecord, RoomSummary};

use crate::SessionId;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent<I = Instant> {
    /// Periodic tick. Expires the typing indicator.
    Tick {
        /// Current time.
        now: I,
    },

    /// Terminal was resized. Triggers a redraw.
    Resize,

    /// Room list fetch succeeded.
    RoomsLoaded {
        /// Rooms in server order.
        rooms: Vec<RoomSummary>,
    },

    /// Room list fetch failed.
    RoomsFailed {
        /// Error description.
        reason: String,
    },

    /// History fetch succeeded.
    HistoryLoaded {
        /// Session the fetch was started for.
        session: SessionId,
        /// Messages in server order.
        messages: Vec<MessageRecord>,
    },

    /// History fetch failed.
    HistoryFailed {
        /// Session the fetch was started for.
        session: SessionId,
        /// Error description.
        reason: String,
    },

    /// Channel lifecycle transition.
    ConnectionChanged {
        /// Session the channel belongs to.
        session: SessionId,
        /// New state.
        state: ConnectionState,
    },

    /// Recognized frame received on the channel.
    FrameReceived {
        /// Session the channel belongs to.
        session: SessionId,
        /// Decoded frame.
        frame: ChannelFrame,
        /// Arrival time.
        received_at: I,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
