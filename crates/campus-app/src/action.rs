//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use campus_proto::{ChannelFrame, RoomId};

use crate::SessionId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Fetch the room list.
    FetchRooms,

    /// Fetch one history page for the session's room.
    FetchHistory {
        /// Session the result belongs to.
        session: SessionId,
        /// Room to fetch.
        room_id: RoomId,
        /// Page number.
        page: u32,
        /// Page size.
        page_size: u32,
    },

    /// Open the realtime channel for the session's room.
    OpenChannel {
        /// Session the channel belongs to.
        session: SessionId,
        /// Room the channel is scoped to.
        room_id: RoomId,
    },

    /// Send a frame on the session's channel. Dropped unless open.
    SendFrame {
        /// Session the channel belongs to.
        session: SessionId,
        /// Frame to send.
        frame: ChannelFrame,
    },

    /// Tear down the session's channel.
    CloseChannel {
        /// Session the channel belongs to.
        session: SessionId,
    },
}
