//! Campus chat wire protocol
//!
//! Types for the two contracts the chat client consumes but does not
//! implement:
//!
//! - The REST collaborator: room listings and bulk message history, each
//!   returned either as a bare JSON array or wrapped in an envelope object.
//!   [`Listing`] normalizes both shapes once, at the boundary.
//! - The realtime channel: JSON text frames tagged by a `type` discriminator.
//!   [`ChannelFrame`] models the recognized kinds and tolerates unknown ones.
//!
//! Nothing here performs I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod frame;
pub mod ids;
pub mod rest;
pub mod timestamp;

pub use errors::{ProtocolError, Result};
pub use frame::{ChannelFrame, MessageFrame, TypingFrame};
pub use ids::{RoomId, WireId};
pub use rest::{Entry, Envelope, Listing, MessageRecord, RoomSummary};
