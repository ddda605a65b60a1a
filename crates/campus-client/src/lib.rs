//! Client
//!
//! Connection management for the campus chat realtime channel.
//!
//! # Architecture
//!
//! [`Channel`] is a Sans-IO state machine: it receives [`ChannelEvent`]s
//! (transport notifications and application intents) and returns
//! [`ChannelAction`]s for the caller to execute. It never touches a socket,
//! which keeps every transition testable without a network.
//!
//! # Components
//!
//! - [`Channel`]: one realtime channel bound to one room
//! - [`ConnectionState`]: `Connecting → Open → (Closed | Errored)`
//! - [`Endpoints`]: REST and WebSocket address construction
//!
//! # Transports (optional)
//!
//! - `transport` feature: [`transport::connect`] spawns a WebSocket task and
//!   returns a [`transport::ChannelHandle`]
//! - `http` feature: [`http::RestClient`] for room lists and message history

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod endpoints;
mod error;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "transport")]
pub mod transport;

pub use campus_proto::{ChannelFrame, RoomId};
pub use channel::{Channel, ChannelAction, ChannelEvent, ConnectionState};
pub use endpoints::Endpoints;
pub use error::{ChannelError, EndpointError};
