//! Application layer for the campus chat conversation view
//!
//! Pure state machines and a generic runtime for the conversation view, so the
//! same orchestration code runs in the terminal client and in tests.
//!
//! # Components
//!
//! - [`App`]: conversation state machine (room selection, message log, typing
//!   indicator, composer semantics)
//! - [`Bridge`]: channel bridge (translates App actions to channel events and
//!   transport commands)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver
//! - [`ChatConfig`]: injected configuration, including the data source

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
pub mod fixtures;
mod runtime;
mod session;
mod state;

pub use action::AppAction;
pub use app::{App, Conversation};
pub use bridge::{Bridge, TransportCommand};
pub use config::{
    AppError, ChatConfig, DEFAULT_API_BASE, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_SELF_LABEL,
    DEFAULT_TYPING_TIMEOUT, DEFAULT_WS_BASE, DataSource,
};
pub use driver::{Driver, Polled};
pub use event::AppEvent;
pub use runtime::Runtime;
pub use session::SessionId;
pub use state::{Banner, Message, MessageId, MessageStore, RoomList, TypingSignal};
