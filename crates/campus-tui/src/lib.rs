//! Terminal UI for campus chats
//!
//! A thin shell over [`campus_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`campus_app::Runtime`].
//!
//! This crate handles keyboard input, rendering, and starting fetches and
//! channel sockets on the tokio runtime.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod terminal;
pub mod ui;

pub use campus_app::{App, AppAction, AppEvent, Bridge, ChatConfig, Driver, Runtime};
pub use input::{InputState, KeyInput};
pub use terminal::{TerminalDriver, TerminalError};
