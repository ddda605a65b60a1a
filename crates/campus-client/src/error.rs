//! Client error types.

use thiserror::Error;

use crate::ConnectionState;

/// Errors from the channel state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Invalid state transition attempted
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred
        state: ConnectionState,
        /// Operation that was attempted
        operation: &'static str,
    },
}

/// Errors building collaborator addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Base address could not be parsed.
    #[error("invalid url {input:?}: {reason}")]
    Parse {
        /// Rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// Base address uses the wrong scheme for its collaborator.
    #[error("unsupported scheme {found:?}, expected one of {expected:?}")]
    Scheme {
        /// Scheme of the rejected address.
        found: String,
        /// Accepted schemes.
        expected: &'static [&'static str],
    },

    /// Base address cannot carry path segments (e.g. `mailto:`).
    #[error("url cannot be used as a base: {0}")]
    NotABase(String),
}
