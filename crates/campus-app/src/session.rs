//! Room selection sessions.

use std::fmt;

/// Identifies one room selection.
///
/// Each call to [`App::select_room`](crate::App::select_room) (and each
/// reconnect) starts a new session. Fetch results and channel events carry
/// the session they were started for; anything tagged with an older session
/// is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Session number.
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub(crate) fn first() -> Self {
        Self(1)
    }
}

impl From<u64> for SessionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
