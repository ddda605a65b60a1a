//! Conversation view configuration.
//!
//! [`ChatConfig`] is built once by the frontend and handed to
//! [`crate::App::new`]. Nothing in this crate reads process-wide settings.

use std::time::Duration;

use campus_client::{EndpointError, Endpoints};
use thiserror::Error;

/// Production REST base.
pub const DEFAULT_API_BASE: &str = "https://campus-exchange-fastapi-production.up.railway.app/api/v1";

/// Production realtime base.
pub const DEFAULT_WS_BASE: &str = "wss://campus-exchange-fastapi-production.up.railway.app";

/// How long a remote typing signal stays visible.
pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_secs(2);

/// History page requested on room selection.
pub const DEFAULT_PAGE: u32 = 1;

/// History page size requested on room selection.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Sender label for messages typed on this client.
pub const DEFAULT_SELF_LABEL: &str = "You";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Collaborator base address rejected.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// History page size must be at least one.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Own sender label is empty.
    #[error("self label must not be empty")]
    EmptySelfLabel,
}

/// Where rooms and messages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// REST collaborator plus realtime channel.
    #[default]
    Remote,
    /// Built-in sample data; no network and no channel.
    Fixtures,
}

/// Configuration injected into the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Collaborator addresses.
    pub endpoints: Endpoints,
    /// History page to request.
    pub page: u32,
    /// History page size to request.
    pub page_size: u32,
    /// Typing indicator window.
    pub typing_timeout: Duration,
    /// Sender label for own messages.
    pub self_label: String,
    /// Data source.
    pub source: DataSource,
}

impl ChatConfig {
    /// Configuration with default paging, timeout and label.
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            typing_timeout: DEFAULT_TYPING_TIMEOUT,
            self_label: DEFAULT_SELF_LABEL.to_string(),
            source: DataSource::Remote,
        }
    }

    /// Parse base addresses and apply defaults.
    pub fn from_urls(api: &str, ws: &str) -> Result<Self, AppError> {
        Ok(Self::new(Endpoints::parse(api, ws)?))
    }

    /// Production endpoints with defaults.
    pub fn production() -> Result<Self, AppError> {
        Self::from_urls(DEFAULT_API_BASE, DEFAULT_WS_BASE)
    }

    /// Switch the data source.
    #[must_use]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::InvalidPageSize);
        }
        if self.self_label.trim().is_empty() {
            return Err(AppError::EmptySelfLabel);
        }
        Ok(())
    }
}
