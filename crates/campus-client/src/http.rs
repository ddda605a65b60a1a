//! REST collaborator client.
//!
//! Fetches room lists and message history and normalizes the response shape
//! through [`Listing`]. Errors are returned to the caller; deciding to fall
//! back to an empty list is an application concern.

use campus_proto::{Listing, MessageRecord, ProtocolError, RoomId, RoomSummary};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::Endpoints;

/// Errors fetching from the REST collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested address.
        url: Url,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status {
        /// Requested address.
        url: Url,
        /// HTTP status code.
        status: u16,
    },

    /// Body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] ProtocolError),
}

/// HTTP client for the chat REST endpoints.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl RestClient {
    /// Create a client with a default HTTP connection pool.
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_client(reqwest::Client::new(), endpoints)
    }

    /// Create a client reusing an existing HTTP connection pool.
    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Addresses this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// `GET /chat/rooms`, normalized to the ordered room sequence.
    pub async fn fetch_rooms(&self) -> Result<Vec<RoomSummary>, FetchError> {
        self.fetch_listing(self.endpoints.rooms()).await
    }

    /// `GET /chat/rooms/{room}/messages`, normalized to the ordered message
    /// sequence.
    pub async fn fetch_history(
        &self,
        room_id: &RoomId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<MessageRecord>, FetchError> {
        self.fetch_listing(self.endpoints.messages(room_id, page, page_size)).await
    }

    async fn fetch_listing<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }

        let body =
            response.bytes().await.map_err(|source| FetchError::Request { url: url.clone(), source })?;
        let listing = Listing::<T>::from_slice(&body)?;

        if !listing.is_recognized() {
            tracing::warn!(%url, "unrecognized response shape, treating as empty");
        }
        let skipped = listing.skipped();
        if skipped > 0 {
            tracing::warn!(%url, skipped, "dropping malformed records");
        }
        let items = listing.into_items();
        tracing::debug!(%url, count = items.len(), "fetched listing");
        Ok(items)
    }
}
