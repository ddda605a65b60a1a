//! Collaborator addresses.
//!
//! Base URLs are configured once; every request address is derived from them
//! by appending path segments, so a base with or without a trailing slash
//! behaves the same and room tokens are always percent-encoded.

use campus_proto::RoomId;
use url::Url;

use crate::EndpointError;

const HTTP_SCHEMES: &[&str] = &["http", "https"];
const WS_SCHEMES: &[&str] = &["ws", "wss"];

/// REST and realtime base addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: Url,
    ws_base: Url,
}

impl Endpoints {
    /// Parse and validate both base addresses.
    ///
    /// # Errors
    ///
    /// - `EndpointError::Parse` if either input is not a URL
    /// - `EndpointError::Scheme` if `api` is not http(s) or `ws` is not ws(s)
    /// - `EndpointError::NotABase` if either cannot carry a path
    pub fn parse(api: &str, ws: &str) -> Result<Self, EndpointError> {
        let api_base = parse_base(api, HTTP_SCHEMES)?;
        let ws_base = parse_base(ws, WS_SCHEMES)?;
        Ok(Self { api_base, ws_base })
    }

    /// REST base address.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Realtime base address.
    pub fn ws_base(&self) -> &Url {
        &self.ws_base
    }

    /// `GET {api}/chat/rooms`
    pub fn rooms(&self) -> Url {
        with_segments(&self.api_base, &["chat", "rooms"])
    }

    /// `GET {api}/chat/rooms/{room}/messages?page=&page_size=`
    pub fn messages(&self, room_id: &RoomId, page: u32, page_size: u32) -> Url {
        let mut url = with_segments(&self.api_base, &["chat", "rooms", room_id.as_str(), "messages"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &page_size.to_string());
        url
    }

    /// `{ws}/ws/{room}`
    pub fn channel(&self, room_id: &RoomId) -> Url {
        with_segments(&self.ws_base, &["ws", room_id.as_str()])
    }
}

fn parse_base(input: &str, schemes: &'static [&'static str]) -> Result<Url, EndpointError> {
    let url = Url::parse(input)
        .map_err(|e| EndpointError::Parse { input: input.to_string(), reason: e.to_string() })?;

    if !schemes.contains(&url.scheme()) {
        return Err(EndpointError::Scheme { found: url.scheme().to_string(), expected: schemes });
    }
    if url.cannot_be_a_base() {
        return Err(EndpointError::NotABase(input.to_string()));
    }
    Ok(url)
}

/// Append segments to a validated base.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Bases are checked by `parse_base`, so this only fails for
    // cannot-be-a-base URLs, which never get here
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
