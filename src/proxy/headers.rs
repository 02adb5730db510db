//! Header utilities for platform proxying
//!
//! The browser client's headers (including its `x-api-key` session header)
//! are forwarded to the platform, minus everything that describes the
//! inbound connection or body framing.

use axum::http::header::{self, HeaderName};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;

/// Hop-by-hop headers that must never be forwarded
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Framing headers that are stale once the body is re-serialized
const REFRAMED_HEADERS: &[HeaderName] = &[header::CONTENT_LENGTH, header::ACCEPT_ENCODING];

/// Response headers relayed back to the browser client
const RELAYED_RESPONSE_HEADERS: &[HeaderName] = &[
    header::CONTENT_TYPE,
    header::SET_COOKIE,
    header::AUTHORIZATION,
];

/// Check if a header is a hop-by-hop header that should not be forwarded
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == "keep-alive"
}

/// Build the outbound header set for a forwarded request
///
/// Drops hop-by-hop and framing headers and points `host` at the upstream.
pub fn sanitize_request_headers(incoming: &HeaderMap, upstream_host: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(incoming.len());

    for (name, value) in incoming {
        if is_hop_by_hop_header(name) || REFRAMED_HEADERS.contains(name) || *name == header::HOST {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    headers.insert(header::HOST, upstream_host.clone());
    headers
}

/// Pick the upstream response headers the client is allowed to see
pub fn select_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut selected = HeaderMap::new();

    for name in RELAYED_RESPONSE_HEADERS {
        for value in upstream.get_all(name) {
            selected.append(name.clone(), value.clone());
        }
    }

    selected
}

/// `host` header value for an upstream base URL (port only when non-default)
pub fn upstream_authority(url: &Url) -> Option<HeaderValue> {
    let host = url.host_str()?;
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&authority).ok()
}
