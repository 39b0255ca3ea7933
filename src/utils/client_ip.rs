//! Client address extraction for rate limiting.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Proxy header carrying the original client chain, leftmost first.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Returns the address a request is attributed to.
///
/// With `trust_forwarded` set, the first non-empty `X-Forwarded-For` entry
/// wins. Otherwise, or when the header is absent, the socket peer address is
/// used. The header is client-controlled; it should only be trusted behind a
/// proxy that overwrites it.
///
/// # Examples
///
/// ```
/// use axum::http::HeaderMap;
/// use shortlink::utils::client_ip::client_ip;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_ip(&headers, None, true).as_deref(), Some("203.0.113.7"));
/// assert_eq!(client_ip(&headers, None, false), None);
/// ```
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded: bool,
) -> Option<String> {
    if trust_forwarded && let Some(forwarded) = first_forwarded_for(headers) {
        return Some(forwarded);
    }

    peer.map(|addr| addr.ip().to_string())
}

fn first_forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .map(str::to_string)
}
