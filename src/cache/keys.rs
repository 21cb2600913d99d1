//! Cache key derivation and the cache-status indicator.

use axum::http::{HeaderName, HeaderValue, Request};

/// Response header carrying the cache outcome for the request.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Derive the store key for a request.
///
/// Only the path participates; query strings and request headers are ignored,
/// so distinct representations of one path share an entry.
pub fn cache_key<B>(request: &Request<B>) -> String {
    request.uri().path().to_string()
}

/// Outcome reported to clients through [`CACHE_STATUS_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Stale,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Stale => "STALE",
            CacheStatus::Miss => "MISS",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}
