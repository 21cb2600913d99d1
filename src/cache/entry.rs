//! Cached response entries and their lifecycle.

use axum::http::HeaderMap;
use bytes::Bytes;
use time::OffsetDateTime;

use super::CacheConfig;

/// One cached response.
///
/// Entries are immutable once stored. Refreshing or backing off produces a
/// new entry that replaces the old one in the store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: Bytes,
    pub headers: HeaderMap,
    pub expires_at: OffsetDateTime,
    pub revalidate_at: OffsetDateTime,
}

/// Where an entry sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Servable without contacting the backend.
    Fresh,
    /// Servable, but a background refresh must be started.
    Stale,
    /// Not servable; treated as absent.
    Expired,
}

impl CacheEntry {
    /// Build an entry whose windows start at `now`.
    pub fn new(body: Bytes, headers: HeaderMap, now: OffsetDateTime, config: &CacheConfig) -> Self {
        Self {
            body,
            headers,
            expires_at: now + config.cache_ttl,
            revalidate_at: now + config.revalidate_ttl,
        }
    }

    pub fn freshness(&self, now: OffsetDateTime) -> Freshness {
        if now >= self.expires_at {
            Freshness::Expired
        } else if now >= self.revalidate_at {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// Copy of this entry with only `revalidate_at` moved.
    pub fn with_revalidate_at(&self, revalidate_at: OffsetDateTime) -> Self {
        Self {
            revalidate_at,
            ..self.clone()
        }
    }
}
