//! Shared response cache storage.

use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use time::OffsetDateTime;

use super::{
    counters::METRIC_CACHE_STORE_TOTAL,
    entry::{CacheEntry, Freshness},
};

/// Process-wide map from cache key to the latest cached response.
///
/// Each operation is atomic for its key. Compound sequences such as
/// load-then-store are not, and the last writer wins.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<String, Arc<CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn store(&self, key: impl Into<String>, entry: CacheEntry) {
        counter!(METRIC_CACHE_STORE_TOTAL).increment(1);
        self.entries.insert(key.into(), Arc::new(entry));
    }

    /// Remove `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove `key` only if its entry has expired at `now`.
    ///
    /// An entry stored concurrently after the caller's lookup survives.
    pub fn delete_expired(&self, key: &str, now: OffsetDateTime) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.freshness(now) == Freshness::Expired)
            .is_some()
    }

    /// Replace the entry for `key` with a copy carrying a new `revalidate_at`.
    ///
    /// Returns `false` without storing anything when the key is absent.
    pub fn extend_revalidation(&self, key: &str, revalidate_at: OffsetDateTime) -> bool {
        match self.entries.get_mut(key) {
            Some(mut slot) => {
                let extended = slot.with_revalidate_at(revalidate_at);
                *slot = Arc::new(extended);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Get the number of cached responses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
