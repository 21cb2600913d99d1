//! Cache configuration.
//!
//! Controls the response cache windows via the `[cache]` section of `swrcache.toml`.

use std::time::Duration;

// Default values for cache configuration
const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;
const DEFAULT_REVALIDATE_TTL_SECS: u64 = 5 * 60;

/// Runtime cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Enable the response cache. When disabled the middleware is a passthrough.
    pub enabled: bool,
    /// Full lifetime of an entry (fresh plus stale window).
    pub cache_ttl: Duration,
    /// Freshness window after which a background refresh is triggered.
    pub revalidate_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            revalidate_ttl: Duration::from_secs(DEFAULT_REVALIDATE_TTL_SECS),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            cache_ttl: settings.ttl,
            revalidate_ttl: settings.revalidate,
        }
    }
}

impl CacheConfig {
    /// Delay applied to `revalidate_at` after a failed refresh.
    pub fn backoff(&self) -> Duration {
        self.revalidate_ttl.saturating_mul(2)
    }
}
