//! Metric names emitted by the response cache.

pub const METRIC_CACHE_HIT_TOTAL: &str = "swrcache_hit_total";
pub const METRIC_CACHE_STALE_TOTAL: &str = "swrcache_stale_total";
pub const METRIC_CACHE_MISS_TOTAL: &str = "swrcache_miss_total";
pub const METRIC_CACHE_EXPIRED_TOTAL: &str = "swrcache_expired_total";
pub const METRIC_CACHE_STORE_TOTAL: &str = "swrcache_store_total";
pub const METRIC_CACHE_REVALIDATE_SUCCESS_TOTAL: &str = "swrcache_revalidate_success_total";
pub const METRIC_CACHE_REVALIDATE_FAILURE_TOTAL: &str = "swrcache_revalidate_failure_total";
pub const METRIC_CACHE_INVALIDATE_TOTAL: &str = "swrcache_invalidate_total";
