use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::counters::{
    METRIC_CACHE_EXPIRED_TOTAL, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_INVALIDATE_TOTAL,
    METRIC_CACHE_MISS_TOTAL, METRIC_CACHE_REVALIDATE_FAILURE_TOTAL,
    METRIC_CACHE_REVALIDATE_SUCCESS_TOTAL, METRIC_CACHE_STALE_TOTAL, METRIC_CACHE_STORE_TOTAL,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for the cache metrics with the installed recorder.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT_TOTAL,
            Unit::Count,
            "Total number of requests served from a fresh cache entry."
        );
        describe_counter!(
            METRIC_CACHE_STALE_TOTAL,
            Unit::Count,
            "Total number of requests served from a stale entry while revalidating."
        );
        describe_counter!(
            METRIC_CACHE_MISS_TOTAL,
            Unit::Count,
            "Total number of requests forwarded to the backend."
        );
        describe_counter!(
            METRIC_CACHE_EXPIRED_TOTAL,
            Unit::Count,
            "Total number of expired entries dropped on lookup."
        );
        describe_counter!(
            METRIC_CACHE_STORE_TOTAL,
            Unit::Count,
            "Total number of entries written to the cache store."
        );
        describe_counter!(
            METRIC_CACHE_REVALIDATE_SUCCESS_TOTAL,
            Unit::Count,
            "Total number of background refreshes that replaced an entry."
        );
        describe_counter!(
            METRIC_CACHE_REVALIDATE_FAILURE_TOTAL,
            Unit::Count,
            "Total number of background refreshes that backed off."
        );
        describe_counter!(
            METRIC_CACHE_INVALIDATE_TOTAL,
            Unit::Count,
            "Total number of explicit cache invalidations."
        );
    });
}
