//! Response cache middleware.
//!
//! Caches `200 OK` responses to GET requests keyed by path and serves them
//! back with an `X-Cache` indicator:
//!
//! - `HIT`: the entry is fresh, the backend is not called.
//! - `STALE`: the entry is past its revalidate time but not expired; it is
//!   served immediately and a detached refresh is started.
//! - `MISS`: no servable entry; the backend response is delivered and, when
//!   it is `200 OK`, stored.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::{
    CacheConfig, CacheEntry, CacheStore, Freshness, ResponseRecorder,
    counters::{
        METRIC_CACHE_EXPIRED_TOTAL, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_MISS_TOTAL,
        METRIC_CACHE_STALE_TOTAL,
    },
    keys::{CACHE_STATUS_HEADER, CacheStatus, cache_key},
    revalidate::{duplicate_request, spawn_revalidation},
};

/// Shared cache state for middleware.
#[derive(Clone)]
pub struct CacheState {
    pub config: CacheConfig,
    pub store: Arc<CacheStore>,
}

impl CacheState {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            store: Arc::new(CacheStore::new()),
        }
    }
}

/// Middleware implementing stale-while-revalidate response caching.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.config.enabled {
        return next.run(request).await;
    }

    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    let now = OffsetDateTime::now_utc();

    if let Some(entry) = cache.store.load(&key) {
        match entry.freshness(now) {
            Freshness::Fresh => {
                counter!(METRIC_CACHE_HIT_TOTAL).increment(1);
                debug!(outcome = "hit", "serving cached response");
                return build_response(&entry, CacheStatus::Hit);
            }
            Freshness::Stale => {
                counter!(METRIC_CACHE_STALE_TOTAL).increment(1);
                debug!(
                    outcome = "stale",
                    revalidate_at = %entry.revalidate_at,
                    "serving stale response, revalidating in background"
                );
                let duplicate = duplicate_request(&request);
                spawn_revalidation(cache.clone(), key, duplicate, next);
                return build_response(&entry, CacheStatus::Stale);
            }
            Freshness::Expired => {
                counter!(METRIC_CACHE_EXPIRED_TOTAL).increment(1);
                debug!(outcome = "expired", "dropping expired entry");
                cache.store.delete_expired(&key, now);
            }
        }
    }

    counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
    debug!(outcome = "miss", "cache miss, executing handler");

    let response = next.run(request).await;
    let mut response = match ResponseRecorder::live().record(response).await {
        Ok(recorded) => {
            let recording = recorded.recording;
            if recording.is_cacheable() {
                debug!(bytes = recording.body.len(), "caching response");
                let entry = CacheEntry::new(
                    recording.body,
                    recording.headers,
                    OffsetDateTime::now_utc(),
                    &cache.config,
                );
                cache.store.store(key, entry);
            } else {
                debug!(
                    status = recording.status.as_u16(),
                    "response not cacheable"
                );
            }
            recorded
                .delivery
                .unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err((delivery, err)) => {
            warn!(error = %err, "failed to capture backend response, not caching");
            delivery.unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    };

    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, CacheStatus::Miss.header_value());
    response
}

/// Build a `200 OK` response from a cached entry.
fn build_response(entry: &CacheEntry, status: CacheStatus) -> Response {
    let mut response = Response::new(Body::from(entry.body.clone()));
    *response.headers_mut() = entry.headers.clone();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, status.header_value());
    response
}
