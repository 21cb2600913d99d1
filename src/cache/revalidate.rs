//! Background refresh of stale entries.
//!
//! A refresh runs detached from the request that found the entry stale. The
//! backend is invoked through a discard recorder, so nothing reaches a client.
//! On `200 OK` the entry is replaced; on anything else the existing entry is
//! kept and its next refresh is pushed out by twice the revalidate window.

use std::{any::Any, panic::AssertUnwindSafe};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
};
use futures::FutureExt;
use metrics::counter;
use time::OffsetDateTime;
use tracing::{Instrument, error, info, info_span, warn};

use super::{
    CacheEntry, CacheState, ResponseRecorder,
    counters::{METRIC_CACHE_REVALIDATE_FAILURE_TOTAL, METRIC_CACHE_REVALIDATE_SUCCESS_TOTAL},
};

/// What a refresh did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidationOutcome {
    /// The backend answered `200 OK` and the entry was replaced.
    Refreshed,
    /// The backend failed; the entry's next refresh was postponed.
    BackedOff,
    /// The backend failed and the entry had already been removed.
    EntryGone,
}

/// Start a detached refresh for `key`. The caller never observes the result.
///
/// There is no per-key deduplication: every call issues its own backend request.
pub fn spawn_revalidation(state: CacheState, key: String, request: Request<Body>, next: Next) {
    let span = info_span!("revalidate", key = %key);
    tokio::spawn(
        async move {
            revalidate(&state, &key, request, next).await;
        }
        .instrument(span),
    );
}

/// Re-run the backend for `key` and update the store with the outcome.
pub async fn revalidate(
    state: &CacheState,
    key: &str,
    request: Request<Body>,
    next: Next,
) -> RevalidationOutcome {
    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            error!(
                key,
                panic = panic_message(panic.as_ref()),
                "backend panicked during revalidation"
            );
            return back_off(state, key, None);
        }
    };

    let recorded = match ResponseRecorder::discard().record(response).await {
        Ok(recorded) => recorded,
        Err((_, err)) => {
            error!(key, error = %err, "failed to capture revalidation response");
            return back_off(state, key, None);
        }
    };

    let recording = recorded.recording;
    if !recording.is_cacheable() {
        return back_off(state, key, Some(recording.status));
    }

    let entry = CacheEntry::new(
        recording.body,
        recording.headers,
        OffsetDateTime::now_utc(),
        &state.config,
    );
    state.store.store(key, entry);
    counter!(METRIC_CACHE_REVALIDATE_SUCCESS_TOTAL).increment(1);
    info!(key, "revalidation succeeded");
    RevalidationOutcome::Refreshed
}

/// Keep serving the last good copy but postpone the next refresh.
///
/// The new `revalidate_at` is measured from now, so repeated failures do not
/// compound.
fn back_off(state: &CacheState, key: &str, status: Option<StatusCode>) -> RevalidationOutcome {
    counter!(METRIC_CACHE_REVALIDATE_FAILURE_TOTAL).increment(1);

    let revalidate_at = OffsetDateTime::now_utc() + state.config.backoff();
    let extended = state.store.extend_revalidation(key, revalidate_at);

    warn!(
        key,
        status = status.map(|status| status.as_u16()),
        extended,
        %revalidate_at,
        "revalidation failed"
    );

    if extended {
        RevalidationOutcome::BackedOff
    } else {
        RevalidationOutcome::EntryGone
    }
}

/// Copy of `request` suitable for a second trip through the backend.
///
/// Method, URI, version, headers and extensions are kept; the body is empty
/// because only GET requests are cached.
pub(crate) fn duplicate_request(request: &Request<Body>) -> Request<Body> {
    let mut duplicate = Request::new(Body::empty());
    *duplicate.method_mut() = request.method().clone();
    *duplicate.uri_mut() = request.uri().clone();
    *duplicate.version_mut() = request.version();
    *duplicate.headers_mut() = request.headers().clone();
    *duplicate.extensions_mut() = request.extensions().clone();
    duplicate
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
