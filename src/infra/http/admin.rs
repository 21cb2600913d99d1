use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{application::error::HttpError, cache::counters::METRIC_CACHE_INVALIDATE_TOTAL};

use super::HttpState;

const SOURCE: &str = "infra::http::admin";

#[derive(Debug, Deserialize)]
struct InvalidateRequest {
    route: String,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

pub(super) fn routes() -> Router<HttpState> {
    Router::new()
        .route("/invalidate", post(invalidate_route))
        .route("/_cache", delete(invalidate_all))
}

/// Drop the cached entry for one route. Absent routes are not an error.
async fn invalidate_route(
    State(state): State<HttpState>,
    body: Bytes,
) -> Result<Json<MessageBody>, HttpError> {
    let request: InvalidateRequest = serde_json::from_slice(&body).map_err(|err| {
        HttpError::from_error(SOURCE, StatusCode::BAD_REQUEST, "Invalid request", &err)
    })?;

    let removed = state.cache.store.delete(&request.route);
    counter!(METRIC_CACHE_INVALIDATE_TOTAL).increment(1);
    info!(route = %request.route, removed, "cache invalidated");

    Ok(Json(MessageBody {
        message: "Cache invalidated",
    }))
}

async fn invalidate_all(State(state): State<HttpState>) -> Response {
    state.cache.store.clear();
    counter!(METRIC_CACHE_INVALIDATE_TOTAL).increment(1);
    info!("cache cleared");
    StatusCode::NO_CONTENT.into_response()
}
