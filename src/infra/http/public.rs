use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
};

use crate::{
    application::{
        error::HttpError,
        settings::{GameSettings, SettingsService},
    },
    cache::{CacheState, response_cache_layer},
};

use super::{
    admin,
    middleware::{log_requests, set_request_context},
};

const SOURCE: &str = "infra::http::public";

#[derive(Clone)]
pub struct HttpState {
    pub settings: Arc<SettingsService>,
    pub cache: CacheState,
}

pub fn build_router(state: HttpState) -> Router {
    // Routes served through the response cache
    let cached_routes = Router::new()
        .route("/{game}/settings", get(game_settings))
        .route_layer(middleware::from_fn_with_state(
            state.cache.clone(),
            response_cache_layer,
        ));

    cached_routes
        .merge(admin::routes())
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
        .layer(middleware::from_fn(set_request_context))
}

async fn game_settings(
    State(state): State<HttpState>,
    Path(game): Path<String>,
) -> Result<Json<GameSettings>, HttpError> {
    let settings = state.settings.find(&game).map_err(|err| {
        HttpError::from_error(SOURCE, StatusCode::NOT_FOUND, "Unknown game", &err)
    })?;
    Ok(Json(settings.clone()))
}
