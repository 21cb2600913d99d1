//! Routing, invalidation and error responses of the assembled router.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header::CONTENT_TYPE},
};
use bytes::Bytes;
use swrcache::{
    application::settings::SettingsService,
    cache::{CACHE_STATUS_HEADER, CacheConfig, CacheState},
    infra::http::{HttpState, build_router},
};
use tower::ServiceExt;

fn router() -> (Router, CacheState) {
    let cache = CacheState::new(CacheConfig::default());
    let state = HttpState {
        settings: Arc::new(SettingsService::with_defaults()),
        cache: cache.clone(),
    };
    (build_router(state), cache)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: &'static str,
) -> (StatusCode, HeaderMap, Bytes) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should buffer");
    (status, headers, body)
}

fn x_cache(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(&CACHE_STATUS_HEADER)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn settings_are_served_as_json_and_cached() {
    let (app, cache) = router();

    let (status, headers, body) = call(&app, Method::GET, "/blackjack/settings", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(x_cache(&headers), Some("MISS"));
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    insta::assert_snapshot!(
        String::from_utf8_lossy(&body),
        @r#"{"game":{"name":"Blackjack","slug":"blackjack","description":"The classic casino game"},"betrates":[1,2,3,4,5]}"#
    );

    let (_, headers, cached_body) = call(&app, Method::GET, "/blackjack/settings", "").await;
    assert_eq!(x_cache(&headers), Some("HIT"));
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert_eq!(cached_body, body);
    assert_eq!(cache.store.len(), 1);
}

#[tokio::test]
async fn unknown_game_is_not_cached() {
    let (app, cache) = router();

    let (status, headers, body) = call(&app, Method::GET, "/roulette/settings", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(x_cache(&headers), Some("MISS"));
    assert_eq!(&body[..], br#"{"error":"Unknown game"}"#);
    assert!(cache.store.is_empty());
}

#[tokio::test]
async fn invalidation_forces_the_next_request_to_miss() {
    let (app, cache) = router();

    call(&app, Method::GET, "/blackjack/settings", "").await;
    let (_, headers, _) = call(&app, Method::GET, "/blackjack/settings", "").await;
    assert_eq!(x_cache(&headers), Some("HIT"));

    let (status, headers, body) = call(
        &app,
        Method::POST,
        "/invalidate",
        r#"{"route":"/blackjack/settings"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert_eq!(&body[..], br#"{"message":"Cache invalidated"}"#);
    assert!(x_cache(&headers).is_none());
    assert!(cache.store.load("/blackjack/settings").is_none());

    let (_, headers, _) = call(&app, Method::GET, "/blackjack/settings", "").await;
    assert_eq!(x_cache(&headers), Some("MISS"));
}

#[tokio::test]
async fn invalidating_an_absent_route_succeeds() {
    let (app, _) = router();

    let (status, _, body) = call(&app, Method::POST, "/invalidate", r#"{"route":"/nope"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"message":"Cache invalidated"}"#);
}

#[tokio::test]
async fn malformed_invalidation_is_rejected() {
    let (app, _) = router();

    for payload in ["", "not json", r#"{"path":"/blackjack/settings"}"#] {
        let (status, _, body) = call(&app, Method::POST, "/invalidate", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload:?}");
        assert_eq!(&body[..], br#"{"error":"Invalid request"}"#);
    }
}

#[tokio::test]
async fn clearing_the_cache_drops_every_entry() {
    let (app, cache) = router();
    call(&app, Method::GET, "/blackjack/settings", "").await;
    assert_eq!(cache.store.len(), 1);

    let (status, _, _) = call(&app, Method::DELETE, "/_cache", "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(cache.store.is_empty());
}

#[tokio::test]
async fn unmatched_routes_skip_the_cache() {
    let (app, cache) = router();

    let (status, headers, _) = call(&app, Method::GET, "/elsewhere", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(x_cache(&headers).is_none());
    assert!(cache.store.is_empty());
}
