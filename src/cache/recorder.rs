//! Capture of downstream responses.
//!
//! A [`ResponseRecorder`] buffers what the backend produced so the cache can
//! keep a copy. In live mode the buffered response is handed back for delivery
//! to the client; in discard mode nothing is delivered anywhere.

use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use thiserror::Error;

/// Whether the recorded response still goes to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    Live,
    Discard,
}

/// Status, headers and body observed from the backend.
#[derive(Debug, Clone)]
pub struct Recording {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recording {
    /// Only an exact `200 OK` may enter the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Result of a successful recording.
#[derive(Debug)]
pub struct Recorded {
    pub recording: Recording,
    /// The rebuilt response for the client; `None` in discard mode.
    pub delivery: Option<Response>,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to buffer response body: {0}")]
    Buffer(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseRecorder {
    mode: RecordMode,
}

impl ResponseRecorder {
    pub fn live() -> Self {
        Self {
            mode: RecordMode::Live,
        }
    }

    pub fn discard() -> Self {
        Self {
            mode: RecordMode::Discard,
        }
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    /// Buffer `response` and capture its status, headers and body.
    ///
    /// On failure the live-mode delivery carries the original status and
    /// headers with an empty body.
    pub async fn record(
        self,
        response: Response,
    ) -> Result<Recorded, (Option<Response>, RecorderError)> {
        let (parts, body) = response.into_parts();
        match BodyExt::collect(body).await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                let recording = Recording {
                    status: parts.status,
                    headers: parts.headers.clone(),
                    body: bytes.clone(),
                };
                let delivery = match self.mode {
                    RecordMode::Live => Some(Response::from_parts(parts, Body::from(bytes))),
                    RecordMode::Discard => None,
                };
                Ok(Recorded {
                    recording,
                    delivery,
                })
            }
            Err(error) => {
                let delivery = match self.mode {
                    RecordMode::Live => Some(Response::from_parts(parts, Body::empty())),
                    RecordMode::Discard => None,
                };
                Err((delivery, RecorderError::Buffer(error.to_string())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::header::{CONTENT_TYPE, SET_COOKIE},
        response::IntoResponse,
    };

    use super::*;

    fn backend_response() -> Response {
        (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/json")],
            r#"{"ok":true}"#,
        )
            .into_response()
    }

    #[tokio::test]
    async fn live_recorder_captures_and_delivers() {
        let recorded = ResponseRecorder::live()
            .record(backend_response())
            .await
            .expect("recording");

        assert_eq!(recorded.recording.status, StatusCode::OK);
        assert_eq!(
            recorded.recording.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(recorded.recording.body, Bytes::from(r#"{"ok":true}"#));

        let delivered = recorded.delivery.expect("live delivery");
        assert_eq!(delivered.status(), StatusCode::OK);
        let body = delivered.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn discard_recorder_captures_without_delivery() {
        let recorded = ResponseRecorder::discard()
            .record(backend_response())
            .await
            .expect("recording");

        assert!(recorded.delivery.is_none());
        assert_eq!(recorded.recording.body, Bytes::from(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn multi_valued_headers_are_preserved() {
        let mut response = backend_response();
        response
            .headers_mut()
            .append(SET_COOKIE, "a=1".parse().unwrap());
        response
            .headers_mut()
            .append(SET_COOKIE, "b=2".parse().unwrap());

        let recorded = ResponseRecorder::discard()
            .record(response)
            .await
            .expect("recording");

        let cookies: Vec<_> = recorded
            .recording
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
    }

    #[tokio::test]
    async fn only_exact_ok_is_cacheable() {
        for (status, cacheable) in [
            (StatusCode::OK, true),
            (StatusCode::CREATED, false),
            (StatusCode::NO_CONTENT, false),
            (StatusCode::FOUND, false),
            (StatusCode::NOT_FOUND, false),
            (StatusCode::INTERNAL_SERVER_ERROR, false),
        ] {
            let recorded = ResponseRecorder::discard()
                .record(status.into_response())
                .await
                .expect("recording");
            assert_eq!(recorded.recording.is_cacheable(), cacheable, "{status}");
        }
    }
}
