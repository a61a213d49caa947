//! HTTP endpoint for event extraction.
//!
//! Exposes a single extraction route plus a health check:
//! - `POST /api/extract-event`: page text in, HTML fragment out
//! - `GET /health`: liveness probe
//!
//! CORS is fully permissive (the caller is a bookmarklet running on
//! arbitrary origins) and `OPTIONS` pre-flights are answered by the CORS
//! layer. Requests share nothing but the `Arc`'d extractor handle; there is
//! no cross-request state.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use grabcal_extract::EventExtractor;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The configured inference collaborator.
    pub extractor: Arc<dyn EventExtractor>,
    /// Bound on a single extraction attempt.
    pub extraction_timeout: Duration,
}

impl AppState {
    /// Creates the shared state.
    pub fn new(extractor: Arc<dyn EventExtractor>, extraction_timeout: Duration) -> Self {
        Self {
            extractor,
            extraction_timeout,
        }
    }
}

/// Builds the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/extract-event", post(handlers::extract_event))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves until shutdown.
pub async fn start_server(addr: &str, state: AppState) -> ServerResult<()> {
    tracing::info!("Starting grabcal extraction server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use grabcal_core::{EventRecord, ExtractionResult};
    use grabcal_extract::{ExtractErrorCode, FailingExtractor, FixedExtractor};
    use tower::ServiceExt;

    fn single_event_state() -> AppState {
        let event = EventRecord::new("Tech Conference", "2024-03-15T09:00:00")
            .with_location("San Francisco Convention Center");
        AppState::new(
            Arc::new(FixedExtractor::new(ExtractionResult::Single { event })),
            Duration::from_secs(30),
        )
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/extract-event")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = build_router(single_event_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"ok\""));
    }

    #[tokio::test]
    async fn extraction_answers_fragment() {
        let response = build_router(single_event_state())
            .oneshot(json_request(
                r#"{"text": "Tech Conference on March 15, 2024 at 9:00 AM", "browserTimezone": "America/Los_Angeles"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Tech Conference"));
        assert!(body.contains("ctz=America%2FLos_Angeles"));
        assert!(body.contains("dates=20240315T090000"));
    }

    #[tokio::test]
    async fn form_encoded_body_is_accepted() {
        let response = build_router(single_event_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/extract-event")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(
                        "text=Tech%20Conference&browserTimezone=America%2FLos_Angeles",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Tech Conference"));
    }

    #[tokio::test]
    async fn empty_text_is_bad_request() {
        let response = build_router(single_event_state())
            .oneshot(json_request(r#"{"text": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("No text provided."));
    }

    #[tokio::test]
    async fn missing_text_is_bad_request() {
        let response = build_router(single_event_state())
            .oneshot(json_request(r#"{"browserTimezone": "UTC"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn extractor_failure_is_still_ok() {
        let state = AppState::new(
            Arc::new(FailingExtractor::new(
                ExtractErrorCode::NetworkError,
                "connection refused",
            )),
            Duration::from_secs(30),
        );
        let response = build_router(state)
            .oneshot(json_request(r#"{"text": "Concert on Friday"}"#))
            .await
            .unwrap();
        // Failures render as fragments, not transport errors.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("No Event Found"));
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let response = build_router(single_event_state())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/extract-event")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let response = build_router(single_event_state())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/extract-event")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
