//! HTTP request handlers.
//!
//! The extract handler is the transport boundary described by the error
//! policy: a missing or empty `text` is the only 4xx case. Every failure
//! past that point (extractor errors, timeouts, "no event found") comes
//! back as HTTP 200 with an error fragment, so the calling UI always has
//! renderable content and never needs to special-case transport failures.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use grabcal_core::{render, render_error, timezone};
use grabcal_extract::{ExtractionRequest, run_extraction};

use crate::AppState;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server is up.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Extraction request body, shared by the JSON and form encodings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequestBody {
    /// Page content or structured-data excerpt.
    #[serde(default)]
    pub text: Option<String>,
    /// IANA identifier used as fallback for events without a timezone.
    #[serde(default)]
    pub browser_timezone: Option<String>,
}

impl ExtractRequestBody {
    /// Decodes a request body according to its content type.
    ///
    /// JSON is the primary encoding. The form encoding exists for pages
    /// whose content-security policy blocks direct calls and routes the
    /// request through a form submission instead; both decode to the same
    /// request.
    fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, String> {
        let is_form = content_type
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let mut decoded = Self::default();
            for (key, value) in url::form_urlencoded::parse(body) {
                match key.as_ref() {
                    "text" => decoded.text = Some(value.into_owned()),
                    "browserTimezone" => decoded.browser_timezone = Some(value.into_owned()),
                    _ => {}
                }
            }
            Ok(decoded)
        } else {
            serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {e}"))
        }
    }

    /// The effective fallback timezone for this request.
    ///
    /// An absent or unrecognized `browserTimezone` falls back to UTC.
    fn fallback_timezone(&self) -> String {
        match self.browser_timezone.as_deref() {
            None => "UTC".to_string(),
            Some(raw) => timezone::resolve(raw).unwrap_or_else(|| {
                warn!(timezone = raw, "unrecognized browser timezone, using UTC");
                "UTC".to_string()
            }),
        }
    }
}

/// `POST /api/extract-event`: extract events from page text and answer with
/// an HTML fragment.
pub async fn extract_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let request = match ExtractRequestBody::decode(content_type, &body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejecting undecodable request body");
            return bad_request("The request body could not be decoded.");
        }
    };

    let Some(text) = request.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return bad_request("No text provided.");
    };

    let fallback_timezone = request.fallback_timezone();
    info!(
        text_len = text.len(),
        fallback_timezone = %fallback_timezone,
        "extraction request"
    );

    let extraction = ExtractionRequest::new(text).with_fallback_timezone(&fallback_timezone);
    let result = run_extraction(
        state.extractor.as_ref(),
        extraction,
        state.extraction_timeout,
    )
    .await;

    Html(render(&result, &fallback_timezone)).into_response()
}

/// A 400 answer carrying the same error fragment shape as extraction
/// failures.
fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(render_error(message))).into_response()
}
