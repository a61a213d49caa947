//! Gemini structured-output client.
//!
//! Calls `generateContent` with `responseMimeType: application/json` and the
//! extraction schema, so the model replies with machine-parseable JSON rather
//! than prose. Some models wrap JSON in markdown fences even when asked not
//! to, so the reply is unwrapped before parsing and then validated in
//! [`super::schema`].

use grabcal_core::ExtractionResult;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::config::GeminiConfig;
use super::schema::{self, WireResponse};
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{BoxFuture, EventExtractor, ExtractionRequest};

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f64,
}

/// `generateContent` response body (the parts we read).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// HTTP client for Gemini extraction requests.
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    client: Client,
    config: GeminiConfig,
}

impl GeminiExtractor {
    /// Creates a new extractor from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is empty or the HTTP
    /// client cannot be constructed.
    pub fn new(config: GeminiConfig) -> ExtractResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ExtractError::configuration("Gemini API key is empty"));
        }
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                ExtractError::configuration("failed to build HTTP client").with_source(e)
            })?;
        Ok(Self { client, config })
    }

    async fn generate(&self, request: ExtractionRequest) -> ExtractResult<ExtractionResult> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: schema::extraction_prompt(&request.text),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema::response_schema(),
                temperature: 0.0,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::timeout("Gemini request timed out").with_source(e)
                } else {
                    ExtractError::network("failed to reach Gemini").with_source(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractError::api(format!(
                "Gemini returned {status}: {error_text}"
            )));
        }

        let reply: GenerateResponse = response.json().await.map_err(|e| {
            ExtractError::invalid_response("failed to parse Gemini response").with_source(e)
        })?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ExtractError::invalid_response("Gemini reply carried no content"))?;

        let wire: WireResponse = serde_json::from_str(&extract_json(text)).map_err(|e| {
            ExtractError::invalid_response("Gemini reply was not valid extraction JSON")
                .with_source(e)
        })?;
        debug!(
            status = ?wire.status,
            events = wire.events.len(),
            "parsed Gemini extraction reply"
        );

        schema::validate(wire)
    }
}

impl EventExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        "gemini"
    }

    fn extract(
        &self,
        request: ExtractionRequest,
    ) -> BoxFuture<'_, ExtractResult<ExtractionResult>> {
        Box::pin(self.generate(request))
    }
}

/// Extracts JSON from model output, unwrapping markdown code fences.
fn extract_json(text: &str) -> String {
    let text = text.trim();

    if text.starts_with("```") {
        if let Some(start) = text.find('\n') {
            let after_first_line = &text[start + 1..];
            if let Some(end) = after_first_line.rfind("```") {
                return after_first_line[..end].trim().to_string();
            }
        }
    }

    if let Some(start) = text.find('{') {
        if let Some(end) = text.rfind('}') {
            return text[start..=end].to_string();
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn empty_api_key_is_rejected() {
            let err = GeminiExtractor::new(GeminiConfig::new("")).unwrap_err();
            assert_eq!(
                err.code(),
                crate::error::ExtractErrorCode::ConfigurationError
            );
        }

        #[test]
        fn valid_config_builds() {
            let extractor = GeminiExtractor::new(GeminiConfig::new("key-123")).unwrap();
            assert_eq!(extractor.name(), "gemini");
        }
    }

    mod request_body {
        use super::*;

        #[test]
        fn serializes_camel_case_generation_config() {
            let body = GenerateRequest {
                contents: vec![Content {
                    role: "user".to_string(),
                    parts: vec![Part {
                        text: "prompt".to_string(),
                    }],
                }],
                generation_config: GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: schema::response_schema(),
                    temperature: 0.0,
                },
            };
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(
                json["generationConfig"]["responseMimeType"],
                "application/json"
            );
            assert_eq!(
                json["generationConfig"]["responseSchema"]["type"],
                "OBJECT"
            );
            assert_eq!(json["contents"][0]["role"], "user");
        }
    }

    mod json_unwrapping {
        use super::*;

        #[test]
        fn plain_json_passes_through() {
            assert_eq!(extract_json(r#"{"status":"error"}"#), r#"{"status":"error"}"#);
        }

        #[test]
        fn strips_json_fence() {
            let fenced = "```json\n{\"status\":\"error\"}\n```";
            assert_eq!(extract_json(fenced), r#"{"status":"error"}"#);
        }

        #[test]
        fn strips_bare_fence() {
            let fenced = "```\n{\"status\":\"error\"}\n```";
            assert_eq!(extract_json(fenced), r#"{"status":"error"}"#);
        }

        #[test]
        fn finds_object_inside_prose() {
            let noisy = "Here you go: {\"status\":\"error\"} hope that helps";
            assert_eq!(extract_json(noisy), r#"{"status":"error"}"#);
        }
    }
}
