//! Gemini extraction client configuration.

use std::time::Duration;

/// Default model used for extraction.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Default API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini extraction client.
///
/// The endpoint is part of the configuration rather than a literal at the
/// call site, so deployments can point the client at a proxy or a mock.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the Generative Language API.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-flash-lite`).
    pub model: String,
    /// API base URL, up to and including the version segment.
    pub endpoint: String,
    /// Timeout applied to the underlying HTTP request.
    pub http_timeout: Duration,
}

impl GeminiConfig {
    /// Creates a configuration with the given API key and default model,
    /// endpoint, and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Builder method to set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder method to set the HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}
