//! Server binary entry point.

use std::sync::Arc;

use grabcal_core::tracing::{TracingConfig, init_tracing};
use grabcal_extract::{GeminiConfig, GeminiExtractor};
use grabcal_server::{AppState, ServerConfig, ServerError, ServerResult, start_server};

#[tokio::main]
async fn main() -> ServerResult<()> {
    init_tracing(TracingConfig::server())
        .map_err(|e| ServerError::config(format!("failed to initialize tracing: {e}")))?;

    let config = ServerConfig::from_env();

    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| ServerError::config("GEMINI_API_KEY is not set"))?;
    let mut gemini = GeminiConfig::new(api_key);
    if let Ok(model) = std::env::var("GRABCAL_MODEL") {
        gemini = gemini.with_model(model);
    }
    if let Ok(endpoint) = std::env::var("GRABCAL_GEMINI_ENDPOINT") {
        gemini = gemini.with_endpoint(endpoint);
    }
    let extractor = GeminiExtractor::new(gemini)?;

    let state = AppState::new(Arc::new(extractor), config.extraction_timeout);
    start_server(&config.bind_addr, state).await
}
