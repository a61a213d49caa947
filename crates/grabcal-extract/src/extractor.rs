//! EventExtractor trait definition and the contract boundary.
//!
//! [`EventExtractor`] is the abstraction over the text-to-structured-data
//! inference collaborator. [`run_extraction`] is the contract boundary of the
//! whole system: it bounds one attempt with a timeout and converts every
//! failure into an error-shaped [`ExtractionResult`], so callers above it
//! always receive something renderable and never an unhandled fault.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use grabcal_core::ExtractionResult;
use tracing::warn;

use crate::error::{ExtractError, ExtractErrorCode, ExtractResult};

/// Default bound on a single inference attempt.
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// One extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Page text or structured-data excerpt to analyze.
    pub text: String,
    /// Timezone applied at render time to events that carry none.
    pub fallback_timezone: String,
}

impl ExtractionRequest {
    /// Creates a request with the default `UTC` fallback timezone.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback_timezone: "UTC".to_string(),
        }
    }

    /// Builder method to set the fallback timezone.
    pub fn with_fallback_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.fallback_timezone = timezone.into();
        self
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe, so the server can hold the configured
/// extractor as `Arc<dyn EventExtractor>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The abstraction over the inference collaborator.
///
/// Implementations make exactly one inference attempt per call and report
/// every failure mode as an [`ExtractError`]; retries and timeouts are the
/// caller's concern (see [`run_extraction`]).
pub trait EventExtractor: Send + Sync {
    /// Returns the name of this extractor (e.g. "gemini").
    fn name(&self) -> &str;

    /// Runs one inference attempt over the request text.
    fn extract(
        &self,
        request: ExtractionRequest,
    ) -> BoxFuture<'_, ExtractResult<ExtractionResult>>;
}

/// Runs one bounded extraction attempt and seals the contract boundary.
///
/// At most one inference attempt is made; there are no retries. A timeout or
/// any [`ExtractError`] becomes `ExtractionResult::Failed` with a
/// user-presentable message, while the detailed error goes to the log.
pub async fn run_extraction(
    extractor: &dyn EventExtractor,
    request: ExtractionRequest,
    timeout: Duration,
) -> ExtractionResult {
    match tokio::time::timeout(timeout, extractor.extract(request)).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(extractor = extractor.name(), error = %err, "extraction failed");
            ExtractionResult::failed(err.user_message())
        }
        Err(_) => {
            let err = ExtractError::timeout(format!(
                "no response within {} seconds",
                timeout.as_secs()
            ));
            warn!(extractor = extractor.name(), error = %err, "extraction timed out");
            ExtractionResult::failed(err.user_message())
        }
    }
}

/// An extractor that returns a fixed result.
///
/// Useful for tests and for wiring the server without inference credentials.
#[derive(Debug, Clone)]
pub struct FixedExtractor {
    result: ExtractionResult,
}

impl FixedExtractor {
    /// Creates an extractor that always returns `result`.
    pub fn new(result: ExtractionResult) -> Self {
        Self { result }
    }
}

impl EventExtractor for FixedExtractor {
    fn name(&self) -> &str {
        "fixed"
    }

    fn extract(
        &self,
        _request: ExtractionRequest,
    ) -> BoxFuture<'_, ExtractResult<ExtractionResult>> {
        let result = self.result.clone();
        Box::pin(async move { Ok(result) })
    }
}

/// An extractor that always fails.
#[derive(Debug)]
pub struct FailingExtractor {
    code: ExtractErrorCode,
    message: String,
}

impl FailingExtractor {
    /// Creates an extractor that always fails with the given error.
    pub fn new(code: ExtractErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl EventExtractor for FailingExtractor {
    fn name(&self) -> &str {
        "failing"
    }

    fn extract(
        &self,
        _request: ExtractionRequest,
    ) -> BoxFuture<'_, ExtractResult<ExtractionResult>> {
        let error = ExtractError::new(self.code, self.message.clone());
        Box::pin(async move { Err(error) })
    }
}
