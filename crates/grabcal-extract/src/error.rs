//! Error types for extraction operations.
//!
//! Everything that can go wrong between the contract boundary and the
//! inference collaborator lands here. These errors never reach the HTTP
//! caller directly: the boundary in [`crate::extractor::run_extraction`]
//! converts them into an error-shaped extraction result first.

use std::fmt;
use thiserror::Error;

/// The category of an extraction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractErrorCode {
    /// Network error - connection failed, DNS resolution, etc.
    NetworkError,
    /// The inference call exceeded its time budget.
    Timeout,
    /// The inference API answered with an error status.
    ApiError,
    /// The inference reply failed schema validation.
    InvalidResponse,
    /// Configuration error - missing or invalid config.
    ConfigurationError,
}

impl ExtractErrorCode {
    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::ApiError => "api_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ExtractErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while running an extraction.
#[derive(Debug, Error)]
pub struct ExtractError {
    /// The error code categorizing this error.
    code: ExtractErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExtractError {
    /// Creates a new extraction error with the given code and message.
    pub fn new(code: ExtractErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::NetworkError, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::Timeout, message)
    }

    /// Creates an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::ApiError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ExtractErrorCode::ConfigurationError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ExtractErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a message suitable for showing to an end user.
    ///
    /// The detailed message stays in the logs; the fragment gets a short
    /// plain-language line.
    pub fn user_message(&self) -> &'static str {
        match self.code {
            ExtractErrorCode::NetworkError => "Could not reach the event extraction service.",
            ExtractErrorCode::Timeout => {
                "The event extraction service took too long to respond. Please try again."
            }
            ExtractErrorCode::ApiError => "The event extraction service reported an error.",
            ExtractErrorCode::InvalidResponse => {
                "The event extraction service returned an unusable answer."
            }
            ExtractErrorCode::ConfigurationError => {
                "The event extraction service is not configured."
            }
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(ExtractErrorCode::NetworkError.as_str(), "network_error");
        assert_eq!(ExtractErrorCode::Timeout.as_str(), "timeout");
        assert_eq!(ExtractErrorCode::InvalidResponse.as_str(), "invalid_response");
    }

    #[test]
    fn error_creation() {
        let err = ExtractError::timeout("no response within 30 seconds");
        assert_eq!(err.code(), ExtractErrorCode::Timeout);
        assert_eq!(err.message(), "no response within 30 seconds");
    }

    #[test]
    fn error_display() {
        let err = ExtractError::api("upstream returned 500");
        let display = format!("{}", err);
        assert!(display.contains("api_error"));
        assert!(display.contains("upstream returned 500"));
    }

    #[test]
    fn error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = ExtractError::network("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn user_messages_hide_detail() {
        let err = ExtractError::api("Gemini returned 503: {\"error\": ...}");
        assert!(!err.user_message().contains("503"));
        assert!(!err.user_message().is_empty());
    }
}
