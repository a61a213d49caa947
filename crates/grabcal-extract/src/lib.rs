//! EventExtractor trait and implementations (Gemini structured output)

pub mod error;
pub mod extractor;
pub mod gemini;

pub use error::{ExtractError, ExtractErrorCode, ExtractResult};
pub use extractor::{
    run_extraction, BoxFuture, EventExtractor, ExtractionRequest, FailingExtractor,
    FixedExtractor, DEFAULT_EXTRACTION_TIMEOUT,
};
pub use gemini::{GeminiConfig, GeminiExtractor};
