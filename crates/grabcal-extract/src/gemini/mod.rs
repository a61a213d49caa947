//! Gemini extraction implementation.
//!
//! This module provides a [`GeminiExtractor`] that turns page text into
//! structured event data using the Generative Language API's structured
//! output mode (`responseSchema`).
//!
//! # Example
//!
//! ```ignore
//! use grabcal_extract::gemini::{GeminiConfig, GeminiExtractor};
//!
//! let config = GeminiConfig::new(std::env::var("GEMINI_API_KEY")?)
//!     .with_model("gemini-2.5-flash-lite");
//! let extractor = GeminiExtractor::new(config)?;
//! ```

mod client;
mod config;
mod schema;

pub use client::GeminiExtractor;
pub use config::{GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use schema::{response_schema, validate, WireEvent, WireResponse, WireStatus, MAX_EVENTS};
