//! Server configuration.
//!
//! Everything configurable is resolved once at startup, from the environment
//! or from explicit builder calls; nothing reads the environment per request.

use std::time::Duration;

use grabcal_extract::DEFAULT_EXTRACTION_TIMEOUT;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,

    /// Bound on a single extraction attempt.
    pub extraction_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration with the given bind address.
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ..Default::default()
        }
    }

    /// Builder: set the extraction timeout.
    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    /// Resolves the configuration from the environment.
    ///
    /// Reads `GRABCAL_ADDR` and `GRABCAL_EXTRACT_TIMEOUT_SECS`; anything
    /// unset or unparseable keeps its default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("GRABCAL_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = std::env::var("GRABCAL_EXTRACT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.extraction_timeout = Duration::from_secs(secs);
        }
        config
    }
}
