//! Error types for the cohort-provider crate.

/// Errors that can occur while talking to the inference backend.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Http(e) if e.is_timeout())
    }
}
