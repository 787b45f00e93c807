//! Error types for the cohort-models crate.

use cohort_provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Backend error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Model runtime error: {0}")]
    Runtime(String),

    /// Host resource statistics could not be read
    #[error("Host probe error: {0}")]
    Probe(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
