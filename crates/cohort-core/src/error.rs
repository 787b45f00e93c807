//! Error types for the cohort-core crate.

use cohort_provider::ProviderError;

/// Errors raised by an individual agent's lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A stopped agent cannot be brought back.
    #[error("Agent {0} is stopped")]
    Stopped(String),

    /// The warm-up request to the backend failed.
    #[error("Warm-up failed: {0}")]
    WarmUp(#[from] ProviderError),
}

/// Errors raised by pool-level operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Unknown role '{requested}'. Available roles: {}", available.join(", "))]
    UnknownRole {
        requested: String,
        available: Vec<String>,
    },

    #[error("Model '{0}' not found in catalog")]
    UnknownModel(String),

    #[error("Failed to download model '{0}'")]
    DownloadFailed(String),

    #[error("Failed to initialize agent with model '{model}': {source}")]
    InitializationFailed {
        model: String,
        #[source]
        source: AgentError,
    },

    #[error("Agent {0} not found")]
    AgentNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_lists_available() {
        let err = PoolError::UnknownRole {
            requested: "chef".to_string(),
            available: vec!["recon".to_string(), "web".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown role 'chef'. Available roles: recon, web"
        );
    }

    #[test]
    fn test_agent_not_found_message() {
        assert_eq!(
            PoolError::AgentNotFound("01ABC".to_string()).to_string(),
            "Agent 01ABC not found"
        );
    }
}
