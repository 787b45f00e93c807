//! Inference backend trait definition.

use crate::error::ProviderError;
use crate::types::{ChatCompletion, ChatMessage, RemoteModel};
use async_trait::async_trait;

/// Request/response contract of a local LLM service.
///
/// Implementations must apply a bounded timeout to every call; a timed-out
/// call is an ordinary `Err`, never a hang.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// One-shot completion. Used as a warm-up and model-activation probe.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Chat completion over a full message sequence.
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, ProviderError>;

    /// Models the backend reports as downloaded.
    async fn list_models(&self) -> Result<Vec<RemoteModel>, ProviderError>;

    /// Whether the backend is reachable and answering.
    async fn health_check(&self) -> bool;
}

// Compile-time check: InferenceBackend must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn InferenceBackend) {}
};
