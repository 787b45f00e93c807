//! cohort-provider: inference backend abstraction and the Ollama client.

mod error;
pub mod ollama;
pub mod traits;
pub mod types;

pub use error::ProviderError;
pub use ollama::{OllamaClient, OllamaConfig};
pub use traits::InferenceBackend;
pub use types::{ChatCompletion, ChatMessage, RemoteModel, Role};
