//! Test doubles shared by the agent and orchestrator tests.

use async_trait::async_trait;
use cohort_models::{
    DiskSnapshot, HostProbe, MemorySnapshot, ModelError, ModelRuntime, ProgressFn,
};
use cohort_provider::{ChatCompletion, ChatMessage, InferenceBackend, ProviderError, RemoteModel};
use cohort_tools::{ToolError, ToolGateway, ToolOutput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const GIB: u64 = 1024 * 1024 * 1024;

pub(crate) struct MockBackend {
    pub reply: String,
    pub fail_chat: bool,
    /// Models whose warm-up fails.
    pub broken_models: Vec<String>,
    /// Models whose chat call panics.
    pub panic_models: Vec<String>,
    pub downloaded: Mutex<Vec<String>>,
    pub chat_delay: Option<Duration>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
    pub generate_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            reply: "mock reply".to_string(),
            fail_chat: false,
            broken_models: Vec::new(),
            panic_models: Vec::new(),
            downloaded: Mutex::new(Vec::new()),
            chat_delay: None,
            requests: Mutex::new(Vec::new()),
            generate_calls: AtomicUsize::new(0),
        }
    }
}

impl MockBackend {
    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn generate_count(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn generate(&self, model: &str, _prompt: &str) -> Result<String, ProviderError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_models.iter().any(|m| m == model) {
            return Err(ProviderError::Api("HTTP 500: model failed to load".to_string()));
        }
        Ok("ok".to_string())
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.chat_delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_models.iter().any(|m| m == model) {
            panic!("backend exploded");
        }
        if self.fail_chat {
            return Err(ProviderError::Api("HTTP 500: boom".to_string()));
        }
        Ok(ChatCompletion {
            content: self.reply.clone(),
            prompt_tokens: 10,
            completion_tokens: 5,
        })
    }

    async fn list_models(&self) -> Result<Vec<RemoteModel>, ProviderError> {
        Ok(self
            .downloaded
            .lock()
            .unwrap()
            .iter()
            .map(|name| RemoteModel {
                name: name.clone(),
                size: 0,
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub(crate) struct MockGateway {
    pub output: ToolOutput,
    /// Answer every call with `Err`, as a gateway with no registry would.
    pub unavailable: bool,
    pub calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockGateway {
    pub fn returning(output: ToolOutput) -> Self {
        Self {
            output,
            unavailable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::returning(ToolOutput::success("tool output"))
    }
}

#[async_trait]
impl ToolGateway for MockGateway {
    async fn invoke(
        &self,
        tool: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push((tool.to_string(), params));
        if self.unavailable {
            return Err(ToolError::UnknownTool(tool.to_string()));
        }
        Ok(self.output.clone())
    }
}

#[derive(Default)]
pub(crate) struct MockRuntime {
    pub fail_pull: bool,
    pub pulls: Mutex<Vec<String>>,
    pub stops: Mutex<Vec<String>>,
}

#[async_trait]
impl ModelRuntime for MockRuntime {
    async fn pull(&self, name: &str, progress: Option<&ProgressFn>) -> Result<bool, ModelError> {
        self.pulls.lock().unwrap().push(name.to_string());
        if let Some(cb) = progress {
            cb("success");
        }
        Ok(!self.fail_pull)
    }

    async fn stop(&self, name: &str) -> Result<(), ModelError> {
        self.stops.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

pub(crate) struct FixedProbe {
    pub ram_gb: u64,
    pub disk_gb: u64,
}

impl HostProbe for FixedProbe {
    fn memory(&self) -> Result<MemorySnapshot, ModelError> {
        Ok(MemorySnapshot {
            total_bytes: 2 * self.ram_gb * GIB,
            available_bytes: self.ram_gb * GIB,
        })
    }

    fn disk(&self) -> Result<DiskSnapshot, ModelError> {
        Ok(DiskSnapshot {
            total_bytes: 2 * self.disk_gb * GIB,
            used_bytes: self.disk_gb * GIB,
            free_bytes: self.disk_gb * GIB,
        })
    }
}
