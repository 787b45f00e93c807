//! Model runtime: the local CLI that pulls and evicts models.

use crate::error::ModelError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// Callback receiving each progress line of a download.
pub type ProgressFn = dyn Fn(&str) + Send + Sync;

#[async_trait]
pub trait ModelRuntime: Send + Sync {
    /// Download `name`, reporting progress lines as they arrive.
    /// Returns whether the download completed successfully.
    async fn pull(&self, name: &str, progress: Option<&ProgressFn>) -> Result<bool, ModelError>;

    /// Ask the runtime to evict `name` from memory.
    async fn stop(&self, name: &str) -> Result<(), ModelError>;
}

// Compile-time check: ModelRuntime must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn ModelRuntime) {}
};

/// Drives the `ollama` command-line client.
#[derive(Debug, Clone)]
pub struct OllamaCli {
    binary: String,
}

impl OllamaCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for OllamaCli {
    fn default() -> Self {
        Self::new("ollama")
    }
}

#[async_trait]
impl ModelRuntime for OllamaCli {
    async fn pull(&self, name: &str, progress: Option<&ProgressFn>) -> Result<bool, ModelError> {
        let mut child = Command::new(&self.binary)
            .args(["pull", name])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ModelError::Runtime(format!("Failed to start {}: {e}", self.binary)))?;

        // Drain stderr concurrently so a chatty child cannot block on a full pipe.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                tracing::debug!(model = name, progress = line, "download progress");
                if let Some(cb) = progress {
                    cb(line);
                }
            }
        }

        let status = child.wait().await?;
        let stderr = match stderr_task {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            Ok(true)
        } else {
            tracing::error!(
                model = name,
                code = status.code().unwrap_or(-1),
                stderr = stderr.trim(),
                "model download failed"
            );
            Ok(false)
        }
    }

    async fn stop(&self, name: &str) -> Result<(), ModelError> {
        let output = Command::new(&self.binary)
            .args(["stop", name])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ModelError::Runtime(format!("Failed to start {}: {e}", self.binary)))?;
        if !output.status.success() {
            return Err(ModelError::Runtime(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}
