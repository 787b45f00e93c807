//! Uniform entry point for invoking tools by name.

use crate::error::ToolError;
use crate::registry::ToolRegistry;
use crate::traits::{ToolContext, ToolOutput, ToolSettings};
use async_trait::async_trait;

/// Dispatches named tool invocations and normalizes their output.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Run `tool` with `params`.
    ///
    /// Ordinary execution failures (bad parameters, missing binary, non-zero
    /// exit, timeout) come back as an unsuccessful [`ToolOutput`]. `Err` is
    /// reserved for a gateway that cannot dispatch the call at all.
    async fn invoke(
        &self,
        tool: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, ToolError>;
}

// Compile-time check: ToolGateway must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn ToolGateway) {}
};

/// Registry-backed gateway.
pub struct Gateway {
    registry: ToolRegistry,
    ctx: ToolContext,
}

impl Gateway {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    /// Gateway over every built-in tool.
    pub fn with_builtins(settings: ToolSettings) -> Self {
        let mut registry = ToolRegistry::new();
        crate::register_all(&mut registry);
        Self::new(registry, ToolContext::new(settings))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[async_trait]
impl ToolGateway for Gateway {
    async fn invoke(
        &self,
        tool: &str,
        params: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let handler = self
            .registry
            .get(tool)
            .ok_or_else(|| ToolError::UnknownTool(tool.to_string()))?;

        match handler.execute(params, &self.ctx).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::warn!(tool, error = %e, "tool execution failed");
                Ok(ToolOutput::failure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gateway(dir: &TempDir) -> Gateway {
        Gateway::with_builtins(ToolSettings {
            workspace_dir: dir.path().to_path_buf(),
            ..ToolSettings::default()
        })
    }

    #[tokio::test]
    async fn test_invoke_command() {
        let dir = TempDir::new().unwrap();
        let out = gateway(&dir)
            .invoke("command", serde_json::json!({"cmd": "echo pool"}))
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "pool");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_error() {
        let dir = TempDir::new().unwrap();
        let result = gateway(&dir).invoke("hydra", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "hydra"));
    }

    #[tokio::test]
    async fn test_invalid_params_are_normalized() {
        let dir = TempDir::new().unwrap();
        let out = gateway(&dir)
            .invoke("nmap", serde_json::json!({"flags": "-sV"}))
            .await
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.exit_code, -1);
        assert!(out.stderr.contains("Invalid parameters"));
    }
}
