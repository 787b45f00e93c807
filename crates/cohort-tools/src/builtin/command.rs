//! Command tool — raw shell command execution.

use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CommandParams {
    /// Shell command line to execute.
    pub cmd: String,
}

pub struct CommandTool;

#[async_trait]
impl Tool for CommandTool {
    fn name(&self) -> &str {
        "command"
    }
    fn description(&self) -> &str {
        "Execute a shell command in the workspace and return stdout/stderr."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(CommandParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: CommandParams = parse_params(args)?;
        if params.cmd.trim().is_empty() {
            return Err(ToolError::InvalidParameters(
                "No command specified".to_string(),
            ));
        }
        ctx.executor
            .run_shell(&params.cmd, ctx.default_timeout())
            .await
    }
}
