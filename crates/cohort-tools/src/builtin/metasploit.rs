//! Metasploit tool — runs msfconsole against a generated resource script.

use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MetasploitParams {
    /// msfconsole commands, one per line of the resource script.
    pub commands: Vec<String>,
}

pub struct MetasploitTool;

/// Resource script body. A trailing `exit` is appended so msfconsole
/// never waits on an interactive prompt.
pub(crate) fn resource_script(commands: &[String]) -> String {
    let mut script = String::new();
    for cmd in commands {
        script.push_str(cmd.trim_end());
        script.push('\n');
    }
    if commands.last().map(|c| c.trim()) != Some("exit") {
        script.push_str("exit\n");
    }
    script
}

#[async_trait]
impl Tool for MetasploitTool {
    fn name(&self) -> &str {
        "metasploit"
    }
    fn description(&self) -> &str {
        "Run a sequence of msfconsole commands from a resource script."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(MetasploitParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: MetasploitParams = parse_params(args)?;
        if params.commands.iter().all(|c| c.trim().is_empty()) {
            return Err(ToolError::InvalidParameters(
                "commands must not be empty".to_string(),
            ));
        }

        ctx.executor.ensure_workspace().await?;
        let rc_path = ctx
            .executor
            .workspace_dir()
            .join(format!("msf_{}.rc", ulid::Ulid::new()));
        tokio::fs::write(&rc_path, resource_script(&params.commands)).await?;
        tracing::debug!(path = %rc_path.display(), "wrote msfconsole resource script");

        let args = vec![
            "-q".to_string(),
            "-r".to_string(),
            rc_path.to_string_lossy().into_owned(),
        ];
        let output = ctx
            .executor
            .run(
                "msfconsole",
                &args,
                Duration::from_secs(ctx.settings.metasploit_timeout_secs),
            )
            .await;

        if let Err(e) = tokio::fs::remove_file(&rc_path).await {
            tracing::debug!(error = %e, "failed to remove resource script");
        }
        output
    }
}
