//! Nmap tool — network and port scanning.

use super::{require_operand, split_flags};
use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_flags() -> String {
    "-sV -sC".to_string()
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NmapParams {
    /// Host, IP address or CIDR range to scan.
    pub target: String,
    /// Extra nmap flags. Default: "-sV -sC".
    #[serde(default = "default_flags")]
    pub flags: String,
    /// File name (relative to the workspace) for normal-format output.
    #[serde(default)]
    pub output_file: Option<String>,
}

pub struct NmapTool;

pub(crate) fn build_args(params: &NmapParams, workspace: &Path) -> Vec<String> {
    let mut args = split_flags(&params.flags);
    args.push(params.target.trim().to_string());
    if let Some(file) = params.output_file.as_deref().filter(|f| !f.is_empty()) {
        args.push("-oN".to_string());
        args.push(workspace.join(file).to_string_lossy().into_owned());
    }
    args
}

#[async_trait]
impl Tool for NmapTool {
    fn name(&self) -> &str {
        "nmap"
    }
    fn description(&self) -> &str {
        "Scan a target for open ports and service versions with nmap."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(NmapParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: NmapParams = parse_params(args)?;
        require_operand("target", &params.target)?;

        let args = build_args(&params, ctx.executor.workspace_dir());
        ctx.executor
            .run(
                "nmap",
                &args,
                Duration::from_secs(ctx.settings.nmap_timeout_secs),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let params: NmapParams =
            serde_json::from_value(serde_json::json!({"target": "10.0.0.5"})).unwrap();
        assert_eq!(params.flags, "-sV -sC");
        assert_eq!(
            build_args(&params, Path::new("/ws")),
            vec!["-sV", "-sC", "10.0.0.5"]
        );
    }

    #[test]
    fn test_output_file_is_placed_in_workspace() {
        let params = NmapParams {
            target: "scanme.nmap.org".to_string(),
            flags: "-p 22,80".to_string(),
            output_file: Some("scan.txt".to_string()),
        };
        assert_eq!(
            build_args(&params, Path::new("/ws")),
            vec!["-p", "22,80", "scanme.nmap.org", "-oN", "/ws/scan.txt"]
        );
    }

    #[test]
    fn test_schema_requires_target() {
        let schema = NmapTool.parameters_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "target"));
    }

    #[tokio::test]
    async fn test_option_like_target_rejected() {
        let result = NmapTool
            .execute(
                serde_json::json!({"target": "-iL /etc/passwd"}),
                &ToolContext::default(),
            )
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParameters(_))));
    }
}
