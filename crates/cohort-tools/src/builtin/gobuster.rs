//! Gobuster tool — web directory brute forcing.

use super::require_operand;
use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GobusterParams {
    /// Base URL to enumerate.
    pub url: String,
    /// Wordlist path. Defaults to the configured wordlist.
    #[serde(default)]
    pub wordlist: Option<String>,
    /// Comma-separated file extensions to try (e.g. "php,txt").
    #[serde(default)]
    pub extensions: Option<String>,
}

pub struct GobusterTool;

pub(crate) fn build_args(params: &GobusterParams, default_wordlist: &str) -> Vec<String> {
    let wordlist = params
        .wordlist
        .as_deref()
        .filter(|w| !w.is_empty())
        .unwrap_or(default_wordlist);
    let mut args = vec![
        "dir".to_string(),
        "-u".to_string(),
        params.url.trim().to_string(),
        "-w".to_string(),
        wordlist.to_string(),
    ];
    if let Some(ext) = params.extensions.as_deref().filter(|e| !e.is_empty()) {
        args.push("-x".to_string());
        args.push(ext.to_string());
    }
    args
}

#[async_trait]
impl Tool for GobusterTool {
    fn name(&self) -> &str {
        "gobuster"
    }
    fn description(&self) -> &str {
        "Enumerate hidden directories and files on a web server with gobuster."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(GobusterParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: GobusterParams = parse_params(args)?;
        require_operand("url", &params.url)?;

        let args = build_args(&params, &ctx.settings.default_wordlist);
        ctx.executor
            .run(
                "gobuster",
                &args,
                Duration::from_secs(ctx.settings.gobuster_timeout_secs),
            )
            .await
    }
}
