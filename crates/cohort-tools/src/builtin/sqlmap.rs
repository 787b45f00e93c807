//! Sqlmap tool — SQL injection testing.

use super::{require_operand, split_flags};
use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SqlmapParams {
    /// Target URL, including the query string to test.
    pub url: String,
    /// Comma-separated parameter names to test.
    #[serde(default)]
    pub params: Option<String>,
    /// Additional sqlmap arguments.
    #[serde(default)]
    pub extra_args: Option<String>,
}

pub struct SqlmapTool;

/// Runs are always non-interactive (`--batch`).
pub(crate) fn build_args(params: &SqlmapParams) -> Vec<String> {
    let mut args = vec!["-u".to_string(), params.url.trim().to_string()];
    if let Some(p) = params.params.as_deref().filter(|p| !p.is_empty()) {
        args.push("-p".to_string());
        args.push(p.to_string());
    }
    if let Some(extra) = params.extra_args.as_deref() {
        args.extend(split_flags(extra));
    }
    args.push("--batch".to_string());
    args
}

#[async_trait]
impl Tool for SqlmapTool {
    fn name(&self) -> &str {
        "sqlmap"
    }
    fn description(&self) -> &str {
        "Test a URL for SQL injection with sqlmap in batch mode."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(SqlmapParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: SqlmapParams = parse_params(args)?;
        require_operand("url", &params.url)?;

        ctx.executor
            .run(
                "sqlmap",
                &build_args(&params),
                Duration::from_secs(ctx.settings.sqlmap_timeout_secs),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_always_last() {
        let params = SqlmapParams {
            url: "http://t/item.php?id=1".to_string(),
            params: Some("id".to_string()),
            extra_args: Some("--level 3 --risk 2".to_string()),
        };
        assert_eq!(
            build_args(&params),
            vec![
                "-u",
                "http://t/item.php?id=1",
                "-p",
                "id",
                "--level",
                "3",
                "--risk",
                "2",
                "--batch"
            ]
        );
    }

    #[test]
    fn test_minimal() {
        let params: SqlmapParams =
            serde_json::from_value(serde_json::json!({"url": "http://t/?q=1"})).unwrap();
        assert_eq!(build_args(&params), vec!["-u", "http://t/?q=1", "--batch"]);
    }
}
