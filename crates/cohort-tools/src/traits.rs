//! Tool trait definition and common types.

use crate::error::ToolError;
use crate::executor::CommandExecutor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables shared by every tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Directory commands run in and write their artifacts to.
    pub workspace_dir: PathBuf,
    /// Timeout for raw commands, in seconds.
    pub default_timeout_secs: u64,
    pub nmap_timeout_secs: u64,
    pub gobuster_timeout_secs: u64,
    pub sqlmap_timeout_secs: u64,
    pub metasploit_timeout_secs: u64,
    pub browser_timeout_secs: u64,
    /// Wordlist used by gobuster when none is given.
    pub default_wordlist: String,
    /// Headless browser used for screenshots.
    pub browser_binary: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            workspace_dir: std::env::temp_dir().join("cohort-workspace"),
            default_timeout_secs: 300,
            nmap_timeout_secs: 600,
            gobuster_timeout_secs: 600,
            sqlmap_timeout_secs: 900,
            metasploit_timeout_secs: 1800,
            browser_timeout_secs: 30,
            default_wordlist: "/usr/share/wordlists/dirb/common.txt".to_string(),
            browser_binary: "chromium".to_string(),
        }
    }
}

/// Context provided to tools during execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub settings: ToolSettings,
    pub executor: CommandExecutor,
}

impl ToolContext {
    pub fn new(settings: ToolSettings) -> Self {
        let executor = CommandExecutor::new(settings.workspace_dir.clone());
        Self { settings, executor }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.default_timeout_secs)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(ToolSettings::default())
    }
}

/// Normalized result of a tool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Process exit code. -1 when the process never produced one.
    pub exit_code: i32,
    /// Whether the run was force-terminated on timeout.
    #[serde(default)]
    pub timed_out: bool,
}

impl ToolOutput {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
            timed_out: false,
        }
    }

    /// A run that failed before or outside of a process exit.
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: -1,
            timed_out: false,
        }
    }

    /// A run that was killed after exceeding its timeout.
    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::failure("Command timed out")
        }
    }
}

/// Trait that all tools must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Machine-readable tool name (e.g., "nmap").
    fn name(&self) -> &str;

    /// Description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError>;
}

// Compile-time check: Tool must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn Tool) {}
};

/// Decode tool arguments into their typed parameter struct.
pub(crate) fn parse_params<T: serde::de::DeserializeOwned>(
    args: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_output() {
        let out = ToolOutput::timed_out();
        assert!(!out.success);
        assert!(out.timed_out);
        assert_eq!(out.exit_code, -1);
        assert_eq!(out.stderr, "Command timed out");
    }

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let settings: ToolSettings =
            serde_json::from_str(r#"{"nmap_timeout_secs": 60}"#).unwrap();
        assert_eq!(settings.nmap_timeout_secs, 60);
        assert_eq!(settings.sqlmap_timeout_secs, 900);
        assert_eq!(settings.default_wordlist, "/usr/share/wordlists/dirb/common.txt");
    }
}
