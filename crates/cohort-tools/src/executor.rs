//! Process execution with a workspace directory and hard timeouts.

use crate::error::ToolError;
use crate::traits::ToolOutput;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs external programs inside a workspace directory.
///
/// A run that exceeds its timeout is killed and reported as
/// [`ToolOutput::timed_out`]; it is never left running in the background.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    workspace_dir: PathBuf,
}

impl CommandExecutor {
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
        }
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// Create the workspace directory if it does not exist yet.
    pub async fn ensure_workspace(&self) -> Result<(), ToolError> {
        tokio::fs::create_dir_all(&self.workspace_dir).await?;
        Ok(())
    }

    /// Run `program` with `args`, without a shell.
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        tracing::info!(program, args = ?args, "executing tool command");
        self.run_with_timeout(cmd, program, timeout).await
    }

    /// Run a full command line through the system shell.
    pub async fn run_shell(&self, line: &str, timeout: Duration) -> Result<ToolOutput, ToolError> {
        let (shell, flag) = shell_and_flag();
        let mut cmd = Command::new(shell);
        cmd.arg(flag).arg(line);
        tracing::info!(command = line, "executing shell command");
        self.run_with_timeout(cmd, shell, timeout).await
    }

    async fn run_with_timeout(
        &self,
        mut command: Command,
        label: &str,
        timeout: Duration,
    ) -> Result<ToolOutput, ToolError> {
        self.ensure_workspace().await?;
        command
            .current_dir(&self.workspace_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| ToolError::ExecutionError(format!("Failed to start {label}: {e}")))?;

        // Dropping the pending future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(label, timeout_secs = timeout.as_secs(), "command timed out");
                return Ok(ToolOutput::timed_out());
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let success = output.status.success();
        if success {
            tracing::info!(label, "command completed successfully");
        } else {
            tracing::warn!(label, exit_code, "command failed");
        }

        Ok(ToolOutput {
            success,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            timed_out: false,
        })
    }
}

fn shell_and_flag() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("/bin/sh", "-c")
    }
}
