//! Task results returned by agents and the pool.

use cohort_tools::builtin::browser::PageSummary;
use serde::Serialize;

/// Outcome of one task. Failures are values, never panics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub success: bool,
    #[serde(flatten)]
    pub output: Option<TaskOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskResult {
    pub fn success(output: impl Into<TaskOutput>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }

    /// The chat reply, if this is a chat result.
    pub fn reply(&self) -> Option<&ChatReply> {
        match &self.output {
            Some(TaskOutput::Chat(reply)) => Some(reply),
            _ => None,
        }
    }

    /// The tool report, if this is a tool result.
    pub fn report(&self) -> Option<&ToolReport> {
        match &self.output {
            Some(TaskOutput::Tool(report)) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskOutput {
    Chat(ChatReply),
    Tool(ToolReport),
}

impl From<ChatReply> for TaskOutput {
    fn from(reply: ChatReply) -> Self {
        TaskOutput::Chat(reply)
    }
}

impl From<ToolReport> for TaskOutput {
    fn from(report: ToolReport) -> Self {
        TaskOutput::Tool(report)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    /// Completion tokens of this exchange.
    pub tokens_used: u64,
    /// Set when the reply came from a tool run picked from the message text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tool: Option<String>,
}

/// Per-tool result envelope, tagged by tool name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolReport {
    Nmap {
        output: String,
        error: Option<String>,
    },
    Gobuster {
        output: String,
        error: Option<String>,
    },
    Sqlmap {
        output: String,
        error: Option<String>,
    },
    Metasploit {
        output: String,
        error: Option<String>,
    },
    Browser(BrowserReport),
    Command {
        command: String,
        output: String,
        error: Option<String>,
        exit_code: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BrowserReport {
    Navigate(PageSummary),
    Screenshot { path: String },
}
