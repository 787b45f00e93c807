//! A single pooled agent: one role, one model, one conversation.
//!
//! Lifecycle: `initializing → ready ⇄ busy`, with `error` reachable from a
//! failed warm-up or a fault during a task, and `stopped` as the terminal
//! state. A task only starts from `ready`; the check and the move to `busy`
//! happen under one lock, so concurrent callers are rejected, not queued.

use crate::error::AgentError;
use crate::intent::{DetectedIntent, IntentClassifier, KeywordClassifier};
use crate::result::{BrowserReport, ChatReply, TaskResult, ToolReport};
use crate::task::{Task, TaskKind};
use cohort_provider::{ChatMessage, InferenceBackend};
use cohort_tools::builtin::browser::PageSummary;
use cohort_tools::{ToolError, ToolGateway, ToolKind, ToolOutput};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Number of transcript entries replayed into each chat request.
const HISTORY_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Initializing,
    Ready,
    Busy,
    Error,
    Stopped,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 5] = [
        AgentStatus::Initializing,
        AgentStatus::Ready,
        AgentStatus::Busy,
        AgentStatus::Error,
        AgentStatus::Stopped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Initializing => "initializing",
            AgentStatus::Ready => "ready",
            AgentStatus::Busy => "busy",
            AgentStatus::Error => "error",
            AgentStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static attributes an agent is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub role: String,
    pub model: String,
    pub system_prompt: String,
    pub allowed_tools: Vec<String>,
}

/// Serializable snapshot of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub id: String,
    pub role: String,
    pub model: String,
    pub status: AgentStatus,
    pub created_at: u64,
    pub last_activity: u64,
    pub tasks_completed: u64,
    pub total_tokens_used: u64,
    pub conversation_length: usize,
    pub allowed_tools: Vec<String>,
}

#[derive(Debug)]
struct AgentState {
    status: AgentStatus,
    last_activity: u64,
    history: Vec<ChatMessage>,
    tasks_completed: u64,
    total_tokens_used: u64,
}

pub struct Agent {
    id: String,
    config: AgentConfig,
    created_at: u64,
    backend: Arc<dyn InferenceBackend>,
    tools: Arc<dyn ToolGateway>,
    classifier: Arc<dyn IntentClassifier>,
    state: Mutex<AgentState>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create an agent in `initializing` state.
    pub fn new(
        config: AgentConfig,
        backend: Arc<dyn InferenceBackend>,
        tools: Arc<dyn ToolGateway>,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ulid::Ulid::new().to_string(),
            config,
            created_at: now,
            backend,
            tools,
            classifier: Arc::new(KeywordClassifier),
            state: Mutex::new(AgentState {
                status: AgentStatus::Initializing,
                last_activity: now,
                history: Vec::new(),
                tasks_completed: 0,
                total_tokens_used: 0,
            }),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> &str {
        &self.config.role
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    pub fn allowed_tools(&self) -> &[String] {
        &self.config.allowed_tools
    }

    pub fn is_allowed(&self, tool: &str) -> bool {
        self.config.allowed_tools.iter().any(|t| t == tool)
    }

    pub async fn status(&self) -> AgentStatus {
        self.state.lock().await.status
    }

    /// Transcript so far, oldest first.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.history.clone()
    }

    /// Warm the model up and move to `ready`.
    ///
    /// Calling this again repeats the warm-up; it is how an agent in `error`
    /// is recovered. A stopped agent refuses.
    pub async fn initialize(&self) -> Result<(), AgentError> {
        {
            let state = self.state.lock().await;
            if state.status == AgentStatus::Stopped {
                return Err(AgentError::Stopped(self.id.clone()));
            }
        }

        tracing::info!(agent = %self.id, model = %self.config.model, "initializing agent");
        let warm_up = self.backend.generate(&self.config.model, "Initialize").await;

        let mut state = self.state.lock().await;
        if state.status == AgentStatus::Stopped {
            return Err(AgentError::Stopped(self.id.clone()));
        }
        match warm_up {
            Ok(_) => {
                state.status = AgentStatus::Ready;
                tracing::info!(agent = %self.id, "agent ready");
                Ok(())
            }
            Err(e) => {
                state.status = AgentStatus::Error;
                tracing::error!(agent = %self.id, error = %e, "agent warm-up failed");
                Err(AgentError::WarmUp(e))
            }
        }
    }

    /// Run one task. Never panics and never returns `Err`: every outcome is a
    /// [`TaskResult`].
    pub async fn execute_task(&self, task: &Task) -> TaskResult {
        {
            let mut state = self.state.lock().await;
            if state.status != AgentStatus::Ready {
                tracing::warn!(agent = %self.id, status = %state.status, "task rejected");
                return TaskResult::failure(format!("Agent not ready (status: {})", state.status));
            }
            state.status = AgentStatus::Busy;
            state.last_activity = current_timestamp();
        }

        let outcome = AssertUnwindSafe(self.route(task)).catch_unwind().await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(Ok(result)) => {
                if result.success {
                    state.tasks_completed += 1;
                }
                if state.status == AgentStatus::Busy {
                    state.status = AgentStatus::Ready;
                }
                result
            }
            Ok(Err(fault)) => {
                tracing::error!(agent = %self.id, error = %fault, "task fault");
                if state.status == AgentStatus::Busy {
                    state.status = AgentStatus::Error;
                }
                TaskResult::failure(fault.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(agent = %self.id, panic = %message, "task panicked");
                if state.status == AgentStatus::Busy {
                    state.status = AgentStatus::Error;
                }
                TaskResult::failure(message)
            }
        }
    }

    /// Move to `stopped` regardless of the current state.
    pub async fn stop(&self) {
        tracing::info!(agent = %self.id, "stopping agent");
        self.state.lock().await.status = AgentStatus::Stopped;
    }

    pub async fn clear_history(&self) {
        self.state.lock().await.history.clear();
        tracing::info!(agent = %self.id, "cleared conversation history");
    }

    pub async fn info(&self) -> AgentInfo {
        let state = self.state.lock().await;
        AgentInfo {
            id: self.id.clone(),
            role: self.config.role.clone(),
            model: self.config.model.clone(),
            status: state.status,
            created_at: self.created_at,
            last_activity: state.last_activity,
            tasks_completed: state.tasks_completed,
            total_tokens_used: state.total_tokens_used,
            conversation_length: state.history.len(),
            allowed_tools: self.config.allowed_tools.clone(),
        }
    }

    /// `Err` means the task could not be handled at all (a gateway that
    /// cannot dispatch); it puts the agent into `error`.
    async fn route(&self, task: &Task) -> Result<TaskResult, ToolError> {
        match task.task_kind() {
            TaskKind::Chat => {
                if let Some(intent) = self.classifier.classify(&task.content) {
                    if self.is_allowed(intent.tool.as_str()) {
                        return self.run_detected(&task.content, intent).await;
                    }
                    tracing::debug!(agent = %self.id, tool = %intent.tool, "detected tool not allowed, chatting");
                }
                Ok(self.chat(&task.content, &task.context).await)
            }
            TaskKind::ToolUse => self.use_tool(task).await,
            TaskKind::Analysis => {
                let format = task.format.as_deref().unwrap_or("text");
                Ok(self.chat(&analysis_prompt(format, &task.data), &[]).await)
            }
            TaskKind::Unknown(kind) => Ok(TaskResult::failure(format!("Unknown task type: {kind}"))),
        }
    }

    async fn chat(&self, content: &str, context: &[(String, String)]) -> TaskResult {
        let messages = {
            let state = self.state.lock().await;
            build_messages(&self.config.system_prompt, context, &state.history, content)
        };

        match self.backend.chat(&self.config.model, &messages).await {
            Ok(completion) => {
                let mut state = self.state.lock().await;
                state.history.push(ChatMessage::user(content));
                state
                    .history
                    .push(ChatMessage::assistant(completion.content.clone()));
                state.total_tokens_used += completion.total_tokens();
                TaskResult::success(ChatReply {
                    response: completion.content,
                    tokens_used: completion.completion_tokens,
                    auto_tool: None,
                })
            }
            Err(e) => {
                tracing::error!(agent = %self.id, error = %e, "chat request failed");
                TaskResult::failure(e.to_string())
            }
        }
    }

    async fn run_detected(
        &self,
        content: &str,
        intent: DetectedIntent,
    ) -> Result<TaskResult, ToolError> {
        tracing::info!(agent = %self.id, tool = %intent.tool, target = %intent.target, "running detected tool");
        let params = match intent.tool {
            ToolKind::Gobuster => serde_json::json!({ "url": intent.target }),
            _ => serde_json::json!({ "target": intent.target }),
        };
        let output = self.tools.invoke(intent.tool.as_str(), params).await?;

        let message = if output.success {
            format!(
                "Ran {} against {}:\n\n{}",
                intent.tool,
                intent.target,
                output.stdout.trim_end()
            )
        } else {
            format!(
                "{} against {} failed: {}",
                intent.tool,
                intent.target,
                output.stderr.trim_end()
            )
        };

        {
            let mut state = self.state.lock().await;
            state.history.push(ChatMessage::user(content));
            state.history.push(ChatMessage::assistant(message.clone()));
        }

        Ok(TaskResult {
            success: output.success,
            output: Some(
                ChatReply {
                    response: message,
                    tokens_used: 0,
                    auto_tool: Some(intent.tool.to_string()),
                }
                .into(),
            ),
            error: (!output.success).then(|| output.stderr.clone()),
        })
    }

    async fn use_tool(&self, task: &Task) -> Result<TaskResult, ToolError> {
        let Some(name) = task.tool.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(TaskResult::failure("No tool specified"));
        };
        if !self.is_allowed(name) {
            tracing::warn!(agent = %self.id, tool = name, "tool not allowed");
            return Ok(TaskResult::failure(format!(
                "Tool '{name}' not allowed for this agent"
            )));
        }
        let kind: ToolKind = match name.parse() {
            Ok(kind) => kind,
            Err(e) => return Ok(TaskResult::failure(e.to_string())),
        };

        let params = shape_params(kind, &task.params);
        if kind == ToolKind::Command && task.param_str("cmd").map_or(true, |c| c.trim().is_empty()) {
            return Ok(TaskResult::failure("No command specified"));
        }

        let output = self.tools.invoke(kind.as_str(), params).await?;
        Ok(tool_result(kind, task, output))
    }
}

/// Chat request: system prompt, optional context, recent transcript, new turn.
pub(crate) fn build_messages(
    system_prompt: &str,
    context: &[(String, String)],
    history: &[ChatMessage],
    content: &str,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    if !context.is_empty() {
        let lines: Vec<String> = context.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        messages.push(ChatMessage::system(format!(
            "Additional context:\n{}",
            lines.join("\n")
        )));
    }
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    messages.extend_from_slice(&history[start..]);
    messages.push(ChatMessage::user(content));
    messages
}

pub(crate) fn analysis_prompt(format: &str, data: &str) -> String {
    format!(
        "Analyze the following {format} data and provide insights:\n\n\
{data}\n\n\
Provide:\n\
1. Summary of findings\n\
2. Key points of interest\n\
3. Potential security implications\n\
4. Recommended next steps\n"
    )
}

/// Keep only the parameters each tool understands.
fn shape_params(kind: ToolKind, params: &serde_json::Value) -> serde_json::Value {
    let keys: &[&str] = match kind {
        ToolKind::Nmap => &["target", "flags", "output_file"],
        ToolKind::Gobuster => &["url", "wordlist", "extensions"],
        ToolKind::Sqlmap => &["url", "params", "extra_args"],
        ToolKind::Metasploit => &["commands"],
        ToolKind::Browser => &["url", "action", "path"],
        ToolKind::Command => &["cmd"],
    };
    let mut shaped = serde_json::Map::new();
    for key in keys {
        if let Some(value) = params.get(*key).filter(|v| !v.is_null()) {
            shaped.insert((*key).to_string(), value.clone());
        }
    }
    serde_json::Value::Object(shaped)
}

fn tool_result(kind: ToolKind, task: &Task, output: ToolOutput) -> TaskResult {
    let success = output.success;
    let error = (!success).then(|| output.stderr.clone());

    let report = match kind {
        ToolKind::Nmap => ToolReport::Nmap {
            output: output.stdout,
            error: error.clone(),
        },
        ToolKind::Gobuster => ToolReport::Gobuster {
            output: output.stdout,
            error: error.clone(),
        },
        ToolKind::Sqlmap => ToolReport::Sqlmap {
            output: output.stdout,
            error: error.clone(),
        },
        ToolKind::Metasploit => ToolReport::Metasploit {
            output: output.stdout,
            error: error.clone(),
        },
        ToolKind::Command => ToolReport::Command {
            command: task.param_str("cmd").unwrap_or_default().to_string(),
            output: output.stdout,
            error: error.clone(),
            exit_code: output.exit_code,
        },
        ToolKind::Browser => {
            if !success {
                return TaskResult {
                    success: false,
                    output: None,
                    error,
                };
            }
            match browser_report(&output.stdout) {
                Ok(report) => ToolReport::Browser(report),
                Err(e) => return TaskResult::failure(format!("Unexpected browser output: {e}")),
            }
        }
    };

    TaskResult {
        success,
        output: Some(report.into()),
        error,
    }
}

fn browser_report(stdout: &str) -> Result<BrowserReport, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(stdout)?;
    if value["action"] == "screenshot" {
        let path = value["path"].as_str().unwrap_or_default().to_string();
        return Ok(BrowserReport::Screenshot { path });
    }
    let page: PageSummary = serde_json::from_value(value)?;
    Ok(BrowserReport::Navigate(page))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("Task panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("Task panicked: {s}")
    } else {
        "Task panicked".to_string()
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
