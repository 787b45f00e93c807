//! cohort-core: pooled LLM agents, their task state machine, and the
//! orchestrator that creates, dispatches to and retires them.

pub mod agent;
pub mod config;
mod error;
pub mod intent;
pub mod orchestrator;
pub mod result;
pub mod role;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{Agent, AgentConfig, AgentInfo, AgentStatus};
pub use config::{Config, ConfigStore, OllamaSettings};
pub use error::{AgentError, PoolError};
pub use intent::{DetectedIntent, IntentClassifier, KeywordClassifier, NoIntent};
pub use orchestrator::{AgentRequest, AgentTaskResult, Orchestrator, PoolStats};
pub use result::{BrowserReport, ChatReply, TaskOutput, TaskResult, ToolReport};
pub use role::{default_roles, RoleConfig};
pub use task::{Task, TaskKind};
