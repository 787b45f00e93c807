//! Message and response types shared by backends and their callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of a chat message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Result of a chat call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Assistant reply text.
    pub content: String,
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens generated in the reply.
    pub completion_tokens: u64,
}

impl ChatCompletion {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A model the backend reports as present on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteModel {
    /// Full name including any `:tag` suffix (e.g. "llama3.2:latest").
    pub name: String,
    /// Size on disk in bytes.
    #[serde(default)]
    pub size: u64,
}

impl RemoteModel {
    /// Name with any version tag removed ("llama3.2:latest" → "llama3.2").
    pub fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, Role::System);
        assert_eq!(ChatMessage::user("u").role, Role::User);
        assert_eq!(ChatMessage::assistant("a").content, "a");
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_remote_model_base_name() {
        let tagged = RemoteModel {
            name: "qwen2.5:7b".to_string(),
            size: 0,
        };
        let bare = RemoteModel {
            name: "mistral".to_string(),
            size: 0,
        };
        assert_eq!(tagged.base_name(), "qwen2.5");
        assert_eq!(bare.base_name(), "mistral");
    }

    #[test]
    fn test_total_tokens() {
        let c = ChatCompletion {
            content: String::new(),
            prompt_tokens: 12,
            completion_tokens: 30,
        };
        assert_eq!(c.total_tokens(), 42);
    }
}
