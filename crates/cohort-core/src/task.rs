//! Task requests accepted by agents.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// What an agent is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Chat,
    ToolUse,
    Analysis,
    Unknown(String),
}

impl TaskKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "chat" => TaskKind::Chat,
            "tool_use" => TaskKind::ToolUse,
            "analysis" => TaskKind::Analysis,
            other => TaskKind::Unknown(other.to_string()),
        }
    }
}

fn default_kind() -> String {
    "chat".to_string()
}

/// A task request.
///
/// `context` keeps its entries in the order they were given; non-string
/// JSON values are stored in their JSON text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "ordered_context")]
    pub context: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            content: String::new(),
            context: Vec::new(),
            tool: None,
            params: serde_json::Value::Null,
            data: String::new(),
            format: None,
        }
    }
}

impl Task {
    pub fn chat(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn tool_use(tool: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            kind: "tool_use".to_string(),
            tool: Some(tool.into()),
            params,
            ..Self::default()
        }
    }

    pub fn analysis(data: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            kind: "analysis".to_string(),
            data: data.into(),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    /// Append a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    pub fn task_kind(&self) -> TaskKind {
        TaskKind::parse(&self.kind)
    }

    /// A parameter as a string, if present and non-empty.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

mod ordered_context {
    use super::*;

    pub fn serialize<S: Serializer>(
        entries: &[(String, String)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        deserializer.deserialize_any(ContextVisitor)
    }

    struct ContextVisitor;

    impl<'de> Visitor<'de> for ContextVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of context entries")
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::new();
            while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                entries.push((key, value));
            }
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_defaults_to_chat() {
        let task: Task = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(task.task_kind(), TaskKind::Chat);
        assert_eq!(task.content, "hello");
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let task: Task = serde_json::from_str(r#"{"type": "bogus"}"#).unwrap();
        assert_eq!(task.task_kind(), TaskKind::Unknown("bogus".to_string()));
    }

    #[test]
    fn test_context_keeps_document_order() {
        let task: Task = serde_json::from_str(
            r#"{"content": "x", "context": {"zeta": "1", "alpha": 2, "mid": null}}"#,
        )
        .unwrap();
        assert_eq!(
            task.context,
            vec![
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), "2".to_string()),
                ("mid".to_string(), "null".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_context_is_empty() {
        let task: Task = serde_json::from_str(r#"{"context": null}"#).unwrap();
        assert!(task.context.is_empty());
    }

    #[test]
    fn test_tool_use_wire_shape() {
        let task = Task::tool_use("nmap", serde_json::json!({"target": "10.0.0.1"}));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "tool_use");
        assert_eq!(json["tool"], "nmap");
        assert_eq!(task.param_str("target"), Some("10.0.0.1"));
        assert_eq!(task.param_str("flags"), None);
    }
}
