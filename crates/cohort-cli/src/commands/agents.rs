//! Commands that spin up agents, run work on them and tear them down.

use cohort_core::{AgentRequest, Config, Orchestrator, Task};

/// Build the task for `cohort ask`: a tool run when `tool` is given,
/// otherwise a chat with `prompt`.
pub fn build_task(prompt: &str, tool: Option<&str>, params: &str) -> anyhow::Result<Task> {
    match tool {
        Some(tool) => {
            let params: serde_json::Value = serde_json::from_str(params)
                .map_err(|e| anyhow::anyhow!("--params must be a JSON object: {e}"))?;
            if !params.is_object() {
                anyhow::bail!("--params must be a JSON object");
            }
            Ok(Task::tool_use(tool, params))
        }
        None => Ok(Task::chat(prompt)),
    }
}

/// Returns whether the task succeeded.
pub async fn ask(config: &Config, role: &str, model: &str, task: Task) -> anyhow::Result<bool> {
    let orchestrator = Orchestrator::from_config(config);
    let agent = orchestrator
        .create_agent(AgentRequest::new(role, model))
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let result = orchestrator.execute_task(agent.id(), &task).await;
    orchestrator.shutdown_all().await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}

pub async fn broadcast(
    config: &Config,
    model: &str,
    roles: &[String],
    prompt: &str,
) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config);
    let roles: Vec<String> = if roles.is_empty() {
        orchestrator.roles().keys().cloned().collect()
    } else {
        roles.to_vec()
    };

    for role in &roles {
        if let Err(e) = orchestrator
            .create_agent(AgentRequest::new(role.as_str(), model))
            .await
        {
            eprintln!("skipping {role}: {e}");
        }
    }
    if orchestrator.list_agents().await.is_empty() {
        anyhow::bail!("No agents could be created");
    }

    let results = orchestrator.broadcast_task(&Task::chat(prompt), None).await;
    let stats = orchestrator.get_stats().await;
    orchestrator.shutdown_all().await;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "results": results,
            "stats": stats,
        }))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::TaskKind;

    #[test]
    fn test_build_chat_task() {
        let task = build_task("hello", None, "{}").unwrap();
        assert_eq!(task.task_kind(), TaskKind::Chat);
        assert_eq!(task.content, "hello");
    }

    #[test]
    fn test_build_tool_task() {
        let task = build_task("ignored", Some("nmap"), r#"{"target": "10.0.0.1"}"#).unwrap();
        assert_eq!(task.task_kind(), TaskKind::ToolUse);
        assert_eq!(task.tool.as_deref(), Some("nmap"));
        assert_eq!(task.param_str("target"), Some("10.0.0.1"));
    }

    #[test]
    fn test_build_tool_task_rejects_non_object_params() {
        assert!(build_task("", Some("nmap"), "[1, 2]").is_err());
        assert!(build_task("", Some("nmap"), "not json").is_err());
    }
}
