//! The agent pool: creation, deletion, dispatch and fan-out.

use crate::agent::{Agent, AgentConfig, AgentInfo, AgentStatus};
use crate::config::Config;
use crate::error::PoolError;
use crate::intent::{IntentClassifier, KeywordClassifier};
use crate::result::TaskResult;
use crate::role::RoleConfig;
use crate::task::Task;
use cohort_models::{ModelRegistry, OllamaCli};
use cohort_provider::{InferenceBackend, OllamaClient};
use cohort_tools::{Gateway, ToolGateway};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Parameters for [`Orchestrator::create_agent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    pub role: String,
    pub model: String,
    /// Replaces the role's system prompt. Blank falls back to the role's.
    pub system_prompt: Option<String>,
    /// Replaces the role's allowed tools. Empty falls back to the role's.
    pub allowed_tools: Option<Vec<String>>,
}

impl AgentRequest {
    pub fn new(role: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            model: model.into(),
            system_prompt: None,
            allowed_tools: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }
}

/// One agent's result within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTaskResult {
    pub agent_id: String,
    #[serde(flatten)]
    pub result: TaskResult,
}

/// Pool counters, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub active_agents: usize,
    pub total_created: u64,
    /// Every configured role, including those with no agents.
    pub agents_by_role: BTreeMap<String, usize>,
    /// Every status, including those with no agents.
    pub agents_by_status: BTreeMap<String, usize>,
}

#[derive(Default)]
struct Pool {
    agents: HashMap<String, Arc<Agent>>,
    /// Agent ids in creation order.
    order: Vec<String>,
    total_created: u64,
}

impl Pool {
    fn members(&self) -> Vec<Arc<Agent>> {
        self.order
            .iter()
            .filter_map(|id| self.agents.get(id).cloned())
            .collect()
    }
}

/// Owns the agents and everything they share.
pub struct Orchestrator {
    backend: Arc<dyn InferenceBackend>,
    tools: Arc<dyn ToolGateway>,
    classifier: Arc<dyn IntentClassifier>,
    models: Arc<ModelRegistry>,
    roles: BTreeMap<String, RoleConfig>,
    pool: RwLock<Pool>,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        tools: Arc<dyn ToolGateway>,
        models: Arc<ModelRegistry>,
        roles: BTreeMap<String, RoleConfig>,
    ) -> Self {
        Self {
            backend,
            tools,
            classifier: Arc::new(KeywordClassifier),
            models,
            roles,
            pool: RwLock::new(Pool::default()),
        }
    }

    /// Wire up the Ollama client, built-in tools and model registry from
    /// a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let backend: Arc<dyn InferenceBackend> =
            Arc::new(OllamaClient::new(config.ollama.client_config()));
        let models = ModelRegistry::new(Arc::clone(&backend), config.models_catalog.clone())
            .with_runtime(Arc::new(OllamaCli::new(config.ollama_binary.clone())))
            .with_vram_estimate(config.vram_estimate_gb);
        Self::new(
            backend,
            Arc::new(Gateway::with_builtins(config.tools.clone())),
            Arc::new(models),
            config.roles.clone(),
        )
    }

    /// Classifier handed to every agent created afterwards.
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn roles(&self) -> &BTreeMap<String, RoleConfig> {
        &self.roles
    }

    pub fn models(&self) -> &Arc<ModelRegistry> {
        &self.models
    }

    /// Create, warm up and register a new agent.
    ///
    /// The model is downloaded first if the backend does not have it. Nothing
    /// is added to the pool unless every step succeeds.
    pub async fn create_agent(&self, request: AgentRequest) -> Result<Arc<Agent>, PoolError> {
        tracing::info!(role = %request.role, model = %request.model, "creating agent");

        let role = self
            .roles
            .get(&request.role)
            .ok_or_else(|| PoolError::UnknownRole {
                requested: request.role.clone(),
                available: self.roles.keys().cloned().collect(),
            })?;

        if !self.models.catalog().contains(&request.model) {
            return Err(PoolError::UnknownModel(request.model));
        }

        if !self.models.is_downloaded(&request.model).await {
            tracing::info!(model = %request.model, "model not downloaded, downloading now");
            if !self.models.download_model(&request.model, None).await {
                return Err(PoolError::DownloadFailed(request.model));
            }
        }

        let config = AgentConfig {
            role: request.role.clone(),
            model: request.model.clone(),
            system_prompt: request
                .system_prompt
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| role.system_prompt.clone()),
            allowed_tools: request
                .allowed_tools
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| role.allowed_tools.clone()),
        };
        let agent = Agent::new(config, Arc::clone(&self.backend), Arc::clone(&self.tools))
            .with_classifier(Arc::clone(&self.classifier));

        agent
            .initialize()
            .await
            .map_err(|source| PoolError::InitializationFailed {
                model: request.model.clone(),
                source,
            })?;
        self.models.mark_loaded(&request.model).await;

        let agent = Arc::new(agent);
        {
            let mut pool = self.pool.write().await;
            pool.agents
                .insert(agent.id().to_string(), Arc::clone(&agent));
            pool.order.push(agent.id().to_string());
            pool.total_created += 1;
        }
        tracing::info!(agent = %agent.id(), "agent created");
        Ok(agent)
    }

    /// Stop and remove an agent, unloading its model if no other agent in
    /// the pool uses it.
    pub async fn delete_agent(&self, id: &str) -> Result<(), PoolError> {
        let (agent, model_in_use) = {
            let mut pool = self.pool.write().await;
            let Some(agent) = pool.agents.get(id).cloned() else {
                tracing::warn!(agent = id, "agent not found");
                return Err(PoolError::AgentNotFound(id.to_string()));
            };
            agent.stop().await;
            let in_use = pool
                .agents
                .values()
                .any(|a| a.id() != id && a.model() == agent.model());
            pool.agents.remove(id);
            pool.order.retain(|other| other != id);
            (agent, in_use)
        };

        if model_in_use {
            tracing::debug!(model = %agent.model(), "model still in use, keeping it loaded");
        } else {
            tracing::info!(model = %agent.model(), "no other agents using model, unloading");
            self.models.unload_model(agent.model()).await;
        }
        tracing::info!(agent = id, "agent deleted");
        Ok(())
    }

    pub async fn get_agent(&self, id: &str) -> Option<Arc<Agent>> {
        self.pool.read().await.agents.get(id).cloned()
    }

    /// Snapshots of every agent, in creation order.
    pub async fn list_agents(&self) -> Vec<AgentInfo> {
        let members = self.pool.read().await.members();
        let mut infos = Vec::with_capacity(members.len());
        for agent in members {
            infos.push(agent.info().await);
        }
        infos
    }

    pub async fn execute_task(&self, id: &str, task: &Task) -> TaskResult {
        match self.get_agent(id).await {
            Some(agent) => agent.execute_task(task).await,
            None => TaskResult::failure(PoolError::AgentNotFound(id.to_string()).to_string()),
        }
    }

    /// Run `task` on every agent whose role is in `roles` (all agents when
    /// `None`), concurrently. One result per selected agent, in creation order.
    pub async fn broadcast_task(
        &self,
        task: &Task,
        roles: Option<&[String]>,
    ) -> Vec<AgentTaskResult> {
        let targets: Vec<Arc<Agent>> = self
            .pool
            .read()
            .await
            .members()
            .into_iter()
            .filter(|agent| roles.map_or(true, |r| r.iter().any(|role| role == agent.role())))
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        tracing::info!(agents = targets.len(), "broadcasting task");
        let units = targets
            .into_iter()
            .map(|agent| (Some(agent), task.clone()))
            .collect::<Vec<_>>();
        Self::run_batch(units, Vec::new()).await
    }

    /// Run each `(agent_id, task)` pair concurrently. Results keep the
    /// order of `assignments`; an unknown id fails only its own slot.
    pub async fn collaborative_task(
        &self,
        assignments: Vec<(String, Task)>,
    ) -> Vec<AgentTaskResult> {
        let mut units = Vec::with_capacity(assignments.len());
        let mut ids = Vec::with_capacity(assignments.len());
        {
            let pool = self.pool.read().await;
            for (id, task) in assignments {
                units.push((pool.agents.get(&id).cloned(), task));
                ids.push(id);
            }
        }
        Self::run_batch(units, ids).await
    }

    /// Spawn one unit per entry and collect results in input order. A unit
    /// whose agent is `None` fails with "not found" under the matching id.
    async fn run_batch(
        units: Vec<(Option<Arc<Agent>>, Task)>,
        ids: Vec<String>,
    ) -> Vec<AgentTaskResult> {
        let handles = units.into_iter().enumerate().map(|(i, (agent, task))| {
            let agent_id = agent
                .as_ref()
                .map(|a| a.id().to_string())
                .or_else(|| ids.get(i).cloned())
                .unwrap_or_default();
            let handle = agent.map(|agent| {
                tokio::spawn(async move { agent.execute_task(&task).await })
            });
            async move {
                let result = match handle {
                    None => {
                        TaskResult::failure(PoolError::AgentNotFound(agent_id.clone()).to_string())
                    }
                    Some(handle) => match handle.await {
                        Ok(result) => result,
                        Err(e) => {
                            tracing::error!(agent = %agent_id, error = %e, "batch unit failed");
                            TaskResult::failure(format!("Task for agent {agent_id} failed: {e}"))
                        }
                    },
                };
                AgentTaskResult { agent_id, result }
            }
        });
        join_all(handles).await
    }

    pub async fn get_stats(&self) -> PoolStats {
        let (members, total_created) = {
            let pool = self.pool.read().await;
            (pool.members(), pool.total_created)
        };

        let mut agents_by_role: BTreeMap<String, usize> =
            self.roles.keys().map(|role| (role.clone(), 0)).collect();
        let mut agents_by_status: BTreeMap<String, usize> = AgentStatus::ALL
            .iter()
            .map(|status| (status.as_str().to_string(), 0))
            .collect();

        for agent in &members {
            *agents_by_role.entry(agent.role().to_string()).or_default() += 1;
            *agents_by_status
                .entry(agent.status().await.as_str().to_string())
                .or_default() += 1;
        }

        PoolStats {
            active_agents: members.len(),
            total_created,
            agents_by_role,
            agents_by_status,
        }
    }

    /// Delete every agent, one at a time, oldest first.
    pub async fn shutdown_all(&self) {
        tracing::info!("shutting down all agents");
        let ids = self.pool.read().await.order.clone();
        for id in ids {
            if let Err(e) = self.delete_agent(&id).await {
                tracing::debug!(agent = %id, error = %e, "agent already gone");
            }
        }
        tracing::info!("all agents shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::default_roles;
    use crate::testing::{FixedProbe, MockBackend, MockGateway, MockRuntime};
    use cohort_models::{CatalogEntry, ModelCatalog};

    struct Harness {
        orch: Orchestrator,
        backend: Arc<MockBackend>,
        runtime: Arc<MockRuntime>,
    }

    fn harness(backend: MockBackend, runtime: MockRuntime) -> Harness {
        let backend = Arc::new(backend);
        let runtime = Arc::new(runtime);
        let catalog = ModelCatalog::new([
            CatalogEntry::new("m1", 5.0, 4.0, 2.0, "3B", ""),
            CatalogEntry::new("m2", 4.7, 8.0, 6.0, "7B", ""),
            CatalogEntry::new("panicky", 1.0, 1.0, 1.0, "1B", ""),
            CatalogEntry::new("broken", 1.0, 1.0, 1.0, "1B", ""),
        ]);
        let models = ModelRegistry::new(backend.clone(), catalog)
            .with_runtime(runtime.clone())
            .with_probe(Arc::new(FixedProbe {
                ram_gb: 8,
                disk_gb: 50,
            }));
        let orch = Orchestrator::new(
            backend.clone(),
            Arc::new(MockGateway::default()),
            Arc::new(models),
            default_roles(),
        );
        Harness {
            orch,
            backend,
            runtime,
        }
    }

    fn all_downloaded() -> MockBackend {
        MockBackend {
            downloaded: std::sync::Mutex::new(
                ["m1:latest", "m2", "panicky", "broken"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            broken_models: vec!["broken".to_string()],
            panic_models: vec!["panicky".to_string()],
            ..MockBackend::default()
        }
    }

    fn default_harness() -> Harness {
        harness(all_downloaded(), MockRuntime::default())
    }

    #[tokio::test]
    async fn test_create_agent_registers_ready_agent() {
        let h = default_harness();
        let agent = h
            .orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();

        assert_eq!(agent.status().await, AgentStatus::Ready);
        assert_eq!(agent.role(), "recon");
        assert_eq!(agent.system_prompt(), default_roles()["recon"].system_prompt);
        assert!(agent.is_allowed("nmap"));
        assert!(h.orch.get_agent(agent.id()).await.is_some());
        assert!(h.orch.models().is_loaded("m1").await);
        assert_eq!(h.orch.get_stats().await.total_created, 1);
        assert!(h.runtime.pulls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_agent_overrides() {
        let h = default_harness();
        let agent = h
            .orch
            .create_agent(
                AgentRequest::new("analysis", "m2")
                    .with_prompt("Only answer in haiku.")
                    .with_tools(["command"]),
            )
            .await
            .unwrap();
        assert_eq!(agent.system_prompt(), "Only answer in haiku.");
        assert_eq!(agent.allowed_tools(), ["command".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_overrides_fall_back_to_role() {
        let h = default_harness();
        let agent = h
            .orch
            .create_agent(
                AgentRequest::new("recon", "m1")
                    .with_prompt("")
                    .with_tools(Vec::<String>::new()),
            )
            .await
            .unwrap();
        let recon = &default_roles()["recon"];
        assert_eq!(agent.system_prompt(), recon.system_prompt);
        assert_eq!(agent.allowed_tools(), recon.allowed_tools.as_slice());
        assert!(agent.is_allowed("nmap"));
    }

    #[tokio::test]
    async fn test_delete_stops_agent_held_elsewhere() {
        let h = default_harness();
        let agent = h
            .orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let held = Arc::clone(&agent);

        h.orch.delete_agent(agent.id()).await.unwrap();
        assert!(h.orch.get_agent(held.id()).await.is_none());
        let result = held.execute_task(&Task::chat("still there?")).await;
        assert_eq!(
            result.error.as_deref(),
            Some("Agent not ready (status: stopped)")
        );
    }

    #[tokio::test]
    async fn test_unknown_role_leaves_pool_untouched() {
        let h = default_harness();
        let err = h
            .orch
            .create_agent(AgentRequest::new("chef", "m1"))
            .await
            .unwrap_err();
        match err {
            PoolError::UnknownRole { requested, available } => {
                assert_eq!(requested, "chef");
                assert_eq!(available, vec!["analysis", "exploit", "recon", "web"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let stats = h.orch.get_stats().await;
        assert_eq!(stats.active_agents, 0);
        assert_eq!(stats.total_created, 0);
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let h = default_harness();
        let err = h
            .orch
            .create_agent(AgentRequest::new("recon", "gpt-9"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Model 'gpt-9' not found in catalog");
        assert_eq!(h.backend.generate_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_model_is_downloaded_first() {
        let h = harness(MockBackend::default(), MockRuntime::default());
        h.orch
            .create_agent(AgentRequest::new("web", "m2"))
            .await
            .unwrap();
        assert_eq!(*h.runtime.pulls.lock().unwrap(), vec!["m2"]);
    }

    #[tokio::test]
    async fn test_download_failure_aborts_creation() {
        let h = harness(
            MockBackend::default(),
            MockRuntime {
                fail_pull: true,
                ..MockRuntime::default()
            },
        );
        let err = h
            .orch
            .create_agent(AgentRequest::new("web", "m2"))
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::DownloadFailed(ref m) if m == "m2"));
        assert_eq!(h.backend.generate_count(), 0);
        assert!(h.orch.list_agents().await.is_empty());
    }

    #[tokio::test]
    async fn test_initialization_failure_aborts_creation() {
        let h = default_harness();
        let err = h
            .orch
            .create_agent(AgentRequest::new("recon", "broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::InitializationFailed { .. }));
        assert!(h.orch.list_agents().await.is_empty());
        assert_eq!(h.orch.get_stats().await.total_created, 0);
        assert!(!h.orch.models().is_loaded("broken").await);
    }

    #[tokio::test]
    async fn test_delete_keeps_shared_model_loaded() {
        let h = default_harness();
        let a = h
            .orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let b = h
            .orch
            .create_agent(AgentRequest::new("web", "m1"))
            .await
            .unwrap();

        h.orch.delete_agent(a.id()).await.unwrap();
        assert_eq!(a.status().await, AgentStatus::Stopped);
        assert!(h.runtime.stops.lock().unwrap().is_empty());
        assert!(h.orch.models().is_loaded("m1").await);

        h.orch.delete_agent(b.id()).await.unwrap();
        assert_eq!(*h.runtime.stops.lock().unwrap(), vec!["m1"]);
        assert!(!h.orch.models().is_loaded("m1").await);
        assert_eq!(h.orch.get_stats().await.total_created, 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_agent() {
        let h = default_harness();
        assert!(matches!(
            h.orch.delete_agent("missing").await,
            Err(PoolError::AgentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_task_unknown_agent() {
        let h = default_harness();
        let result = h.orch.execute_task("nope", &Task::chat("hi")).await;
        assert_eq!(result.error.as_deref(), Some("Agent nope not found"));
    }

    #[tokio::test]
    async fn test_execute_task_dispatches() {
        let h = default_harness();
        let agent = h
            .orch
            .create_agent(AgentRequest::new("analysis", "m1"))
            .await
            .unwrap();
        let task: Task = serde_json::from_str(r#"{"type": "bogus"}"#).unwrap();
        let result = h.orch.execute_task(agent.id(), &task).await;
        assert_eq!(result.error.as_deref(), Some("Unknown task type: bogus"));
        assert_eq!(agent.status().await, AgentStatus::Ready);
    }

    #[tokio::test]
    async fn test_broadcast_isolates_faults() {
        let h = default_harness();
        let good = h
            .orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let bad = h
            .orch
            .create_agent(AgentRequest::new("recon", "panicky"))
            .await
            .unwrap();
        let other = h
            .orch
            .create_agent(AgentRequest::new("web", "m2"))
            .await
            .unwrap();

        let results = h.orch.broadcast_task(&Task::chat("status?"), None).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].agent_id, good.id());
        assert!(results[0].result.success);
        assert_eq!(results[1].agent_id, bad.id());
        assert!(!results[1].result.success);
        assert_eq!(results[2].agent_id, other.id());
        assert!(results[2].result.success);
        assert_eq!(bad.status().await, AgentStatus::Error);

        let roles = vec!["web".to_string()];
        let results = h
            .orch
            .broadcast_task(&Task::chat("status?"), Some(&roles))
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].agent_id, other.id());
    }

    #[tokio::test]
    async fn test_broadcast_with_no_matching_agents() {
        let h = default_harness();
        h.orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let roles = vec!["exploit".to_string()];
        assert!(h
            .orch
            .broadcast_task(&Task::chat("hi"), Some(&roles))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_collaborative_keeps_caller_order() {
        let h = default_harness();
        let a = h
            .orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let b = h
            .orch
            .create_agent(AgentRequest::new("analysis", "m2"))
            .await
            .unwrap();

        let results = h
            .orch
            .collaborative_task(vec![
                (b.id().to_string(), Task::analysis("22/tcp open", None)),
                ("ghost".to_string(), Task::chat("hi")),
                (a.id().to_string(), Task::chat("hi")),
            ])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].agent_id, b.id());
        assert!(results[0].result.success);
        assert_eq!(results[1].agent_id, "ghost");
        assert_eq!(
            results[1].result.error.as_deref(),
            Some("Agent ghost not found")
        );
        assert_eq!(results[2].agent_id, a.id());
        assert!(results[2].result.success);
    }

    #[tokio::test]
    async fn test_stats_cover_every_role_and_status() {
        let h = default_harness();
        h.orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        let stopped = h
            .orch
            .create_agent(AgentRequest::new("recon", "m2"))
            .await
            .unwrap();
        stopped.stop().await;

        let stats = h.orch.get_stats().await;
        assert_eq!(stats.active_agents, 2);
        assert_eq!(stats.active_agents, h.orch.list_agents().await.len());
        assert_eq!(stats.agents_by_role.len(), 4);
        assert_eq!(stats.agents_by_role["recon"], 2);
        assert_eq!(stats.agents_by_role["web"], 0);
        assert_eq!(stats.agents_by_status.len(), 5);
        assert_eq!(stats.agents_by_status["ready"], 1);
        assert_eq!(stats.agents_by_status["stopped"], 1);
        assert_eq!(stats.agents_by_status["busy"], 0);
    }

    #[tokio::test]
    async fn test_list_agents_in_creation_order() {
        let h = default_harness();
        let mut ids = Vec::new();
        for (role, model) in [("web", "m2"), ("recon", "m1"), ("exploit", "m1")] {
            let agent = h
                .orch
                .create_agent(AgentRequest::new(role, model))
                .await
                .unwrap();
            ids.push(agent.id().to_string());
        }
        let listed: Vec<String> = h.orch.list_agents().await.into_iter().map(|i| i.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_shutdown_all() {
        let h = default_harness();
        h.orch
            .create_agent(AgentRequest::new("recon", "m1"))
            .await
            .unwrap();
        h.orch
            .create_agent(AgentRequest::new("web", "m2"))
            .await
            .unwrap();

        h.orch.shutdown_all().await;
        assert!(h.orch.list_agents().await.is_empty());
        assert_eq!(*h.runtime.stops.lock().unwrap(), vec!["m1", "m2"]);
        let stats = h.orch.get_stats().await;
        assert_eq!(stats.active_agents, 0);
        assert_eq!(stats.total_created, 2);
    }
}
