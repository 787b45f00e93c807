//! Model registry: which catalog models are downloaded and loaded, and what
//! running a set of them would cost.

use crate::catalog::ModelCatalog;
use crate::error::ModelError;
use crate::resources::{to_gb, HostProbe, SystemProbe, SystemResources};
use crate::runtime::{ModelRuntime, OllamaCli, ProgressFn};
use cohort_provider::{InferenceBackend, RemoteModel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_VRAM_ESTIMATE_GB: f64 = 16.0;
const HIGH_USAGE_RATIO: f64 = 0.8;

/// A catalog model together with its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size_gb: f64,
    pub ram_gb: f64,
    pub vram_gb: f64,
    pub parameters: String,
    pub description: String,
    pub is_downloaded: bool,
    /// Advisory: the backend cannot be asked what is resident.
    pub is_loaded: bool,
}

/// Totals for a model set against what the host has available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    pub total_ram_gb: f64,
    pub total_vram_gb: f64,
    pub total_disk_gb: f64,
    pub available_ram_gb: f64,
    pub available_vram_gb: f64,
    pub available_disk_gb: f64,
    pub can_allocate: bool,
    pub warnings: Vec<String>,
}

/// Tracks download and load state of catalog models.
///
/// The loaded map is a local cache updated by [`load_model`](Self::load_model),
/// [`unload_model`](Self::unload_model) and [`mark_loaded`](Self::mark_loaded).
/// It can drift from what the backend actually keeps resident.
pub struct ModelRegistry {
    backend: Arc<dyn InferenceBackend>,
    runtime: Arc<dyn ModelRuntime>,
    probe: Arc<dyn HostProbe>,
    catalog: ModelCatalog,
    vram_estimate_gb: f64,
    loaded: RwLock<HashMap<String, bool>>,
}

impl ModelRegistry {
    pub fn new(backend: Arc<dyn InferenceBackend>, catalog: ModelCatalog) -> Self {
        Self {
            backend,
            runtime: Arc::new(OllamaCli::default()),
            probe: Arc::new(SystemProbe::default()),
            catalog,
            vram_estimate_gb: DEFAULT_VRAM_ESTIMATE_GB,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_runtime(mut self, runtime: Arc<dyn ModelRuntime>) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn HostProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Set the VRAM figure used in place of a real GPU query.
    pub fn with_vram_estimate(mut self, gb: f64) -> Self {
        self.vram_estimate_gb = gb;
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Names the backend reports as downloaded. An unreachable backend is
    /// treated as having nothing downloaded.
    async fn downloaded(&self) -> Vec<RemoteModel> {
        match self.backend.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::error!(error = %e, "failed to list downloaded models");
                Vec::new()
            }
        }
    }

    fn matches(remote: &[RemoteModel], name: &str) -> bool {
        remote
            .iter()
            .any(|m| m.name == name || m.base_name() == name)
    }

    /// Whether `name` is present on the backend.
    pub async fn is_downloaded(&self, name: &str) -> bool {
        Self::matches(&self.downloaded().await, name)
    }

    /// Every catalog model, in catalog order, with its current state.
    pub async fn list_available_models(&self) -> Vec<ModelInfo> {
        let downloaded = self.downloaded().await;
        let loaded = self.loaded.read().await;
        self.catalog
            .iter()
            .map(|entry| ModelInfo {
                name: entry.name.clone(),
                size_gb: entry.size_gb,
                ram_gb: entry.ram_gb,
                vram_gb: entry.vram_gb,
                parameters: entry.parameters.clone(),
                description: entry.description.clone(),
                is_downloaded: Self::matches(&downloaded, &entry.name),
                is_loaded: loaded.get(&entry.name).copied().unwrap_or(false),
            })
            .collect()
    }

    /// Pull `name` through the model runtime. Failures are logged and
    /// reported as `false`; there is no retry.
    pub async fn download_model(&self, name: &str, progress: Option<&ProgressFn>) -> bool {
        tracing::info!(model = name, "downloading model");
        match self.runtime.pull(name, progress).await {
            Ok(true) => {
                tracing::info!(model = name, "model downloaded");
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::error!(model = name, error = %e, "model download failed");
                false
            }
        }
    }

    /// Make `name` resident with a throwaway generation.
    pub async fn load_model(&self, name: &str) -> bool {
        match self.backend.generate(name, "Hello").await {
            Ok(_) => {
                self.mark_loaded(name).await;
                tracing::info!(model = name, "model loaded into memory");
                true
            }
            Err(e) => {
                tracing::error!(model = name, error = %e, "failed to load model");
                false
            }
        }
    }

    /// Ask the runtime to evict `name`. The model is recorded as unloaded
    /// whether or not the runtime call succeeded.
    pub async fn unload_model(&self, name: &str) -> bool {
        if let Err(e) = self.runtime.stop(name).await {
            tracing::warn!(model = name, error = %e, "could not stop model");
        }
        self.loaded.write().await.insert(name.to_string(), false);
        tracing::info!(model = name, "model unloaded");
        true
    }

    /// Record that `name` was made resident by some other call.
    pub async fn mark_loaded(&self, name: &str) {
        self.loaded.write().await.insert(name.to_string(), true);
    }

    pub async fn is_loaded(&self, name: &str) -> bool {
        self.loaded.read().await.get(name).copied().unwrap_or(false)
    }

    /// Resource totals for running `names` together. Unknown names add a
    /// warning and contribute nothing.
    pub fn calculate_requirements(
        &self,
        names: &[String],
    ) -> Result<ResourceRequirements, ModelError> {
        let mut total_ram = 0.0;
        let mut total_vram = 0.0;
        let mut total_disk = 0.0;
        let mut warnings = Vec::new();

        for name in names {
            match self.catalog.get(name) {
                Some(entry) => {
                    total_ram += entry.ram_gb;
                    total_vram += entry.vram_gb;
                    total_disk += entry.size_gb;
                }
                None => warnings.push(format!("Model '{name}' not found in catalog")),
            }
        }

        let available_ram = to_gb(self.probe.memory()?.available_bytes);
        let available_disk = to_gb(self.probe.disk()?.free_bytes);
        let available_vram = self.vram_estimate_gb;

        let can_allocate = total_ram <= available_ram
            && total_vram <= available_vram
            && total_disk <= available_disk;

        for (label, total, available) in [
            ("RAM", total_ram, available_ram),
            ("VRAM", total_vram, available_vram),
            ("Disk", total_disk, available_disk),
        ] {
            if total > available * HIGH_USAGE_RATIO {
                warnings.push(format!(
                    "{label} usage will be high ({total:.1}GB / {available:.1}GB available)"
                ));
            }
        }

        Ok(ResourceRequirements {
            total_ram_gb: total_ram,
            total_vram_gb: total_vram,
            total_disk_gb: total_disk,
            available_ram_gb: available_ram,
            available_vram_gb: available_vram,
            available_disk_gb: available_disk,
            can_allocate,
            warnings,
        })
    }

    /// Current host RAM, disk and estimated VRAM usage.
    pub async fn system_resources(&self) -> Result<SystemResources, ModelError> {
        let mem = self.probe.memory()?;
        let disk = self.probe.disk()?;
        let vram_used: f64 = {
            let loaded = self.loaded.read().await;
            loaded
                .iter()
                .filter(|(_, is_loaded)| **is_loaded)
                .filter_map(|(name, _)| self.catalog.get(name))
                .map(|entry| entry.vram_gb)
                .sum()
        };
        Ok(SystemResources::from_snapshots(
            mem,
            disk,
            self.vram_estimate_gb,
            vram_used,
        ))
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }
}
