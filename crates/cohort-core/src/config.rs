use crate::role::{default_roles, RoleConfig};
use cohort_models::{CatalogEntry, ModelCatalog};
use cohort_provider::OllamaConfig;
use cohort_tools::ToolSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings for the inference backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub base_url: String,
    pub generate_timeout_secs: u64,
    pub chat_timeout_secs: u64,
    pub tags_timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        let defaults = OllamaConfig::default();
        Self {
            base_url: defaults.base_url,
            generate_timeout_secs: defaults.generate_timeout.as_secs(),
            chat_timeout_secs: defaults.chat_timeout.as_secs(),
            tags_timeout_secs: defaults.tags_timeout.as_secs(),
            health_timeout_secs: defaults.health_timeout.as_secs(),
        }
    }
}

impl OllamaSettings {
    pub fn client_config(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.base_url.clone(),
            generate_timeout: Duration::from_secs(self.generate_timeout_secs),
            chat_timeout: Duration::from_secs(self.chat_timeout_secs),
            tags_timeout: Duration::from_secs(self.tags_timeout_secs),
            health_timeout: Duration::from_secs(self.health_timeout_secs),
        }
    }
}

/// Serialized settings from ~/.cohort/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaSettings,
    /// Binary used to pull and stop models.
    pub ollama_binary: String,
    /// Assumed GPU memory, in GB.
    pub vram_estimate_gb: f64,
    pub models_catalog: ModelCatalog,
    pub roles: BTreeMap<String, RoleConfig>,
    pub tools: ToolSettings,
}

pub fn default_catalog() -> ModelCatalog {
    ModelCatalog::new([
        CatalogEntry::new(
            "llama3.2:3b",
            2.0,
            4.0,
            3.0,
            "3B",
            "Small general-purpose model, fast on modest hardware.",
        ),
        CatalogEntry::new(
            "qwen2.5:7b",
            4.7,
            8.0,
            6.0,
            "7B",
            "Balanced reasoning and tool-use model.",
        ),
        CatalogEntry::new(
            "qwen2.5-coder:7b",
            4.7,
            8.0,
            6.0,
            "7B",
            "Code-focused model for payloads and scripts.",
        ),
        CatalogEntry::new(
            "mistral:7b",
            4.1,
            8.0,
            5.5,
            "7B",
            "General-purpose instruction model.",
        ),
        CatalogEntry::new(
            "deepseek-r1:14b",
            9.0,
            16.0,
            10.0,
            "14B",
            "Reasoning model for in-depth analysis.",
        ),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama: OllamaSettings::default(),
            ollama_binary: "ollama".to_string(),
            vram_estimate_gb: 16.0,
            models_catalog: default_catalog(),
            roles: default_roles(),
            tools: ToolSettings::default(),
        }
    }
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".cohort");
        path.push("config.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved config, or fall back to Default
    pub fn load(&self) -> Config {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "invalid config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    /// Save the config back to disk
    pub fn save(&self, config: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
    }
}
