//! CLI argument and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cohort", version, about = "Pool of role-specialized LLM agents")]
pub struct Cli {
    /// Path to the config file (defaults to ~/.cohort/config.json).
    #[arg(long, global = true, env = "COHORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the Ollama base URL. A bare `host:port` gets `http://`.
    #[arg(long, global = true, env = "COHORT_OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog models with download and load state.
    Models,

    /// Show what running a set of models would need.
    Requirements {
        /// Catalog model names.
        #[arg(required = true)]
        models: Vec<String>,
    },

    /// Download a catalog model.
    Pull {
        model: String,
    },

    /// Show host RAM, disk and VRAM usage.
    Resources,

    /// List configured roles.
    Roles,

    /// List built-in tools, or show one tool's parameters.
    Tools {
        name: Option<String>,
    },

    /// Create one agent, run a single task on it and print the result.
    Ask {
        /// Role of the agent.
        #[arg(short, long)]
        role: String,

        /// Catalog model to bind the agent to.
        #[arg(short, long)]
        model: String,

        /// Chat prompt.
        prompt: String,

        /// Run a tool instead of chatting; the prompt is ignored.
        #[arg(long)]
        tool: Option<String>,

        /// Tool parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },

    /// Create one agent per role and send each the same prompt.
    Broadcast {
        /// Catalog model every agent is bound to.
        #[arg(short, long)]
        model: String,

        /// Roles to create (defaults to every configured role).
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,

        prompt: String,
    },

    /// Manage the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Write the default configuration, unless a file already exists.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Base URL for the inference backend, defaulting the scheme to http.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_broadcast_roles() {
        let cli = Cli::try_parse_from([
            "cohort",
            "broadcast",
            "-m",
            "llama3.2:3b",
            "--roles",
            "recon,web",
            "status?",
        ])
        .unwrap();
        match cli.command {
            Commands::Broadcast { model, roles, prompt } => {
                assert_eq!(model, "llama3.2:3b");
                assert_eq!(roles, vec!["recon", "web"]);
                assert_eq!(prompt, "status?");
            }
            _ => panic!("expected broadcast"),
        }
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("0.0.0.0:11434"), "http://0.0.0.0:11434");
        assert_eq!(
            normalize_base_url("https://gpu.lan:11434"),
            "https://gpu.lan:11434"
        );
    }

    #[test]
    fn test_ollama_url_env_var() {
        let cmd = <Cli as clap::CommandFactory>::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "ollama_url")
            .unwrap();
        assert_eq!(arg.get_env().and_then(|e| e.to_str()), Some("COHORT_OLLAMA_URL"));
    }

    #[test]
    fn test_requirements_needs_models() {
        assert!(Cli::try_parse_from(["cohort", "requirements"]).is_err());
    }
}
