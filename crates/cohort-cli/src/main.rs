//! cohort: a pool of role-specialized LLM agents backed by a local Ollama
//! server and a small set of security tools.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("cohort=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = commands::config_store(cli.config.as_deref());
    let mut config = store.load();
    if let Some(url) = &cli.ollama_url {
        config.ollama.base_url = cli::normalize_base_url(url);
    }
    tracing::debug!(path = %store.path().display(), ollama = %config.ollama.base_url, "config loaded");

    match cli.command {
        Commands::Models => commands::models::list(&config).await?,
        Commands::Requirements { ref models } => {
            commands::models::requirements(&config, models).await?
        }
        Commands::Pull { ref model } => commands::models::pull(&config, model).await?,
        Commands::Resources => commands::models::resources(&config).await?,
        Commands::Roles => commands::roles::run(&config),
        Commands::Tools { ref name } => commands::tools::run(&config, name.as_deref())?,
        Commands::Ask {
            ref role,
            ref model,
            ref prompt,
            ref tool,
            ref params,
        } => {
            let task = commands::agents::build_task(prompt, tool.as_deref(), params)?;
            let ok = commands::agents::ask(&config, role, model, task).await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Broadcast {
            ref model,
            ref roles,
            ref prompt,
        } => commands::agents::broadcast(&config, model, roles, prompt).await?,
        Commands::Config { ref action } => commands::config::run(&store, &config, action)?,
    }

    Ok(())
}
