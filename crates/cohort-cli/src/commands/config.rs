use crate::cli::ConfigAction;
use cohort_core::{Config, ConfigStore};

pub fn run(store: &ConfigStore, config: &Config, action: &ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Path => println!("{}", store.path().display()),
        ConfigAction::Show => println!("{}", serde_json::to_string_pretty(config)?),
        ConfigAction::Init { force } => {
            if store.path().exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            store
                .save(&Config::default())
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", store.path().display()))?;
            println!("Wrote {}", store.path().display());
        }
    }
    Ok(())
}
