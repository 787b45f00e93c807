//! Model catalog, download and host resource commands.

use cohort_core::{Config, Orchestrator};
use cohort_models::{ModelRegistry, ProgressFn};
use std::sync::Arc;

fn registry(config: &Config) -> Arc<ModelRegistry> {
    Arc::clone(Orchestrator::from_config(config).models())
}

pub async fn list(config: &Config) -> anyhow::Result<()> {
    let models = registry(config);
    if !models.health_check().await {
        eprintln!(
            "warning: Ollama at {} is not reachable, download state is unknown",
            config.ollama.base_url
        );
    }

    let infos = models.list_available_models().await;
    println!("Catalog models ({}):", infos.len());
    for info in infos {
        let state = match (info.is_downloaded, info.is_loaded) {
            (_, true) => "loaded",
            (true, false) => "downloaded",
            (false, false) => "not downloaded",
        };
        println!(
            "{} [{}] {} | disk {:.1} GB, ram {:.1} GB, vram {:.1} GB | {}",
            info.name, state, info.parameters, info.size_gb, info.ram_gb, info.vram_gb, info.description
        );
    }
    Ok(())
}

pub async fn requirements(config: &Config, names: &[String]) -> anyhow::Result<()> {
    let models = registry(config);
    let req = models
        .calculate_requirements(names)
        .map_err(|e| anyhow::anyhow!("Failed to read host resources: {e}"))?;

    println!(
        "RAM:  {:.1} GB needed / {:.1} GB available",
        req.total_ram_gb, req.available_ram_gb
    );
    println!(
        "VRAM: {:.1} GB needed / {:.1} GB available",
        req.total_vram_gb, req.available_vram_gb
    );
    println!(
        "Disk: {:.1} GB needed / {:.1} GB available",
        req.total_disk_gb, req.available_disk_gb
    );
    println!("Can allocate: {}", if req.can_allocate { "yes" } else { "no" });
    for warning in &req.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

pub async fn pull(config: &Config, name: &str) -> anyhow::Result<()> {
    let models = registry(config);
    if !models.catalog().contains(name) {
        anyhow::bail!("Model '{name}' not found in catalog");
    }
    if models.is_downloaded(name).await {
        println!("{name} is already downloaded.");
        return Ok(());
    }

    let progress: &ProgressFn = &|line: &str| eprintln!("{line}");
    if !models.download_model(name, Some(progress)).await {
        anyhow::bail!("Failed to download {name}");
    }
    println!("Downloaded {name}.");
    Ok(())
}

pub async fn resources(config: &Config) -> anyhow::Result<()> {
    let res = registry(config)
        .system_resources()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read host resources: {e}"))?;

    println!(
        "RAM:  {:.1} / {:.1} GB used ({:.1}%), {:.1} GB available",
        res.ram.used_gb, res.ram.total_gb, res.ram.percent, res.ram.available_gb
    );
    println!(
        "Disk: {:.1} / {:.1} GB used ({:.1}%), {:.1} GB free",
        res.disk.used_gb, res.disk.total_gb, res.disk.percent, res.disk.free_gb
    );
    println!(
        "VRAM: {:.1} / {:.1} GB used (estimate), {:.1} GB available",
        res.vram.used_gb, res.vram.total_gb, res.vram.available_gb
    );
    Ok(())
}
