//! Subcommand implementations.

pub mod agents;
pub mod config;
pub mod models;
pub mod roles;
pub mod tools;

use cohort_core::ConfigStore;
use std::path::Path;

pub fn config_store(path: Option<&Path>) -> ConfigStore {
    match path {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::new(),
    }
}
