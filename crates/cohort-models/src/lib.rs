//! cohort-models: model catalog, download/load tracking and resource
//! accounting for the models agents run on.

pub mod catalog;
mod error;
pub mod registry;
pub mod resources;
pub mod runtime;

pub use catalog::{CatalogEntry, ModelCatalog};
pub use error::ModelError;
pub use registry::{ModelInfo, ModelRegistry, ResourceRequirements};
pub use resources::{
    DiskSnapshot, DiskUsage, HostProbe, MemorySnapshot, RamUsage, SystemProbe, SystemResources,
    VramUsage,
};
pub use runtime::{ModelRuntime, OllamaCli, ProgressFn};
