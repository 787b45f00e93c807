//! Static catalog of known models and their resource costs.

use serde::{Deserialize, Serialize};

/// Resource profile of one catalog model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Size on disk, in GB.
    pub size_gb: f64,
    /// Resident RAM estimate, in GB.
    pub ram_gb: f64,
    /// VRAM estimate, in GB.
    pub vram_gb: f64,
    /// Parameter-count label, e.g. "7B".
    pub parameters: String,
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        size_gb: f64,
        ram_gb: f64,
        vram_gb: f64,
        parameters: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size_gb,
            ram_gb,
            vram_gb,
            parameters: parameters.into(),
            description: description.into(),
        }
    }
}

/// Ordered model catalog. Names are unique; a later duplicate replaces the
/// earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModelCatalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    pub fn insert(&mut self, entry: CatalogEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_preserves_order_and_replaces_duplicates() {
        let catalog = ModelCatalog::new([
            CatalogEntry::new("b", 1.0, 1.0, 1.0, "1B", ""),
            CatalogEntry::new("a", 2.0, 2.0, 2.0, "2B", ""),
            CatalogEntry::new("b", 3.0, 3.0, 3.0, "3B", "replaced"),
        ]);
        assert_eq!(catalog.names(), vec!["b", "a"]);
        assert_eq!(catalog.get("b").unwrap().description, "replaced");
        assert!(!catalog.contains("c"));
    }

    #[test]
    fn test_catalog_serializes_as_list() {
        let catalog = ModelCatalog::new([CatalogEntry::new("m1", 5.0, 4.0, 2.0, "3B", "small")]);
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "m1");
        let back: ModelCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(back, catalog);
    }
}
