//! Unit catalog loader.

use std::path::Path;

use crate::catalog::{UnitCatalog, UnitSpec};
use crate::loaders::{LoadResult, read_file};

/// Loader for unit catalogs from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load a unit catalog from a RON file.
    ///
    /// RON format: `Vec<UnitSpec>`. Names must be unique.
    pub fn load(path: &Path) -> LoadResult<UnitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<UnitCatalog> {
        let specs: Vec<UnitSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        let mut catalog = UnitCatalog::new();
        for spec in specs {
            let name = spec.name.clone();
            if !catalog.insert(spec) {
                anyhow::bail!("Duplicate unit '{}' in catalog", name);
            }
        }

        tracing::debug!(units = catalog.len(), "unit catalog loaded");
        Ok(catalog)
    }
}
