//! Affliction catalogue loader.

use std::path::Path;

use grimoire_core::{AfflictionCatalog, AfflictionDefinition};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Affliction catalogue structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct AfflictionFile {
    pub afflictions: Vec<AfflictionDefinition>,
}

/// Loader for affliction definitions from RON files.
pub struct AfflictionLoader;

impl AfflictionLoader {
    /// Load the affliction catalogue from a RON file.
    pub fn load(path: &Path) -> LoadResult<AfflictionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an affliction catalogue from RON text.
    pub fn parse(content: &str) -> LoadResult<AfflictionCatalog> {
        let file: AfflictionFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse affliction catalog RON: {}", e))?;
        Ok(AfflictionCatalog::new(file.afflictions))
    }
}
