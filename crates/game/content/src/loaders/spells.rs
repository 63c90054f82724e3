//! Spell catalogue loader.

use std::path::Path;

use grimoire_core::SpellDefinition;
use serde::Deserialize;

use crate::catalog::SpellCatalog;
use crate::loaders::{LoadResult, read_file};

/// Spell catalogue structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct SpellFile {
    pub spells: Vec<SpellDefinition>,
}

/// Loader for spell definitions from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load the spell catalogue from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpellCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a spell catalogue from RON text.
    ///
    /// Labels must be unique; a repeated label is rejected rather than
    /// silently shadowing the earlier definition.
    pub fn parse(content: &str) -> LoadResult<SpellCatalog> {
        let file: SpellFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut seen = std::collections::BTreeSet::new();
        for spell in &file.spells {
            if !seen.insert(spell.label.as_str()) {
                anyhow::bail!("Duplicate spell label '{}'", spell.label);
            }
        }

        tracing::debug!(count = file.spells.len(), "loaded spells");
        Ok(SpellCatalog::new(file.spells))
    }
}
